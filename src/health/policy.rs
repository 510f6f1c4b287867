//! Per-request choice between a plain pong and a joke.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What a liveness request should answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PlainPong,
    FetchJoke,
}

/// Roll once in `0..100`; fetch a joke if the roll is below the chance.
///
/// Out-of-range chances need no special casing: `<= 0` never fetches and
/// `>= 100` always does.
pub fn decide<R: Rng>(joke_chance_percent: i64, rng: &mut R) -> Action {
    let roll: i64 = rng.gen_range(0..100);
    if roll < joke_chance_percent {
        Action::FetchJoke
    } else {
        Action::PlainPong
    }
}

/// Configured chance plus the process-wide random source.
#[derive(Debug)]
pub struct ResponsePolicy {
    joke_chance_percent: i64,
    rng: Mutex<StdRng>,
}

impl ResponsePolicy {
    /// Seed from OS entropy so sequences differ across restarts.
    pub fn new(joke_chance_percent: i64) -> Self {
        Self::with_rng(joke_chance_percent, StdRng::from_entropy())
    }

    pub fn with_rng(joke_chance_percent: i64, rng: StdRng) -> Self {
        Self {
            joke_chance_percent,
            rng: Mutex::new(rng),
        }
    }

    pub fn joke_chance_percent(&self) -> i64 {
        self.joke_chance_percent
    }

    /// Decide the action for one request.
    pub fn next_action(&self) -> Action {
        let mut rng = self.rng.lock().expect("policy rng mutex poisoned");
        decide(self.joke_chance_percent, &mut *rng)
    }
}
