//! Random source implementations

use rand::Rng;

use crate::application::ports::outbound::RandomPort;

/// System random - uses the thread-local generator
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Fixed random for testing.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        self.0
    }
}

/// Scripted random for testing: d20 draws (`1..=20`) come from a queue,
/// index picks (`0..=n`) always return `index`.
#[cfg(test)]
pub struct ScriptedRandom {
    d20: std::sync::Mutex<std::collections::VecDeque<i32>>,
    index: i32,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(d20: impl IntoIterator<Item = i32>, index: i32) -> Self {
        Self {
            d20: std::sync::Mutex::new(d20.into_iter().collect()),
            index,
        }
    }
}

#[cfg(test)]
impl RandomPort for ScriptedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if (min, max) == (1, 20) {
            let mut queue = self.d20.lock().unwrap_or_else(|e| e.into_inner());
            queue.pop_front().unwrap_or(min)
        } else {
            self.index.clamp(min, max)
        }
    }
}
