//! Randomness port - injected so dice can be fixed in tests

pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`
    fn gen_range(&self, min: i32, max: i32) -> i32;
}
