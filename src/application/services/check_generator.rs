//! Random check generator - category, difficulty and the d20 itself

use crate::application::ports::outbound::RandomPort;
use crate::domain::value_objects::{CheckCategory, Difficulty, Persona};

/// Uniformly pick one of the fixed check categories
pub fn pick_category<R: RandomPort + ?Sized>(random: &R) -> CheckCategory {
    pick_from(random, &CheckCategory::ALL)
}

/// Uniform difficulty in 1..=20
pub fn pick_difficulty<R: RandomPort + ?Sized>(random: &R) -> Difficulty {
    Difficulty::clamped(roll_d20(random))
}

/// Uniformly pick the narrator persona for a new event
pub fn pick_persona<R: RandomPort + ?Sized>(random: &R) -> Persona {
    pick_from(random, &Persona::ALL)
}

/// Roll a twenty-sided die
pub fn roll_d20<R: RandomPort + ?Sized>(random: &R) -> u8 {
    let value = random.gen_range(i32::from(Difficulty::MIN), i32::from(Difficulty::MAX));
    value.clamp(i32::from(Difficulty::MIN), i32::from(Difficulty::MAX)) as u8
}

fn pick_from<R: RandomPort + ?Sized, T: Copy>(random: &R, items: &[T]) -> T {
    let last = items.len().saturating_sub(1) as i32;
    let index = random.gen_range(0, last).clamp(0, last) as usize;
    items[index]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::infrastructure::random::{FixedRandom, SystemRandom};

    const SAMPLES: usize = 12_000;

    #[test]
    fn test_difficulty_always_in_range() {
        let random = SystemRandom::new();
        for _ in 0..SAMPLES {
            let dc = pick_difficulty(&random).value();
            assert!((1..=20).contains(&dc));
        }
    }

    #[test]
    fn test_difficulty_distribution_roughly_uniform() {
        let random = SystemRandom::new();
        let mut counts: HashMap<u8, usize> = HashMap::new();
        for _ in 0..SAMPLES {
            *counts.entry(pick_difficulty(&random).value()).or_default() += 1;
        }

        // Expected 600 per face; allow generous slack
        assert_eq!(counts.len(), 20);
        for (face, count) in counts {
            assert!((350..=850).contains(&count), "face {} seen {} times", face, count);
        }
    }

    #[test]
    fn test_category_distribution_roughly_uniform() {
        let random = SystemRandom::new();
        let mut counts: HashMap<CheckCategory, usize> = HashMap::new();
        for _ in 0..SAMPLES {
            *counts.entry(pick_category(&random)).or_default() += 1;
        }

        // Expected 2000 per category
        assert_eq!(counts.len(), CheckCategory::ALL.len());
        for (category, count) in counts {
            assert!((1500..=2500).contains(&count), "{:?} seen {} times", category, count);
        }
    }

    #[test]
    fn test_out_of_range_source_is_clamped() {
        assert_eq!(roll_d20(&FixedRandom(0)), 1);
        assert_eq!(roll_d20(&FixedRandom(42)), 20);
        assert_eq!(pick_category(&FixedRandom(99)), CheckCategory::Stealth);
        assert_eq!(pick_category(&FixedRandom(-3)), CheckCategory::Dexterity);
    }

    #[test]
    fn test_fixed_source_picks_by_index() {
        assert_eq!(pick_category(&FixedRandom(1)), CheckCategory::Charisma);
        assert_eq!(pick_persona(&FixedRandom(2)), Persona::SnusWillis);
        assert_eq!(pick_difficulty(&FixedRandom(12)).value(), 12);
    }
}
