//! Flee/wander decision
//!
//! The mode is not stored: it is recomputed every tick from the pointer
//! distance and the creature's current depth.

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Pointer is close and the creature is still small enough to be scared
    Fleeing,
    Wandering,
}

impl Behavior {
    pub fn classify(dist: f32, depth: f32, tuning: &Tuning) -> Self {
        if dist < tuning.flee_distance && depth < tuning.flee_depth_ceiling {
            Behavior::Fleeing
        } else {
            Behavior::Wandering
        }
    }

    pub fn is_fleeing(self) -> bool {
        self == Behavior::Fleeing
    }

    pub fn speed_cap(self, tuning: &Tuning) -> f32 {
        tuning.speed_cap(self.is_fleeing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_pointer_scares_small_creature() {
        let t = Tuning::default();
        assert_eq!(Behavior::classify(100.0, 1.0, &t), Behavior::Fleeing);
    }

    #[test]
    fn test_big_creature_is_bold() {
        let t = Tuning::default();
        assert_eq!(Behavior::classify(100.0, 2.0, &t), Behavior::Wandering);
        assert_eq!(Behavior::classify(100.0, 2.4, &t), Behavior::Wandering);
    }

    #[test]
    fn test_far_pointer_wanders() {
        let t = Tuning::default();
        assert_eq!(Behavior::classify(300.0, 0.5, &t), Behavior::Wandering);
        assert_eq!(Behavior::classify(299.9, 0.5, &t), Behavior::Fleeing);
    }

    #[test]
    fn test_flee_cap_is_faster() {
        let t = Tuning::default();
        assert!(Behavior::Fleeing.speed_cap(&t) > Behavior::Wandering.speed_cap(&t));
    }
}
