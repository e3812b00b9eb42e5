//! Enemy AI systems.

use rand::Rng;

use crate::config::EnemyConfig;
use crate::DeterministicRng;

pub mod contacts;
pub mod reactions;
pub mod timers;


pub use contacts::*;
pub use reactions::*;
pub use timers::*;

/// Случайная задержка атаки, равномерно в [attack_min_time, attack_max_time]
pub fn roll_attack_delay(rng: &mut DeterministicRng, config: &EnemyConfig) -> f32 {
    let (min, max) = config.attack_delay_range();
    // gen_range паникует на неконечных границах
    if min.is_finite() && max.is_finite() && max > min {
        rng.rng.gen_range(min..=max)
    } else {
        min
    }
}
