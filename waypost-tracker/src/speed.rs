//! Courier speed model.
//!
//! Speeds start from the vehicle's base speed and are scaled by a uniform
//! traffic factor in `[1 - jitter, 1 + jitter]`. The result is clamped to
//! `[0.5, 1.5]` times the base so a large jitter can never produce a
//! stalled or runaway courier.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use waypost_core::VehicleType;

/// Lowest speed as a multiple of the base speed.
pub const MIN_SPEED_FACTOR: f64 = 0.5;

/// Highest speed as a multiple of the base speed.
pub const MAX_SPEED_FACTOR: f64 = 1.5;

/// Seeded source of per-tick courier speeds.
///
/// # Examples
///
/// ```
/// use waypost_core::VehicleType;
/// use waypost_tracker::SpeedModel;
///
/// let mut model = SpeedModel::seeded(7, 0.2);
/// let speed = model.speed_kmh(VehicleType::Motorcycle);
/// assert!((24.0..=36.0).contains(&speed));
/// ```
#[derive(Debug, Clone)]
pub struct SpeedModel {
    rng: ChaCha8Rng,
    jitter: f64,
}

impl SpeedModel {
    /// Deterministic model: the same seed yields the same speed sequence.
    #[must_use]
    pub fn seeded(seed: u64, jitter: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            jitter: sanitise_jitter(jitter),
        }
    }

    /// Model seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy(jitter: f64) -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            jitter: sanitise_jitter(jitter),
        }
    }

    /// Jitter in use after sanitising.
    #[must_use]
    pub const fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Draw a speed in km/h for `vehicle`.
    pub fn speed_kmh(&mut self, vehicle: VehicleType) -> f64 {
        let base = vehicle.base_speed_kmh();
        let factor = if self.jitter > 0.0 {
            self.rng.gen_range((1.0 - self.jitter)..=(1.0 + self.jitter))
        } else {
            1.0
        };
        (base * factor).clamp(base * MIN_SPEED_FACTOR, base * MAX_SPEED_FACTOR)
    }
}

fn sanitise_jitter(jitter: f64) -> f64 {
    if jitter.is_finite() {
        jitter.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
