//! Seasonal sunlight model.
//!
//! The environment is a pure function of the tick counter: sunlight follows a
//! sine wave over `cycle_length` ticks and the season is the quarter of the
//! cycle the tick falls in.

pub use ecotick_data::{Environment, Season};
use std::f64::consts::PI;

/// Amplitude of the sunlight swing around 1.0.
pub const SUNLIGHT_AMPLITUDE: f64 = 0.3;

pub trait EnvironmentLogic {
    /// Environment for `time` with a seasonal period of `cycle_length` ticks.
    fn at(time: u64, cycle_length: u64) -> Self;

    /// Overwrites `self` with the environment for `time`.
    fn update(&mut self, time: u64, cycle_length: u64);
}

impl EnvironmentLogic for Environment {
    fn at(time: u64, cycle_length: u64) -> Self {
        let cycle_length = cycle_length.max(1);
        let cycle_day = time % cycle_length;
        let angle = 2.0 * PI * cycle_day as f64 / cycle_length as f64;
        let sunlight = 1.0 + SUNLIGHT_AMPLITUDE * angle.sin();
        // Widened so huge cycle lengths cannot overflow.
        let quarter = (u128::from(cycle_day) * 4 / u128::from(cycle_length)).min(3) as usize;

        Environment {
            sunlight,
            season: Season::ALL[quarter],
            cycle_day,
        }
    }

    fn update(&mut self, time: u64, cycle_length: u64) {
        *self = Self::at(time, cycle_length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sunlight_peaks_and_troughs() {
        let peak = Environment::at(25, 100);
        assert!((peak.sunlight - 1.3).abs() < 1e-9);
        let trough = Environment::at(75, 100);
        assert!((trough.sunlight - 0.7).abs() < 1e-9);
        assert!((Environment::at(0, 100).sunlight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_season_quarters() {
        assert_eq!(Environment::at(0, 100).season, Season::Spring);
        assert_eq!(Environment::at(24, 100).season, Season::Spring);
        assert_eq!(Environment::at(25, 100).season, Season::Summer);
        assert_eq!(Environment::at(50, 100).season, Season::Autumn);
        assert_eq!(Environment::at(99, 100).season, Season::Winter);
        assert_eq!(Environment::at(100, 100).season, Season::Spring);
    }

    #[test]
    fn test_cycle_day_wraps() {
        let env = Environment::at(1234, 100);
        assert_eq!(env.cycle_day, 34);
    }

    #[test]
    fn test_zero_cycle_length_does_not_panic() {
        let env = Environment::at(17, 0);
        assert_eq!(env.cycle_day, 0);
        assert_eq!(env.season, Season::Spring);
    }

    #[test]
    fn test_update_overwrites() {
        let mut env = Environment::default();
        env.update(30, 100);
        assert_eq!(env, Environment::at(30, 100));
    }

    #[test]
    fn test_huge_cycle_length_does_not_overflow() {
        let env = Environment::at(u64::MAX - 1, u64::MAX);
        assert_eq!(env.cycle_day, u64::MAX - 1);
        assert_eq!(env.season, Season::Winter);
        assert!((0.7..=1.3).contains(&env.sunlight));

        let early = Environment::at(u64::MAX / 8, u64::MAX);
        assert_eq!(early.season, Season::Spring);
    }
}
