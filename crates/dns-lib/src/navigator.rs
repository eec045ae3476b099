//! Sector navigation.
//!
//! A [`SectorNavigator`] turns a [`CoordsVelocity`] reading into a single
//! location value by scaling the sum of all four components with the
//! sector identifier:
//!
//! ```text
//! location = round_to_cents(sector_id * (x + y + z + vel))
//! ```
//!
//! The result is shaped into a [`Location`] whose JSON key depends on the
//! caller's [`SystemType`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::system::SystemType;

/// Sector identifier used when none is configured.
pub const DEFAULT_SECTOR_ID: f64 = 1.0;

/// Coordinates and velocity reported by a navigating system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordsVelocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vel: f64,
}

impl CoordsVelocity {
    pub fn new(x: f64, y: f64, z: f64, vel: f64) -> Self {
        Self { x, y, z, vel }
    }

    /// Sum of all four components.
    pub fn sum(&self) -> f64 {
        self.x + self.y + self.z + self.vel
    }
}

/// Location response shaped by system type.
///
/// Serializes as a single-key object: `{"location": v}` for ships and
/// `{"loc": v}` for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "loc")]
    Loc(f64),
    #[serde(rename = "location")]
    Location(f64),
}

impl Location {
    /// The wrapped location value.
    pub fn value(&self) -> f64 {
        match self {
            Location::Loc(v) | Location::Location(v) => *v,
        }
    }
}

/// Contract for providing navigation to the different kinds of systems.
pub trait Navigator: Send + Sync {
    /// Compute the location value for `coords`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSystemType`] when `system` is not navigable.
    fn solve(&self, coords: &CoordsVelocity, system: SystemType) -> Result<f64>;

    /// Shape `value` into the response expected by `system`.
    fn response(&self, value: f64, system: SystemType) -> Location;
}

/// Navigator for a single galaxy sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorNavigator {
    sector_id: f64,
}

impl SectorNavigator {
    pub fn new(sector_id: f64) -> Self {
        Self { sector_id }
    }

    pub fn sector_id(&self) -> f64 {
        self.sector_id
    }
}

impl Default for SectorNavigator {
    fn default() -> Self {
        Self::new(DEFAULT_SECTOR_ID)
    }
}

impl Navigator for SectorNavigator {
    fn solve(&self, coords: &CoordsVelocity, system: SystemType) -> Result<f64> {
        if !system.is_navigable() {
            return Err(Error::UnknownSystemType);
        }
        let value = self.sector_id * coords.sum();
        if !value.is_finite() {
            return Err(Error::LocationOutOfRange);
        }
        Ok(round_to_cents(value))
    }

    fn response(&self, value: f64, system: SystemType) -> Location {
        match system {
            SystemType::Ship => Location::Location(value),
            SystemType::Drone | SystemType::UltraDrone | SystemType::Unknown => Location::Loc(value),
        }
    }
}

/// Round to two decimal places.
///
/// Scales by 100 and rounds half away from zero (`f64::round`), so `0.125`
/// becomes `0.13` and `-0.125` becomes `-0.13`. Values whose binary
/// representation sits just below a `.xx5` boundary round down.
///
/// Whole numbers, and values too large to scale without overflowing, are
/// returned unchanged.
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if value.fract() == 0.0 || !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_sums_and_rounds() {
        let navigator = SectorNavigator::default();
        let cases = [
            (CoordsVelocity::new(2.0, 2.0, 2.0, 2.0), 8.0),
            (CoordsVelocity::new(21.4, 20.3, 223.5, 444.0), 709.2),
            (CoordsVelocity::new(21.44, 20.43, 223.75, 444.09), 709.71),
        ];

        for (coords, expected) in cases {
            let result = navigator.solve(&coords, SystemType::Drone).unwrap();
            assert_eq!(result, expected, "coords {:?}", coords);
        }
    }

    #[test]
    fn solve_scales_by_sector_id() {
        let navigator = SectorNavigator::new(2.5);
        let result = navigator
            .solve(&CoordsVelocity::new(1.0, 1.0, 1.0, 1.0), SystemType::Ship)
            .unwrap();
        assert_eq!(result, 10.0);
    }

    #[test]
    fn solve_rejects_non_navigable_systems() {
        let navigator = SectorNavigator::default();
        let coords = CoordsVelocity::new(1.0, 2.0, 3.0, 4.0);

        assert_eq!(
            navigator.solve(&coords, SystemType::Unknown),
            Err(Error::UnknownSystemType)
        );
        assert_eq!(
            navigator.solve(&coords, SystemType::UltraDrone),
            Err(Error::UnknownSystemType)
        );
    }

    #[test]
    fn response_key_depends_on_system() {
        let navigator = SectorNavigator::default();
        assert_eq!(
            navigator.response(138.89, SystemType::Drone),
            Location::Loc(138.89)
        );
        assert_eq!(
            navigator.response(138.89, SystemType::Ship),
            Location::Location(138.89)
        );
        assert_eq!(
            navigator.response(138.89, SystemType::Unknown),
            Location::Loc(138.89)
        );
    }

    #[test]
    fn location_serializes_as_single_key_object() {
        let loc = serde_json::to_string(&Location::Loc(1389.57)).unwrap();
        assert_eq!(loc, r#"{"loc":1389.57}"#);

        let location = serde_json::to_string(&Location::Location(1389.57)).unwrap();
        assert_eq!(location, r#"{"location":1389.57}"#);
    }

    #[test]
    fn round_to_cents_is_half_away_from_zero() {
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(-0.125), -0.13);
        assert_eq!(round_to_cents(0.375), 0.38);
        assert_eq!(round_to_cents(0.124), 0.12);
    }

    #[test]
    fn round_to_cents_keeps_values_that_cannot_be_scaled() {
        assert_eq!(round_to_cents(1e307), 1e307);
        assert_eq!(round_to_cents(-1e307), -1e307);
        assert_eq!(round_to_cents(f64::MAX), f64::MAX);
        assert!(round_to_cents(1e307).is_finite());
    }

    #[test]
    fn solve_rejects_overflowing_results() {
        let navigator = SectorNavigator::default();
        let overflow = CoordsVelocity::new(1e308, 1e308, 0.0, 0.0);
        assert_eq!(
            navigator.solve(&overflow, SystemType::Drone),
            Err(Error::LocationOutOfRange)
        );

        let scaled = SectorNavigator::new(1e10);
        let coords = CoordsVelocity::new(1e300, 0.0, 0.0, 0.0);
        assert_eq!(
            scaled.solve(&coords, SystemType::Ship),
            Err(Error::LocationOutOfRange)
        );
    }

    #[test]
    fn solve_keeps_large_finite_results() {
        let navigator = SectorNavigator::default();
        let coords = CoordsVelocity::new(1e307, 0.0, 0.0, 0.0);
        assert_eq!(navigator.solve(&coords, SystemType::Drone), Ok(1e307));
    }
}
