//! Drone navigation library entry points.
//!
//! This crate holds the navigation domain: the coordinate/velocity input,
//! the caller-declared [`SystemType`], and the [`SectorNavigator`] that turns
//! one into a rounded location value. Higher-level consumers (the HTTP
//! services) should only depend on the items exported here instead of
//! reimplementing the formula.

#![deny(warnings)]

pub mod error;
pub mod navigator;
pub mod system;

pub use error::{Error, Result};
pub use navigator::{
    round_to_cents, CoordsVelocity, Location, Navigator, SectorNavigator, DEFAULT_SECTOR_ID,
};
pub use system::SystemType;
