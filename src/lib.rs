//! Hand landmark geometry.
//!
//! Hand detection and landmark regression are delegated to a [`LandmarkProvider`], an external
//! model that turns an image into normalized landmark coordinates. This crate turns those
//! coordinates into things an application can act on: pixel positions, bounding boxes, which
//! fingers are extended, and distances between landmarks.
//!
//! # Coordinates
//!
//! Landmark coordinates come in two flavors:
//!
//! * *normalized* coordinates, as returned by the provider, where `(0.0, 0.0)` is the top left
//!   corner of the frame and `(1.0, 1.0)` the bottom right one;
//! * *pixel* coordinates, obtained by scaling normalized ones by the frame resolution and
//!   truncating to integers.
//!
//! Y points *down* in both.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log filter set up by [`init_logger!`].
//!
//! [`LandmarkProvider`]: hand::provider::LandmarkProvider

use log::LevelFilter;

pub mod config;
pub mod error;
pub mod hand;
pub mod image;
pub mod landmark;
pub mod timer;
pub mod video;

pub use error::GeometryError;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this crate log at *debug* level unless `RUST_LOG` says otherwise.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
