//! Geometry of detected human hands.
//!
//! - [`geometry`] turns one hand of a [`DetectionResult`] into pixel landmarks, a bounding box,
//!   finger states and distances.
//! - [`provider`] defines the interface to the external landmark model.
//! - [`replay`] provides a model-free provider that plays back recorded detections.
//! - [`tracker`] ties a provider and the geometry extractor together, frame by frame.
//!
//! The finger heuristics assume a roughly upright hand with the palm facing the camera.
//!
//! [`DetectionResult`]: crate::landmark::DetectionResult

pub mod geometry;
pub mod provider;
pub mod replay;
pub mod tracker;
