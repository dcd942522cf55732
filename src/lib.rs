//! # Sightline - Vision Target Localization Library
//!
//! Sightline converts raw 2D shape detections ("sightings") found in a camera
//! frame into robot-relative spatial information: the angle, distance, and
//! position of a physical target whose real-world size is known in advance,
//! accounting for the camera's mounting geometry.
//!
//! The crate does not touch pixels. It consumes the output of an external
//! contour/blob extractor -- an ordered polygon of 2D points per detected
//! region -- and runs a fixed sequence of projective/trigonometric transforms
//! over it, with caller-injected validation hooks before and after the
//! transform stage.
//!
//! ## Features
//!
//! - Pinhole-model pixel-to-angle conversion and floor-distance recovery
//! - Mounting-offset correction into a robot-centered cartesian frame
//! - Two-stage (pre/post) validation hooks per target, with fragment merging
//! - Fixed and per-tick dynamic target-selection policies
//! - A concurrent per-camera observation store safe for background capture
//!   loops with uncoordinated readers
//!
//! ## Example
//!
//! ```rust,ignore
//! use sightline::{CameraSpec, TargetSpec, ObservationSet, Sighting};
//! use std::sync::Arc;
//!
//! // A 54deg x 41deg camera streaming 320x240, mounted at the robot center.
//! let camera = CameraSpec::new(54f64.to_radians(), 41f64.to_radians(), 320.0, 240.0);
//!
//! // A target whose center sits 80 units off the ground, twice as wide as tall.
//! let target = Arc::new(TargetSpec::new("high-goal", 80.0, 2.0));
//!
//! let observations = ObservationSet::new(camera, target);
//! observations.update(vec![Sighting::from_contour(contour)?]);
//! for sighting in observations.processed().iter() {
//!     if let Some(distance) = sighting.robot_distance {
//!         println!("target at {distance:.1} units");
//!     }
//! }
//! ```

pub mod calibrate;
pub mod camera;
pub mod geometry;
pub mod observations;
pub mod sighting;
pub mod target;
pub mod targeting;

// Re-exports for convenience
pub use camera::CameraSpec;
pub use observations::{ObservationMap, ObservationSet};
pub use sighting::Sighting;
pub use target::{SightingFilter, TargetSpec};
pub use targeting::{DynamicTargets, FixedTargets, TargetPolicy, TargetingBuilder};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the sightline library.
    ///
    /// Only configuration-time problems surface here. Numeric and domain
    /// failures during per-record transforms are recovered locally by
    /// leaving the affected derived field unset on that one
    /// [`Sighting`](crate::Sighting), never by failing the batch.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Invalid contour: {0}")]
        InvalidContour(String),

        #[error("Missing measurement: {0}")]
        MissingMeasurement(String),
    }

    /// Result type alias for sightline operations.
    pub type Result<T> = std::result::Result<T, Error>;
}
