//! Static description of one imaging sensor and its placement.

use serde::{Deserialize, Serialize};

/// Intrinsic and mounting parameters of one camera.
///
/// All angles are in radians, image dimensions in pixels, and physical
/// offsets in whatever single linear unit the caller uses consistently
/// across camera and target specs.
///
/// Created once at setup time and never mutated afterwards. Mounting
/// fields default to zero in [`CameraSpec::new`] and are set directly
/// for cameras that are not at the robot center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    /// Horizontal field of view, radians.
    pub horizontal_fov: f64,

    /// Vertical field of view, radians.
    pub vertical_fov: f64,

    /// Frame width in pixels (320 for a 320x240 stream).
    pub pixel_width: f64,

    /// Frame height in pixels (240 for a 320x240 stream).
    pub pixel_height: f64,

    /// Lens offset right of the robot center.
    pub horizontal_offset: f64,

    /// Lens height off the ground.
    pub vertical_offset: f64,

    /// Lens offset along the robot's forward axis.
    pub depth_offset: f64,

    /// Mounting yaw, right positive, radians.
    pub yaw_offset: f64,

    /// Mounting tilt, upward positive, radians.
    pub tilt_angle: f64,
}

impl CameraSpec {
    /// Create a camera spec with the given intrinsics and all mounting
    /// parameters zeroed (lens at the robot center, on the ground,
    /// facing straight ahead and level).
    ///
    /// # Arguments
    /// * `horizontal_fov` - Horizontal field of view, radians
    /// * `vertical_fov` - Vertical field of view, radians
    /// * `pixel_width` - Frame width in pixels
    /// * `pixel_height` - Frame height in pixels
    pub fn new(horizontal_fov: f64, vertical_fov: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            horizontal_fov,
            vertical_fov,
            pixel_width,
            pixel_height,
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
            depth_offset: 0.0,
            yaw_offset: 0.0,
            tilt_angle: 0.0,
        }
    }
}
