//! Pure projective/trigonometric functions for camera geometry.
//!
//! Everything in this module is stateless and deterministic. Several
//! functions can produce non-finite results for degenerate inputs (a
//! camera pitched flat at a target of its own height, for example); the
//! pipeline in [`crate::observations`] treats any non-finite output as
//! "no measurement" and leaves the corresponding derived field unset.

use nalgebra::Point2;

/// Horizontal angle from the camera's optical axis to a pixel column,
/// using the pinhole model.
///
/// Positive angles are to the right of the camera center.
///
/// # Arguments
/// * `x` - The pixel's x coordinate
/// * `pixel_width` - Stream width in pixels (320 for a 320x240 stream)
/// * `hfov` - Horizontal field of view, in radians
pub fn pixel_to_horizontal_angle(x: f64, pixel_width: f64, hfov: f64) -> f64 {
    let focal_length = (pixel_width / 2.0) / (hfov / 2.0).tan();
    // -0.5 accounts for 0 being the lowest pixel value and
    // (pixel_width - 1) the highest
    let center_x = (pixel_width / 2.0) - 0.5;
    ((x - center_x) / focal_length).atan()
}

/// Vertical angle from the camera's optical axis to a pixel row, using
/// the pinhole model.
///
/// Positive angles are above the camera center. Pixel rows grow
/// downward, so the numerator is negated relative to
/// [`pixel_to_horizontal_angle`].
///
/// # Arguments
/// * `y` - The pixel's y coordinate
/// * `pixel_height` - Stream height in pixels (240 for a 320x240 stream)
/// * `vfov` - Vertical field of view, in radians
pub fn pixel_to_vertical_angle(y: f64, pixel_height: f64, vfov: f64) -> f64 {
    let focal_length = (pixel_height / 2.0) / (vfov / 2.0).tan();
    let center_y = (pixel_height / 2.0) - 0.5;
    ((center_y - y) / focal_length).atan()
}

/// Distance along the floor from the camera to a sighting, given the
/// camera-based pitch and the heights of both ends of the ray.
///
/// Returns a non-finite value when the robot-based pitch is 0 or pi
/// (the ray never crosses the target's height plane); callers must
/// treat non-finite results as "no measurement".
///
/// # Arguments
/// * `camera_pitch` - Vertical angle from the camera to the sighting,
///   not accounting for camera tilt, in radians
/// * `camera_tilt` - Upward mounting tilt of the camera, in radians
/// * `target_height` - Height of the target center off the ground
/// * `camera_height` - Height of the lens center off the ground
pub fn pitch_to_floor_distance(
    camera_pitch: f64,
    camera_tilt: f64,
    target_height: f64,
    camera_height: f64,
) -> f64 {
    let robot_pitch = camera_pitch + camera_tilt;
    let d_height = target_height - camera_height;
    // straight 3D line from the lens to the target center
    let line_distance = d_height / robot_pitch.sin();
    // projected onto the floor
    line_distance * robot_pitch.cos()
}

/// Cartesian coordinates of a sighting with the robot center at (0, 0),
/// given its polar position relative to the camera and the camera's
/// mounting placement.
///
/// +x is to the robot's right, +y is forward.
///
/// # Arguments
/// * `camera_distance` - Floor distance from the camera to the sighting
/// * `camera_yaw` - Horizontal angle from the camera to the sighting, radians
/// * `horizontal_offset` - Camera offset right of the robot center
/// * `depth_offset` - Camera offset along the forward axis
/// * `yaw_offset` - Mounting yaw of the camera, right positive, radians
pub fn polar_to_robot_cartesian(
    camera_distance: f64,
    camera_yaw: f64,
    horizontal_offset: f64,
    depth_offset: f64,
    yaw_offset: f64,
) -> Point2<f64> {
    let yaw = camera_yaw + yaw_offset;
    let x = camera_distance * yaw.sin() + horizontal_offset;
    let y = camera_distance * yaw.cos() + depth_offset;
    Point2::new(x, y)
}

/// Angle from the robot origin to a point, with 0 along the +y (forward)
/// axis and rightward angles positive.
///
/// The convention matches a manual quadrant correction over `atan(x/y)`:
/// `y >= 0` gives the base arctangent, `y < 0, x >= 0` adds pi, and the
/// remaining quadrant subtracts pi. `atan2(x, y)` reproduces those three
/// cases for all non-degenerate inputs and is what this function uses.
pub fn robot_yaw_from_cartesian(p: &Point2<f64>) -> f64 {
    p.x.atan2(p.y)
}

/// Ratio of an observed width/height aspect ratio to the target's
/// real-world aspect ratio.
pub fn relative_aspect_ratio(observed_ratio: f64, target_ratio: f64) -> f64 {
    observed_ratio / target_ratio
}

/// Horizontal rotation of a target inferred from how much its observed
/// aspect ratio has compressed relative to the real-world one.
///
/// A relative ratio of 1 or more means no visible compression and yields
/// a rotation of 0. Ratios below -1 are outside the arccosine domain and
/// yield `None` ("rotation unavailable") rather than a NaN.
pub fn rotation_from_aspect_ratio(relative_ratio: f64) -> Option<f64> {
    if relative_ratio >= 1.0 {
        return Some(0.0);
    }
    if relative_ratio < -1.0 {
        return None;
    }
    Some(relative_ratio.acos())
}

/// Solve for a camera's field of view in one dimension from a known
/// angle/pixel-coordinate correspondence. Inverse of the pinhole
/// pixel-to-angle mapping; used at setup time only.
///
/// # Arguments
/// * `coord` - Pixel coordinate of the sighting center in the dimension
///   of interest (x for horizontal FOV, y for vertical)
/// * `dimension` - Number of pixels in that dimension
/// * `angle` - Known angle to the sighting, in radians
pub fn fov_from_known_angle(coord: f64, dimension: f64, angle: f64) -> f64 {
    let center = (dimension / 2.0) - 0.5;
    let focal_length = (coord - center) / angle.tan();
    2.0 * ((dimension / 2.0) / focal_length).atan()
}

/// Solve for a camera's field of view in one dimension from a known
/// 3D-offset/pixel-coordinate correspondence. Used at setup time only.
///
/// # Arguments
/// * `coord` - Pixel coordinate of the sighting center in the dimension
///   of interest
/// * `dimension` - Number of pixels in that dimension
/// * `forward_distance` - How far forward the target is from the camera
/// * `orthogonal_distance` - How far along the orthogonal axis of
///   interest the target is from the camera (right positive for
///   horizontal, up positive for vertical), same units as above
pub fn fov_from_known_offset(
    coord: f64,
    dimension: f64,
    forward_distance: f64,
    orthogonal_distance: f64,
) -> f64 {
    let center = (dimension / 2.0) - 0.5;
    let focal_length = (coord - center) / (orthogonal_distance / forward_distance);
    2.0 * ((dimension / 2.0) / focal_length).atan()
}
