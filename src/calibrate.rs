//! Setup-time helpers that recover a camera's mounting angles from one
//! sighting of a target at a known position.
//!
//! The procedure: place a known target directly ahead of the robot
//! center at a measured distance, capture one frame, and feed the single
//! resulting sighting (with its camera-based yaw and pitch already
//! computed) through [`mount_angles`]. For solving a camera's field of
//! view instead, see the `fov_from_*` functions in [`crate::geometry`].

use crate::{Error, Result, Sighting, TargetSpec};

/// Horizontal mounting angle of a camera, solved from a sighting of a
/// target placed directly ahead of the robot center.
///
/// 0 means facing forward, clockwise (rightward) positive.
///
/// # Arguments
/// * `sighting_yaw` - Camera-based yaw of the sighting, radians
/// * `camera_distance` - Measured distance from the camera to the target
/// * `horizontal_offset` - Camera offset right of the robot center
pub fn horizontal_placement_angle(
    sighting_yaw: f64,
    camera_distance: f64,
    horizontal_offset: f64,
) -> f64 {
    -(horizontal_offset / camera_distance).asin() - sighting_yaw
}

/// Vertical mounting angle of a camera, solved from a sighting of a
/// target at a known height and distance.
///
/// 0 means level with the ground, upward positive.
///
/// # Arguments
/// * `sighting_pitch` - Camera-based pitch of the sighting, radians
/// * `height_diff` - Target height minus lens height
/// * `camera_distance` - Measured distance from the camera to the target
pub fn vertical_placement_angle(
    sighting_pitch: f64,
    height_diff: f64,
    camera_distance: f64,
) -> f64 {
    height_diff.atan2(camera_distance) - sighting_pitch
}

/// Solve both mounting angles of a camera from one sighting of a known
/// target placed directly ahead of the robot center.
///
/// Returns `(yaw_offset, tilt_angle)` in radians.
///
/// # Arguments
/// * `target` - The target used for calibration
/// * `distance` - Measured distance from the robot to the target
/// * `horizontal_offset` - Camera offset right of the robot center
/// * `vertical_offset` - Lens height off the ground
/// * `sighting` - The single valid sighting of the target
///
/// # Errors
/// Returns [`Error::MissingMeasurement`] when the sighting's
/// camera-based yaw or pitch has not been computed.
pub fn mount_angles(
    target: &TargetSpec,
    distance: f64,
    horizontal_offset: f64,
    vertical_offset: f64,
    sighting: &Sighting,
) -> Result<(f64, f64)> {
    let (Some(yaw), Some(pitch)) = (sighting.camera_yaw, sighting.camera_pitch) else {
        return Err(Error::MissingMeasurement(
            "sighting has no camera-based yaw or pitch; run it through the pipeline first"
                .to_string(),
        ));
    };

    let horizontal = horizontal_placement_angle(yaw, distance, horizontal_offset);
    let vertical = vertical_placement_angle(pitch, target.height() - vertical_offset, distance);
    Ok((horizontal, vertical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn calibration_sighting(yaw: Option<f64>, pitch: Option<f64>) -> Sighting {
        let mut s = Sighting::from_contour(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
        .unwrap();
        s.camera_yaw = yaw;
        s.camera_pitch = pitch;
        s
    }

    #[test]
    fn test_centered_level_camera_has_zero_angles() {
        // camera at the robot center seeing the target dead ahead at its
        // own height reads yaw 0 and pitch 0
        let target = TargetSpec::new("calib", 50.0, 1.0);
        let s = calibration_sighting(Some(0.0), Some(0.0));
        let (yaw_offset, tilt) = mount_angles(&target, 100.0, 0.0, 50.0, &s).unwrap();
        assert_relative_eq!(yaw_offset, 0.0, epsilon = 1e-12);
        assert_relative_eq!(tilt, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_angle_recovers_known_tilt() {
        // a camera tilted up by t sees a target that is truly at
        // elevation atan2(dh, d) at pitch (atan2(dh, d) - t)
        let tilt = 0.2;
        let height_diff: f64 = 30.0;
        let distance = 100.0;
        let observed_pitch = height_diff.atan2(distance) - tilt;
        assert_relative_eq!(
            vertical_placement_angle(observed_pitch, height_diff, distance),
            tilt,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_horizontal_angle_accounts_for_offset() {
        // an offset camera facing forward must see the centered target
        // slightly off-axis; the solver attributes that to the offset,
        // not to a mounting yaw
        let distance = 100.0;
        let offset: f64 = 10.0;
        let observed_yaw = -(offset / distance).asin();
        assert_relative_eq!(
            horizontal_placement_angle(observed_yaw, distance, offset),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_unprocessed_sighting_is_rejected() {
        let target = TargetSpec::new("calib", 50.0, 1.0);
        let s = calibration_sighting(Some(0.1), None);
        assert!(matches!(
            mount_angles(&target, 100.0, 0.0, 50.0, &s),
            Err(Error::MissingMeasurement(_))
        ));
    }
}
