//! Sighting struct: one detected region in a single frame.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One detected region in a single frame, i.e. a time a pipeline found
/// something of interest.
///
/// A sighting carries two kinds of information. Pixel-based fields are
/// available from the moment of construction. Derived fields require the
/// transform pipeline in [`crate::ObservationSet`] and are stored as
/// independent `Option<f64>`s, each `None` until computed. Merging two
/// sightings (fragments of one physical target) recomputes the
/// pixel-based fields from the union and resets every derived field to
/// `None`, since they no longer describe the combined shape.
///
/// Sightings are per-frame: they are created from one external contour,
/// possibly merged, processed, and discarded at the end of the frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sighting {
    /// Top-left corner of the bounding box, in pixels.
    pub top_left: Point2<f64>,

    /// Center of the bounding box, in pixels.
    pub center: Point2<f64>,

    /// Bounding-box width in pixels.
    pub width: f64,

    /// Bounding-box height in pixels.
    pub height: f64,

    /// Contour area in pixels (shoelace formula, not the bounding box).
    pub area: f64,

    /// Ratio of the contour area to the bounding-box area. 1 for a full
    /// rectangle, smaller for less solid shapes.
    pub solidity: f64,

    /// Ratio of the bounding-box width to its height.
    pub aspect_ratio: f64,

    /// The ordered raw boundary points the sighting was built from.
    /// Merging appends the other sighting's points.
    pub points: Vec<Point2<f64>>,

    /// Polygonal region representation: one boundary ring per merged
    /// fragment.
    pub region: Vec<Vec<Point2<f64>>>,

    /// Number of raw sightings merged into this one (1 for an unmerged
    /// sighting).
    pub merged_count: usize,

    /// Yaw to the sighting relative to the camera, radians, right
    /// positive. `None` until the pipeline has run.
    pub camera_yaw: Option<f64>,

    /// Pitch to the sighting relative to the camera, radians, up
    /// positive. `None` until the pipeline has run.
    pub camera_pitch: Option<f64>,

    /// Floor distance from the camera lens to the sighting, in the
    /// caller's linear units. `None` until the pipeline has run, and
    /// left `None` when the pitch geometry is degenerate.
    pub camera_distance: Option<f64>,

    /// Floor distance from the robot center to the sighting. `None`
    /// until the pipeline has run.
    pub robot_distance: Option<f64>,

    /// Yaw to the sighting relative to the robot center, radians, right
    /// positive. `None` until the pipeline has run.
    pub robot_yaw: Option<f64>,

    /// Rotation of the target itself relative to the robot, inferred
    /// from aspect-ratio compression. Known to be coarse. `None` until
    /// the pipeline has run or when outside the arccosine domain.
    pub robot_rotation: Option<f64>,

    /// Ratio of this sighting's aspect ratio to the target's real-world
    /// aspect ratio. `None` until the pipeline has run.
    pub relative_aspect_ratio: Option<f64>,
}

impl Sighting {
    /// Create a sighting from an ordered boundary polygon in pixel
    /// coordinates, deriving all pixel-based fields.
    ///
    /// # Arguments
    /// * `contour` - The ordered boundary points of the detected region
    ///
    /// # Errors
    /// Returns [`Error::InvalidContour`] for an empty contour.
    pub fn from_contour(contour: Vec<Point2<f64>>) -> Result<Self> {
        if contour.is_empty() {
            return Err(Error::InvalidContour(
                "contour must contain at least one point".to_string(),
            ));
        }

        let mut min = contour[0];
        let mut max = contour[0];
        for p in &contour {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        let width = max.x - min.x;
        let height = max.y - min.y;
        let area = contour_area(&contour);

        Ok(Self {
            top_left: min,
            center: Point2::new(min.x + width / 2.0, min.y + height / 2.0),
            width,
            height,
            area,
            solidity: area / (width * height),
            aspect_ratio: width / height,
            region: vec![contour.clone()],
            points: contour,
            merged_count: 1,
            camera_yaw: None,
            camera_pitch: None,
            camera_distance: None,
            robot_distance: None,
            robot_yaw: None,
            robot_rotation: None,
            relative_aspect_ratio: None,
        })
    }

    /// Combine another sighting into this one.
    ///
    /// Intended for pre-filter hooks that recognize two fragments of one
    /// physical target (a target made of multiple pieces of reflective
    /// tape, for example). The bounding box becomes the union of both
    /// boxes, the area the sum of both areas, and solidity/aspect ratio
    /// are recomputed from the new box. Every derived field is reset to
    /// `None` regardless of whether either input had it set.
    pub fn merge(&mut self, other: Sighting) {
        self.merged_count += other.merged_count;
        self.points.extend_from_slice(&other.points);
        self.region.extend(other.region);

        let bottom_right_x = (self.top_left.x + self.width).max(other.top_left.x + other.width);
        let bottom_right_y = (self.top_left.y + self.height).max(other.top_left.y + other.height);
        self.top_left.x = self.top_left.x.min(other.top_left.x);
        self.top_left.y = self.top_left.y.min(other.top_left.y);
        self.width = bottom_right_x - self.top_left.x;
        self.height = bottom_right_y - self.top_left.y;
        self.center = Point2::new(
            self.top_left.x + self.width / 2.0,
            self.top_left.y + self.height / 2.0,
        );
        self.area += other.area;
        self.solidity = self.area / (self.width * self.height);
        self.aspect_ratio = self.width / self.height;

        // the derived values described the fragments, not the union
        self.camera_yaw = None;
        self.camera_pitch = None;
        self.camera_distance = None;
        self.robot_distance = None;
        self.robot_yaw = None;
        self.robot_rotation = None;
        self.relative_aspect_ratio = None;
    }

    /// Minimum pixel distance between this sighting's boundary and
    /// another's.
    ///
    /// For every pair of boundary segments, takes the distance from each
    /// segment's first endpoint to the other segment. This is a
    /// vertex-to-segment approximation, not exact segment-to-segment
    /// distance; callers must not rely on it where the closest points of
    /// both polygons are strictly interior to segments. O(n*m) in the
    /// boundary point counts, fine for the small polygons contour
    /// extraction produces.
    pub fn pixel_distance_to(&self, other: &Sighting) -> f64 {
        let mut min_sq = f64::MAX;
        let n = self.points.len();
        let m = other.points.len();
        for i in 0..n {
            let base_a = self.points[i];
            let base_b = self.points[(i + 1) % n];
            for j in 0..m {
                let goal_a = other.points[j];
                let goal_b = other.points[(j + 1) % m];
                min_sq = min_sq.min(point_segment_distance_sq(goal_a, base_a, base_b));
                min_sq = min_sq.min(point_segment_distance_sq(base_a, goal_a, goal_b));
            }
        }
        min_sq.sqrt()
    }

    /// True once the transform pipeline has produced a usable position
    /// for this sighting.
    pub fn is_localized(&self) -> bool {
        self.robot_distance.is_some() && self.robot_yaw.is_some()
    }
}

impl std::fmt::Display for Sighting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) to ({}, {})",
            self.top_left.x,
            self.top_left.y,
            self.top_left.x + self.width,
            self.top_left.y + self.height
        )
    }
}

/// Polygon area via the shoelace formula, matching the contour-area
/// convention of the upstream boundary extractor.
fn contour_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area.abs() / 2.0
}

/// Squared distance from a point to a line segment.
fn point_segment_distance_sq(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.norm_squared();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (ap.dot(&ab) / len_sq).clamp(0.0, 1.0)
    };
    let closest = a + ab * t;
    (p - closest).norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect_contour(x: f64, y: f64, w: f64, h: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x, y),
            Point2::new(x + w, y),
            Point2::new(x + w, y + h),
            Point2::new(x, y + h),
        ]
    }

    fn rect_sighting(x: f64, y: f64, w: f64, h: f64) -> Sighting {
        Sighting::from_contour(rect_contour(x, y, w, h)).unwrap()
    }

    #[test]
    fn test_from_contour_pixel_fields() {
        let s = rect_sighting(10.0, 20.0, 40.0, 20.0);
        assert_relative_eq!(s.top_left.x, 10.0);
        assert_relative_eq!(s.top_left.y, 20.0);
        assert_relative_eq!(s.width, 40.0);
        assert_relative_eq!(s.height, 20.0);
        assert_relative_eq!(s.center.x, 30.0);
        assert_relative_eq!(s.center.y, 30.0);
        assert_relative_eq!(s.area, 800.0);
        assert_relative_eq!(s.solidity, 1.0);
        assert_relative_eq!(s.aspect_ratio, 2.0);
        assert_eq!(s.merged_count, 1);
        assert_eq!(s.points.len(), 4);
        assert_eq!(s.region.len(), 1);
    }

    #[test]
    fn test_from_contour_derived_fields_start_unset() {
        let s = rect_sighting(0.0, 0.0, 10.0, 10.0);
        assert!(s.camera_yaw.is_none());
        assert!(s.camera_pitch.is_none());
        assert!(s.camera_distance.is_none());
        assert!(s.robot_distance.is_none());
        assert!(s.robot_yaw.is_none());
        assert!(s.robot_rotation.is_none());
        assert!(s.relative_aspect_ratio.is_none());
        assert!(!s.is_localized());
    }

    #[test]
    fn test_from_contour_triangle_area() {
        let s = Sighting::from_contour(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(s.area, 50.0);
        assert_relative_eq!(s.solidity, 0.5);
    }

    #[test]
    fn test_from_contour_empty_is_error() {
        assert!(matches!(
            Sighting::from_contour(vec![]),
            Err(Error::InvalidContour(_))
        ));
    }

    #[test]
    fn test_merge_bounding_box_is_union() {
        let mut a = rect_sighting(0.0, 0.0, 10.0, 10.0);
        let b = rect_sighting(20.0, 5.0, 10.0, 10.0);
        a.merge(b);

        assert_relative_eq!(a.top_left.x, 0.0);
        assert_relative_eq!(a.top_left.y, 0.0);
        assert_relative_eq!(a.width, 30.0);
        assert_relative_eq!(a.height, 15.0);
        assert_relative_eq!(a.center.x, 15.0);
        assert_relative_eq!(a.center.y, 7.5);
        // area sums; solidity and aspect follow the new box
        assert_relative_eq!(a.area, 200.0);
        assert_relative_eq!(a.solidity, 200.0 / 450.0);
        assert_relative_eq!(a.aspect_ratio, 2.0);
        assert_eq!(a.merged_count, 2);
        assert_eq!(a.points.len(), 8);
        assert_eq!(a.region.len(), 2);
    }

    #[test]
    fn test_merge_clears_all_derived_fields() {
        let mut a = rect_sighting(0.0, 0.0, 10.0, 10.0);
        a.camera_yaw = Some(0.1);
        a.camera_pitch = Some(0.2);
        a.camera_distance = Some(3.0);
        a.robot_distance = Some(4.0);
        a.robot_yaw = Some(0.5);
        a.robot_rotation = Some(0.6);
        a.relative_aspect_ratio = Some(0.7);

        let mut b = rect_sighting(20.0, 0.0, 10.0, 10.0);
        b.robot_distance = Some(9.0);
        a.merge(b);

        assert!(a.camera_yaw.is_none());
        assert!(a.camera_pitch.is_none());
        assert!(a.camera_distance.is_none());
        assert!(a.robot_distance.is_none());
        assert!(a.robot_yaw.is_none());
        assert!(a.robot_rotation.is_none());
        assert!(a.relative_aspect_ratio.is_none());
    }

    #[test]
    fn test_merge_is_repeatable() {
        let mut a = rect_sighting(0.0, 0.0, 10.0, 10.0);
        a.merge(rect_sighting(10.0, 0.0, 10.0, 10.0));
        a.merge(rect_sighting(20.0, 0.0, 10.0, 10.0));
        assert_eq!(a.merged_count, 3);
        assert_relative_eq!(a.width, 30.0);
        assert_relative_eq!(a.area, 300.0);
    }

    #[test]
    fn test_pixel_distance_between_separated_squares() {
        let a = rect_sighting(0.0, 0.0, 10.0, 10.0);
        let b = rect_sighting(25.0, 0.0, 10.0, 10.0);
        // closest approach is between the facing vertical edges
        assert_relative_eq!(a.pixel_distance_to(&b), 15.0, epsilon = 1e-9);
        assert_relative_eq!(b.pixel_distance_to(&a), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pixel_distance_touching_is_zero() {
        let a = rect_sighting(0.0, 0.0, 10.0, 10.0);
        let b = rect_sighting(10.0, 0.0, 10.0, 10.0);
        assert_relative_eq!(a.pixel_distance_to(&b), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pixel_distance_diagonal_offset() {
        let a = rect_sighting(0.0, 0.0, 10.0, 10.0);
        let b = rect_sighting(13.0, 14.0, 10.0, 10.0);
        // corner-to-corner: sqrt(3^2 + 4^2)
        assert_relative_eq!(a.pixel_distance_to(&b), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_display_gives_bounding_box() {
        let s = rect_sighting(1.0, 2.0, 3.0, 4.0);
        assert_eq!(s.to_string(), "(1, 2) to (4, 6)");
    }
}
