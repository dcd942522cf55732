//! Per-frame observation pipeline and the per-camera observation store.
//!
//! [`ObservationSet`] runs the fixed transform sequence over one frame's
//! sightings for one camera-target pair. [`ObservationMap`] is the
//! per-camera mapping from target to observation set, safe to update
//! from a background capture loop while readers query results without
//! coordination.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::{debug, trace};

use crate::geometry;
use crate::{CameraSpec, Sighting, TargetSpec};

/// Sightings of one target by one camera, refreshed wholesale every
/// frame.
///
/// [`update`](ObservationSet::update) runs the transform stages in a
/// fixed order; each stage consumes fields a prior stage computed.
/// Derived fields that hit a numeric degeneracy stay unset on that one
/// sighting, and the batch carries on. The processed collection is
/// replaced by an atomic `Arc` swap, never mutated in place, so a reader
/// on another thread always sees either the previous frame or the new
/// one in full.
pub struct ObservationSet {
    camera: CameraSpec,
    target: Arc<TargetSpec>,
    processed: RwLock<Arc<Vec<Sighting>>>,
}

impl ObservationSet {
    /// Create an observation set for one camera-target pair.
    pub fn new(camera: CameraSpec, target: Arc<TargetSpec>) -> Self {
        Self {
            camera,
            target,
            processed: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// The camera this set observes through.
    pub fn camera(&self) -> &CameraSpec {
        &self.camera
    }

    /// The target this set accumulates sightings of.
    pub fn target(&self) -> &Arc<TargetSpec> {
        &self.target
    }

    /// Process one frame's detections and replace the stored results.
    ///
    /// Stage order: pre-filter (pixel fields only, merging allowed),
    /// camera pitch, camera distance, camera yaw, robot-relative
    /// cartesian position and yaw, relative aspect ratio, rotation,
    /// post-filter. An empty batch is valid and produces an empty
    /// processed set.
    pub fn update(&self, detections: Vec<Sighting>) {
        let incoming = detections.len();
        let mut sightings = self.target.apply_pre_filter(detections);
        trace!(
            target: "sightline::observations",
            "{}: pre-filter kept {} of {} sightings",
            self.target.name(),
            sightings.len(),
            incoming
        );

        // each stage consumes fields the prior stages computed
        for s in &mut sightings {
            self.compute_camera_pitch(s);
        }
        for s in &mut sightings {
            self.compute_camera_distance(s);
        }
        for s in &mut sightings {
            self.compute_camera_yaw(s);
        }
        for s in &mut sightings {
            self.adjust_for_mount(s);
        }
        for s in &mut sightings {
            self.compute_relative_aspect_ratio(s);
        }
        for s in &mut sightings {
            self.compute_rotation(s);
        }

        let processed = self.target.apply_post_filter(sightings);
        debug!(
            target: "sightline::observations",
            "{}: {} of {} sightings valid after processing",
            self.target.name(),
            processed.len(),
            incoming
        );

        *self.processed.write().unwrap() = Arc::new(processed);
    }

    /// The most recent processed sightings. The returned `Arc` is a
    /// stable snapshot; a concurrent `update` will not change it.
    pub fn processed(&self) -> Arc<Vec<Sighting>> {
        self.processed.read().unwrap().clone()
    }

    /// Number of processed sightings from the most recent frame.
    pub fn count(&self) -> usize {
        self.processed.read().unwrap().len()
    }

    /// Vertical angle from the camera to the sighting, from its center
    /// pixel row.
    fn compute_camera_pitch(&self, s: &mut Sighting) {
        let pitch = geometry::pixel_to_vertical_angle(
            s.center.y,
            self.camera.pixel_height,
            self.camera.vertical_fov,
        );
        if pitch.is_finite() {
            s.camera_pitch = Some(pitch);
        }
    }

    /// Floor distance from the camera to the sighting, from its pitch.
    /// Left unset when the pitch is unset or the geometry is degenerate
    /// (a level ray at the target's own height never crosses it).
    fn compute_camera_distance(&self, s: &mut Sighting) {
        let Some(pitch) = s.camera_pitch else {
            return;
        };
        let distance = geometry::pitch_to_floor_distance(
            pitch,
            self.camera.tilt_angle,
            self.target.height(),
            self.camera.vertical_offset,
        );
        if distance.is_finite() {
            s.camera_distance = Some(distance);
        }
    }

    /// Horizontal angle from the camera to the sighting, from its center
    /// pixel column.
    fn compute_camera_yaw(&self, s: &mut Sighting) {
        let yaw = geometry::pixel_to_horizontal_angle(
            s.center.x,
            self.camera.pixel_width,
            self.camera.horizontal_fov,
        );
        if yaw.is_finite() {
            s.camera_yaw = Some(yaw);
        }
    }

    /// Account for the camera's placement on the robot. Treats the lens
    /// as a point offset from the robot center, converts the sighting's
    /// polar position into robot-centered cartesian coordinates, and
    /// derives the robot-based distance and yaw from those.
    fn adjust_for_mount(&self, s: &mut Sighting) {
        let (Some(distance), Some(yaw)) = (s.camera_distance, s.camera_yaw) else {
            return;
        };
        let p = geometry::polar_to_robot_cartesian(
            distance,
            yaw,
            self.camera.horizontal_offset,
            self.camera.depth_offset,
            self.camera.yaw_offset,
        );
        let robot_distance = p.x.hypot(p.y);
        let robot_yaw = geometry::robot_yaw_from_cartesian(&p);
        if robot_distance.is_finite() {
            s.robot_distance = Some(robot_distance);
        }
        if robot_yaw.is_finite() {
            s.robot_yaw = Some(robot_yaw);
        }
    }

    /// Ratio of the sighting's aspect ratio to the target's real-world
    /// one.
    fn compute_relative_aspect_ratio(&self, s: &mut Sighting) {
        let relative =
            geometry::relative_aspect_ratio(s.aspect_ratio, self.target.aspect_ratio());
        if relative.is_finite() {
            s.relative_aspect_ratio = Some(relative);
        }
    }

    /// Horizontal rotation of the target relative to the robot, from
    /// aspect-ratio compression. Coarse; targets made of multiple
    /// fragments get better results from the fragments' relative
    /// distances.
    fn compute_rotation(&self, s: &mut Sighting) {
        let Some(relative) = s.relative_aspect_ratio else {
            return;
        };
        s.robot_rotation = geometry::rotation_from_aspect_ratio(relative);
    }
}

/// Per-camera mapping from target to [`ObservationSet`].
///
/// One capture loop thread calls [`observe`](ObservationMap::observe)
/// per frame and per active target while reader threads call
/// [`sightings`](ObservationMap::sightings) and
/// [`sighting_count`](ObservationMap::sighting_count) without
/// coordination. The map itself is only write-locked for the brief
/// insert-if-absent of a first-time target; the per-target update runs
/// outside the map lock, so in-flight reads of other entries are never
/// held up.
pub struct ObservationMap {
    camera: CameraSpec,
    sets: RwLock<HashMap<u64, Arc<ObservationSet>>>,
}

impl ObservationMap {
    /// Create an empty map for one camera.
    pub fn new(camera: CameraSpec) -> Self {
        Self {
            camera,
            sets: RwLock::new(HashMap::new()),
        }
    }

    /// The camera this map stores observations for.
    pub fn camera(&self) -> &CameraSpec {
        &self.camera
    }

    /// Feed one frame's detections through the pipeline for one target,
    /// creating the target's observation set on first touch.
    pub fn observe(&self, target: &Arc<TargetSpec>, detections: Vec<Sighting>) {
        let set = {
            let mut sets = self.sets.write().unwrap();
            sets.entry(target.id())
                .or_insert_with(|| {
                    Arc::new(ObservationSet::new(self.camera.clone(), target.clone()))
                })
                .clone()
        };
        set.update(detections);
    }

    /// The most recent validated sightings of a target, or `None` for a
    /// target this map has never observed.
    pub fn sightings(&self, target: &Arc<TargetSpec>) -> Option<Arc<Vec<Sighting>>> {
        let sets = self.sets.read().unwrap();
        sets.get(&target.id()).map(|set| set.processed())
    }

    /// Number of validated sightings of a target in the most recent
    /// frame; 0 for a target this map has never observed.
    pub fn sighting_count(&self, target: &Arc<TargetSpec>) -> usize {
        let sets = self.sets.read().unwrap();
        sets.get(&target.id()).map_or(0, |set| set.count())
    }
}
