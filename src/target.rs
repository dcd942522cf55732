//! Target descriptor: real-world properties of a thing being searched
//! for, plus the two-stage validation contract.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Sighting;

// Global ID counter so every target spec gets a unique map key
static TARGET_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A validation hook: takes the frame's sightings and returns the ones
/// deemed valid, in their incoming relative order.
///
/// The pre-stage hook may additionally merge sightings (see
/// [`Sighting::merge`]) when user logic determines that one physical
/// target was split into multiple detections. The post-stage hook must
/// not merge, since merging resets derived fields with nothing left in
/// the pipeline to recompute them.
pub type SightingFilter = Box<dyn Fn(Vec<Sighting>) -> Vec<Sighting> + Send + Sync>;

/// A real-world target that cameras can search for.
///
/// Immutable except for attaching the two optional validation hooks.
/// Unset hooks behave as the identity. Targets are typically created
/// once at setup, wrapped in an [`Arc`](std::sync::Arc), and shared
/// between the targeting policy and the observation store.
pub struct TargetSpec {
    id: u64,
    name: String,
    height: f64,
    aspect_ratio: f64,
    pre_filter: Option<SightingFilter>,
    post_filter: Option<SightingFilter>,
}

impl TargetSpec {
    /// Create a target spec.
    ///
    /// # Arguments
    /// * `name` - Debug name for the target
    /// * `height` - Height of the target center off the ground, in the
    ///   caller's linear units
    /// * `aspect_ratio` - Real-world width/height ratio of the target
    pub fn new(name: impl Into<String>, height: f64, aspect_ratio: f64) -> Self {
        Self {
            id: TARGET_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            height,
            aspect_ratio,
            pre_filter: None,
            post_filter: None,
        }
    }

    /// Attach or replace the pre-stage validation hook.
    ///
    /// The hook runs before any derived field has been computed and must
    /// only consult pixel-based fields. It is the one place where
    /// sightings may be merged.
    pub fn set_pre_filter(
        &mut self,
        filter: impl Fn(Vec<Sighting>) -> Vec<Sighting> + Send + Sync + 'static,
    ) {
        self.pre_filter = Some(Box::new(filter));
    }

    /// Attach or replace the post-stage validation hook.
    ///
    /// The hook runs after the full transform sequence and may consult
    /// any derived field, checking each `Option` before use. It must not
    /// merge sightings.
    pub fn set_post_filter(
        &mut self,
        filter: impl Fn(Vec<Sighting>) -> Vec<Sighting> + Send + Sync + 'static,
    ) {
        self.post_filter = Some(Box::new(filter));
    }

    /// Unique id of this target spec, usable as a map key.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Debug name of the target.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Height of the target center off the ground.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Real-world width/height ratio of the target.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Run the pre-stage hook over a batch of raw sightings. Identity
    /// when no hook is attached.
    pub(crate) fn apply_pre_filter(&self, sightings: Vec<Sighting>) -> Vec<Sighting> {
        match &self.pre_filter {
            Some(filter) => filter(sightings),
            None => sightings,
        }
    }

    /// Run the post-stage hook over a batch of processed sightings.
    /// Identity when no hook is attached.
    pub(crate) fn apply_post_filter(&self, sightings: Vec<Sighting>) -> Vec<Sighting> {
        match &self.post_filter {
            Some(filter) => filter(sightings),
            None => sightings,
        }
    }
}

impl fmt::Debug for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSpec")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("height", &self.height)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("pre_filter", &self.pre_filter.is_some())
            .field("post_filter", &self.post_filter.is_some())
            .finish()
    }
}
