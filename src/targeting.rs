//! Per-frame target selection: which targets a processing pipeline is
//! looking for on any given tick.
//!
//! Two policies exist behind one trait. [`FixedTargets`] serves a set
//! configured once at setup. [`DynamicTargets`] defers to a per-tick
//! decision closure, for setups such as a moving camera that should only
//! search for certain targets in certain positions. The closure is part
//! of the constructor, so a dynamic policy with no decision function is
//! unrepresentable; assembling a policy through [`TargetingBuilder`]
//! surfaces that same mistake as [`Error::InvalidConfig`] at build time
//! instead of silently serving an empty set.

use std::sync::Arc;

use crate::{Error, Result, TargetSpec};

/// Per-tick selector closure used by [`DynamicTargets`].
pub type TargetSelector = Box<dyn Fn() -> Vec<Arc<TargetSpec>> + Send + Sync>;

/// Decides, per frame, which targets the pipeline applies.
pub trait TargetPolicy: Send + Sync {
    /// The targets active for the current tick.
    fn active_targets(&self) -> Vec<Arc<TargetSpec>>;
}

/// A fixed set of targets configured up front.
#[derive(Default)]
pub struct FixedTargets {
    targets: Vec<Arc<TargetSpec>>,
}

impl FixedTargets {
    /// Create a policy serving the given targets every tick.
    pub fn new(targets: Vec<Arc<TargetSpec>>) -> Self {
        Self { targets }
    }

    /// Add a target to the set.
    pub fn add(&mut self, target: Arc<TargetSpec>) {
        self.targets.push(target);
    }

    /// Remove a target from the set by identity. No-op if absent.
    pub fn remove(&mut self, target: &Arc<TargetSpec>) {
        self.targets.retain(|t| t.id() != target.id());
    }

    /// Number of configured targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when no targets are configured.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl TargetPolicy for FixedTargets {
    fn active_targets(&self) -> Vec<Arc<TargetSpec>> {
        self.targets.clone()
    }
}

/// A policy that asks a user-provided closure for the active targets on
/// every tick.
pub struct DynamicTargets {
    selector: TargetSelector,
}

impl DynamicTargets {
    /// Create a dynamic policy. The selector is mandatory; there is no
    /// fallback set.
    pub fn new(selector: impl Fn() -> Vec<Arc<TargetSpec>> + Send + Sync + 'static) -> Self {
        Self {
            selector: Box::new(selector),
        }
    }
}

impl TargetPolicy for DynamicTargets {
    fn active_targets(&self) -> Vec<Arc<TargetSpec>> {
        (self.selector)()
    }
}

/// Builder for assembling a [`TargetPolicy`] from configuration.
///
/// Collects a fixed target set and/or a dynamic selector; supplying a
/// selector switches the built policy to dynamic mode. Requesting
/// dynamic mode without a selector is a configuration error at
/// [`build`](TargetingBuilder::build) time.
#[derive(Default)]
pub struct TargetingBuilder {
    targets: Vec<Arc<TargetSpec>>,
    selector: Option<TargetSelector>,
    dynamic: bool,
}

impl TargetingBuilder {
    /// Create an empty builder (fixed mode, no targets).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target to the fixed set.
    pub fn with_target(mut self, target: Arc<TargetSpec>) -> Self {
        self.targets.push(target);
        self
    }

    /// Add several targets to the fixed set.
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Arc<TargetSpec>>) -> Self {
        self.targets.extend(targets);
        self
    }

    /// Use a per-tick selector closure; implies dynamic mode.
    pub fn with_selector(
        mut self,
        selector: impl Fn() -> Vec<Arc<TargetSpec>> + Send + Sync + 'static,
    ) -> Self {
        self.selector = Some(Box::new(selector));
        self.dynamic = true;
        self
    }

    /// Request dynamic mode without (yet) supplying a selector. Exists
    /// for config layers that set the mode and the selector separately;
    /// [`build`](TargetingBuilder::build) rejects the combination if the
    /// selector never arrives.
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] when dynamic mode was requested
    /// but no selector was supplied.
    pub fn build(self) -> Result<Box<dyn TargetPolicy>> {
        if self.dynamic {
            match self.selector {
                Some(selector) => Ok(Box::new(DynamicTargets { selector })),
                None => Err(Error::InvalidConfig(
                    "dynamic targeting requested but no target selector was supplied".to_string(),
                )),
            }
        } else {
            Ok(Box::new(FixedTargets::new(self.targets)))
        }
    }
}
