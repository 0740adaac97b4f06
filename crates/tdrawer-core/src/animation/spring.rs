#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) for pixel-space slides.
//!
//! Models
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! with semi-implicit Euler integration. Positions are in pixels and the
//! spring snaps to the exact target once it comes to rest, so callers that
//! round to integer offsets always land on the requested pixel.
//!
//! # Invariants
//!
//! 1. A spring at rest reports `position() == target()` exactly.
//! 2. A spring at rest does not move until [`Spring::retarget`] is called.
//! 3. Stiffness is always positive (clamped on construction).
//!
//! # Failure Modes
//!
//! - Very large dt: subdivided into steps of at most 4ms.
//! - Zero damping: oscillates forever and never comes to rest.

use std::time::Duration;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Distance (px) below which the spring may come to rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.5;

/// Speed (px/s) below which the spring may come to rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 5.0;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// Default stiffness for drawer slides. Critically damped this settles a
/// full-screen slide in roughly half a second.
pub const DEFAULT_SLIDE_STIFFNESS: f64 = 400.0;

/// A damped spring moving a single pixel coordinate toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial` heading for `target`.
    ///
    /// Default parameters are critically damped with
    /// [`DEFAULT_SLIDE_STIFFNESS`].
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        let stiffness = DEFAULT_SLIDE_STIFFNESS;
        let mut spring = Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        };
        spring.settle_if_resting();
        spring
    }

    /// Set stiffness (builder pattern). Clamped to minimum 0.1.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Set damping (builder pattern). Clamped to minimum 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Use critical damping for the current stiffness (builder pattern).
    #[must_use]
    pub fn critically_damped(mut self) -> Self {
        self.damping = self.critical_damping();
        self
    }

    /// Set rest threshold in pixels (builder pattern).
    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Critical damping coefficient for the current stiffness.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    /// Restart from `position` toward `target`, keeping current velocity.
    ///
    /// Used when a slide is redirected mid-flight so the motion stays
    /// continuous.
    pub fn retarget(&mut self, position: f64, target: f64) {
        self.position = position;
        self.target = target;
        self.at_rest = false;
        self.settle_if_resting();
    }

    /// Stop immediately at the current position.
    pub fn halt(&mut self) {
        self.target = self.position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        self.settle_if_resting();
    }

    fn settle_if_resting(&mut self) {
        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
