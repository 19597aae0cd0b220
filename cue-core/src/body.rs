//! Bounded body model: damped, force-driven motion for a point mass confined
//! to an axis-aligned box.
//!
//! Non-ball table objects use this model directly; balls extend it with
//! angular state (see [`crate::ball`]). Each of the three axes is integrated
//! independently with the collapsed RK4 recipe. The per-axis friction term is
//! a linear viscous drag proportional to gravity and speed, an approximation
//! of rolling/sliding resistance, not a Coulomb model.

use crate::integrator::{step_axis, BoundaryPolicy};
use crate::types::{constants, Vec3};

/// State of a force-driven point mass inside an axis-aligned box.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub name: String,
    pub mass: f64,
    /// Restitution-like coefficient; only the legacy collision formula
    /// reads it.
    pub elasticity: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub force: Vec3,
    pub min_bound: Vec3,
    pub max_bound: Vec3,
}

impl BodyState {
    /// New body at `position` confined to the table bounds.
    pub fn new(name: impl Into<String>, mass: f64, position: Vec3) -> Self {
        Self {
            name: name.into(),
            mass,
            elasticity: 1.0,
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            min_bound: constants::TABLE_MIN,
            max_bound: constants::TABLE_MAX,
        }
    }

    /// Replace the externally applied force (overwrites; forces are not
    /// accumulated across calls).
    pub fn apply_force(&mut self, force: Vec3) {
        self.force = force;
    }

    /// A body is moving iff its squared speed reaches the rest threshold.
    pub fn is_moving(&self) -> bool {
        self.velocity.magnitude_squared() >= constants::REST_EPSILON
    }

    /// Advance the body by `dt` with the given wall policy, axis by axis.
    pub fn step(&mut self, dt: f64, policy: BoundaryPolicy) {
        for axis in 0..3 {
            let friction =
                -constants::LINEAR_DRAG * self.mass * constants::GRAVITY * self.velocity[axis];
            let (position, velocity) = step_axis(
                self.position[axis],
                self.velocity[axis],
                self.force[axis] + friction,
                self.mass,
                dt,
                self.min_bound[axis],
                self.max_bound[axis],
                policy,
            );
            self.position[axis] = position;
            self.velocity[axis] = velocity;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
