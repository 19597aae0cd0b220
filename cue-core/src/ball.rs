//! Ball dynamics: the bounded body model extended with angular state,
//! rolling-friction torque and cushion bounces.
//!
//! A [`Ball`] holds a [`BodyState`] for its linear motion plus its own
//! angular state (composition rather than a class hierarchy). Its per-tick
//! update layers three things on top of the linear step:
//!
//! 1. cushion handling: a boundary violation inverts the axis velocity
//!    instead of zeroing it;
//! 2. rolling friction: the contact-point velocity against the cloth
//!    produces an opposing force whose torque drives the rotational
//!    integration;
//! 3. rest snap: once the linear rest threshold is crossed, both linear
//!    and angular velocity are forced to exactly zero so residual jitter
//!    cannot accumulate.

use crate::body::BodyState;
use crate::integrator::{rk4_step, BoundaryPolicy};
use crate::types::{constants, Mat3, Pose, Vec3};

/// A billiard ball.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub body: BodyState,
    pub radius: f64,
    pub angular_velocity: Vec3,
    /// Accumulated rotation per axis, radians.
    pub angle: Vec3,
    pub torque: Vec3,
    /// Solid-sphere moment of inertia, `0.4 * m * r²`. Computed once at
    /// creation and never mutated.
    inertia_tensor: f64,
}

impl Ball {
    pub fn new(name: impl Into<String>, mass: f64, radius: f64, position: Vec3) -> Self {
        Self {
            body: BodyState::new(name, mass, position),
            radius,
            angular_velocity: Vec3::ZERO,
            angle: Vec3::ZERO,
            torque: Vec3::ZERO,
            inertia_tensor: 0.4 * mass * radius * radius,
        }
    }

    pub fn name(&self) -> &str {
        &self.body.name
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn inertia_tensor(&self) -> f64 {
        self.inertia_tensor
    }

    pub fn is_moving(&self) -> bool {
        self.body.is_moving()
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.body.apply_force(force);
    }

    /// Advance the ball by `dt`: linear step, rolling-friction torque,
    /// rotational step, rest snap.
    pub fn step(&mut self, dt: f64) {
        self.body.step(dt, BoundaryPolicy::Bounce);

        // Vector from the ball center to the contact point with the cloth.
        let r = Vec3::new(0.0, -self.radius, 0.0);

        // Velocity of the contact point; its direction sets the friction
        // force. Guard the normalization: at dead rest the vector is exactly
        // zero and must stay that way.
        let contact_velocity = self.angular_velocity.cross(&r) + self.body.velocity;
        let contact_dir = if contact_velocity.magnitude_squared() != 0.0 {
            contact_velocity.normalized()
        } else {
            Vec3::ZERO
        };

        let friction_force = contact_dir
            * (-constants::ROLLING_FRICTION * self.body.mass * self.radius * constants::GRAVITY);
        self.torque = r.cross(&friction_force) * constants::TORQUE_GAIN;

        self.integrate_rotation(dt);

        if !self.is_moving() {
            self.body.velocity = Vec3::ZERO;
            self.angular_velocity = Vec3::ZERO;
        }
    }

    /// Rotational RK4 step driven by the current torque, followed by the
    /// unconditional per-tick spin damping.
    pub(crate) fn integrate_rotation(&mut self, dt: f64) {
        for axis in 0..3 {
            let step = rk4_step(
                self.angular_velocity[axis],
                self.torque[axis],
                self.inertia_tensor,
                dt,
            );
            self.angle[axis] += step.delta_position;
            self.angular_velocity[axis] = step.velocity;
        }
        self.angular_velocity = self.angular_velocity * constants::SPIN_DAMPING;
    }

    /// Externally visible pose: translation from position, rotation from the
    /// accumulated euler angles in X-then-Y-then-Z order.
    pub fn pose(&self) -> Pose {
        Pose {
            translation: self.body.position,
            rotation: Mat3::from_euler_xyz(self.angle.x, self.angle.y, self.angle.z),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
