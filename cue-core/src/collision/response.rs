//! Collision response formulas.
//!
//! Two interchangeable strategies are kept behind one trait:
//!
//! - [`ImpulseResponse`]: the active model, an impulse along the contact
//!   normal with an angular-coupling term in the denominator. Each ball of a
//!   colliding pair computes its own update independently; the struck ball
//!   runs the same method with the normal negated and the roles swapped.
//! - [`RestitutionResponse`]: the legacy model, a tangential/normal
//!   decomposition using the ball's elasticity and a fixed empirical torque
//!   gain. Produces visually different, not energy-exact results. Retained
//!   as a selectable alternative; it is not wired into the default loop.
//!
//! Neither model is strictly energy conserving; see the tests, which verify
//! the formulas by direct substitution rather than against a conservation
//! law.

use crate::ball::Ball;
use crate::types::{constants, Vec3};

/// Snapshot of the other ball in a contact, read live during the collision
/// pass.
#[derive(Debug, Clone, Copy)]
pub struct ContactPeer {
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f64,
}

impl ContactPeer {
    pub fn of(ball: &Ball) -> Self {
        Self {
            velocity: ball.body.velocity,
            angular_velocity: ball.angular_velocity,
            mass: ball.body.mass,
        }
    }
}

/// Strategy interface for resolving one side of a ball-ball contact.
///
/// `contact_normal` points from `ball` toward the other ball; it does not
/// need to be pre-normalized.
pub trait CollisionResponse {
    fn respond(&self, ball: &mut Ball, other: &ContactPeer, contact_normal: Vec3);
}

/// Impulse-based response with angular coupling (the active model).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpulseResponse;

impl CollisionResponse for ImpulseResponse {
    fn respond(&self, ball: &mut Ball, other: &ContactPeer, contact_normal: Vec3) {
        let normal = contact_normal.normalized();
        if normal == Vec3::ZERO {
            return;
        }

        let inertia = ball.inertia_tensor();
        let v1_proj = ball.body.velocity.dot(&normal);
        let v2_proj = other.velocity.dot(&normal);

        // Offsets to an assumed unit-separation contact point.
        let r1 = normal * 0.5;
        let r2 = normal * -0.5;

        // Rotational terms of the impulse denominator:
        // ((r × n) * I) × r, projected onto n.
        let den1 = (r1.cross(&normal) * inertia).cross(&r1);
        let den2 = (r2.cross(&normal) * inertia).cross(&r2);
        let denominator =
            1.0 / ball.body.mass + 1.0 / other.mass + den1.dot(&normal) + den2.dot(&normal);

        let impulse = (v2_proj - v1_proj) / denominator;

        ball.body.velocity += normal * (impulse / ball.body.mass);
        ball.angular_velocity += r1.cross(&(normal * impulse)) * (1.0 / inertia);
    }
}

/// Legacy restitution-based response (deprecated, selectable).
#[derive(Debug, Clone, Copy, Default)]
pub struct RestitutionResponse;

impl CollisionResponse for RestitutionResponse {
    fn respond(&self, ball: &mut Ball, other: &ContactPeer, contact_normal: Vec3) {
        let normal = contact_normal.normalized();
        if normal == Vec3::ZERO {
            return;
        }

        let v1 = ball.body.velocity;
        let v1_proj = v1.dot(&normal);
        let v2_proj = other.velocity.dot(&normal);

        let denominator = ball.body.mass * (1.0 / ball.body.mass + 3.0 / other.mass);
        let final_proj =
            v1_proj + ((v2_proj - v1_proj) * (ball.body.elasticity + 1.0)) / denominator;

        let relative_initial = normal * v1_proj;
        let relative_final = normal * final_proj;
        let tangent = v1 - relative_initial;

        // Only the table-plane components are rewritten; the legacy formula
        // leaves Y alone.
        ball.body.velocity.x = relative_final.x + tangent.x;
        ball.body.velocity.z = relative_final.z + tangent.z;

        let r1 = normal * 0.5;
        let r2 = normal * -0.5;
        let perimeter1 = r1.cross(&ball.angular_velocity);
        let perimeter2 = r2.cross(&other.angular_velocity);
        let relative_perimeter = perimeter1 - perimeter2;

        let mut slip = relative_perimeter + tangent;
        if slip.magnitude_squared() != 0.0 {
            slip = slip.normalized();
        }
        let force = slip * (0.1 * v2_proj);
        // Fixed empirical torque gain
        ball.torque = r1.cross(&force) * (ball.inertia_tensor() * 0.1 * 25.0);
        ball.integrate_rotation(constants::BODY_DT);
    }
}

// =============================================================================
// Tests
// =============================================================================
