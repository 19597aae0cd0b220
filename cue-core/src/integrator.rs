//! Numerical integration for advancing the simulation in time.
//!
//! The integrator is a classical 4th-order Runge-Kutta step collapsed for a
//! constant-acceleration-per-step model: the driving force is held constant
//! over the step, so all four RK4 stage accelerations are equal. One scalar
//! degree of freedom is integrated at a time; camera coordinates, linear ball
//! position and ball rotation angle all share this recipe.
//!
//! ## Algorithm
//!
//! With `L = dt * (force / mass)`:
//!
//! ```text
//! K1  = dt * v
//! K23 = dt * (v + L/2)
//! K4  = dt * (v + L)
//! Δposition   = (K1 + 4*K23 + K4) / 6
//! newVelocity = v + L
//! ```
//!
//! ## Boundary policy
//!
//! The step only commits when the new position stays strictly inside
//! `(min, max)`. On violation the position update is rejected and the axis
//! velocity is either zeroed ([`BoundaryPolicy::Stop`], camera and generic
//! bodies) or sign-inverted ([`BoundaryPolicy::Bounce`], balls meeting a
//! cushion). The two call sites diverge on purpose; both branches are
//! reproduced here.

/// Result of one scalar RK4 stage: position increment and updated velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStep {
    pub delta_position: f64,
    pub velocity: f64,
}

/// What to do with an axis whose position update would leave its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Hard stop: keep the old position, zero the axis velocity.
    Stop,
    /// Elastic wall bounce: keep the old position, invert the axis velocity.
    Bounce,
}

/// Advance one degree of freedom by `dt`, ignoring bounds.
///
/// Pure: no side effects beyond the returned values, deterministic for a
/// fixed input.
pub fn rk4_step(velocity: f64, force: f64, mass: f64, dt: f64) -> AxisStep {
    let l = dt * (force / mass);
    let k1 = dt * velocity;
    let k23 = dt * (velocity + l / 2.0);
    let k4 = dt * (velocity + l);
    AxisStep {
        delta_position: (k1 + 4.0 * k23 + k4) / 6.0,
        velocity: velocity + l,
    }
}

/// Advance one bounded degree of freedom by `dt`.
///
/// Returns the new `(position, velocity)` pair after applying the boundary
/// policy described in the module docs.
#[allow(clippy::too_many_arguments)]
pub fn step_axis(
    position: f64,
    velocity: f64,
    force: f64,
    mass: f64,
    dt: f64,
    min: f64,
    max: f64,
    policy: BoundaryPolicy,
) -> (f64, f64) {
    let step = rk4_step(velocity, force, mass, dt);
    let candidate = position + step.delta_position;
    if candidate > min && candidate < max {
        (candidate, step.velocity)
    } else {
        match policy {
            BoundaryPolicy::Stop => (position, 0.0),
            BoundaryPolicy::Bounce => (position, -step.velocity),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rk4_deterministic() {
        let a = rk4_step(2.0, 3.0, 1.5, 0.009);
        let b = rk4_step(2.0, 3.0, 1.5, 0.009);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rk4_constant_velocity() {
        // No force: position advances by v*dt exactly, velocity unchanged
        let step = rk4_step(10.0, 0.0, 1.0, 0.5);
        assert!((step.delta_position - 5.0).abs() < 1e-12);
        assert!((step.velocity - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_rk4_constant_acceleration() {
        // Constant acceleration a: Δp = v*dt + a*dt²/2 (the collapsed stages
        // reduce exactly to the kinematic formula), v' = v + a*dt
        let (v, f, m, dt) = (2.0, 6.0, 3.0, 0.1);
        let a = f / m;
        let step = rk4_step(v, f, m, dt);
        assert!((step.delta_position - (v * dt + 0.5 * a * dt * dt)).abs() < 1e-12);
        assert!((step.velocity - (v + a * dt)).abs() < 1e-12);
    }

    #[test]
    fn test_step_axis_commits_inside_bounds() {
        let (p, v) = step_axis(0.0, 1.0, 0.0, 1.0, 0.1, -10.0, 10.0, BoundaryPolicy::Stop);
        assert!((p - 0.1).abs() < 1e-12);
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_axis_stop_zeroes_velocity() {
        // Large force pushes the candidate past max: position must be
        // unchanged and velocity exactly zero.
        let (p, v) = step_axis(0.9, 5.0, 100.0, 1.0, 0.1, -1.0, 1.0, BoundaryPolicy::Stop);
        assert_eq!(p, 0.9);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_step_axis_bounce_inverts_velocity() {
        // Same violation under Bounce: position unchanged, velocity is the
        // negated post-step velocity -(v + L)
        let (v0, f, m, dt) = (5.0, 100.0, 1.0, 0.1);
        let expected = -(v0 + dt * f / m);
        let (p, v) = step_axis(0.9, v0, f, m, dt, -1.0, 1.0, BoundaryPolicy::Bounce);
        assert_eq!(p, 0.9);
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn test_step_axis_boundary_is_exclusive() {
        // Landing exactly on a bound counts as a violation: the interval
        // test is strict.
        let (p, v) = step_axis(0.0, 1.0, 0.0, 1.0, 1.0, -1.0, 1.0, BoundaryPolicy::Stop);
        assert_eq!(p, 0.0);
        assert_eq!(v, 0.0);
    }
}
