//! Spherical-coordinate orbit camera with keystroke-driven force input.
//!
//! The camera is a damped point mass in (radius, azimuth, elevation) space,
//! advanced with the same collapsed RK4 recipe as the table bodies but on its
//! own fixed-rate loop (~60 Hz) and with the hard-stop boundary policy:
//! hitting a bound zeroes that axis's velocity instead of bouncing.
//!
//! Forces are fully recomputed from the current key state every tick, never
//! accumulated, so releasing a key removes its contribution immediately while
//! drag keeps decelerating the axis.

use crate::integrator::{step_axis, BoundaryPolicy};
use crate::types::{constants, Vec3};
use std::sync::atomic::{AtomicBool, Ordering};

/// Axis indices into the camera state arrays.
const RADIUS: usize = 0;
const AZIMUTH: usize = 1;
const ELEVATION: usize = 2;

/// Pressed-key flags shared between the input collaborator and the camera
/// loop.
///
/// Writers toggle flags on discrete key events; the camera loop samples them
/// once per tick. Relaxed ordering is enough, the flags carry no other data.
#[derive(Debug, Default)]
pub struct CameraInput {
    forward: AtomicBool,
    backward: AtomicBool,
    left: AtomicBool,
    right: AtomicBool,
    up: AtomicBool,
    down: AtomicBool,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_forward(&self, pressed: bool) {
        self.forward.store(pressed, Ordering::Relaxed);
    }

    pub fn set_backward(&self, pressed: bool) {
        self.backward.store(pressed, Ordering::Relaxed);
    }

    pub fn set_left(&self, pressed: bool) {
        self.left.store(pressed, Ordering::Relaxed);
    }

    pub fn set_right(&self, pressed: bool) {
        self.right.store(pressed, Ordering::Relaxed);
    }

    pub fn set_up(&self, pressed: bool) {
        self.up.store(pressed, Ordering::Relaxed);
    }

    pub fn set_down(&self, pressed: bool) {
        self.down.store(pressed, Ordering::Relaxed);
    }

    fn sample(&self) -> [bool; 6] {
        [
            self.forward.load(Ordering::Relaxed),
            self.backward.load(Ordering::Relaxed),
            self.left.load(Ordering::Relaxed),
            self.right.load(Ordering::Relaxed),
            self.up.load(Ordering::Relaxed),
            self.down.load(Ordering::Relaxed),
        ]
    }
}

/// Eye/target/up snapshot for the render sink, which builds and inverts the
/// actual view transform (it is applied to the viewpoint node, not the
/// scene).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Orbit camera around the table origin.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// (r, theta, phi)
    position: [f64; 3],
    velocity: [f64; 3],
    force: [f64; 3],
    min: [f64; 3],
    max: [f64; 3],
    mass: f64,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            position: constants::CAMERA_START,
            velocity: [0.0; 3],
            force: [0.0; 3],
            min: [constants::CAMERA_MIN_RADIUS, f64::NEG_INFINITY, 0.0],
            max: [
                constants::CAMERA_MAX_RADIUS,
                f64::INFINITY,
                constants::CAMERA_MAX_ELEVATION,
            ],
            mass: constants::CAMERA_MASS,
        }
    }

    pub fn radius(&self) -> f64 {
        self.position[RADIUS]
    }

    pub fn azimuth(&self) -> f64 {
        self.position[AZIMUTH]
    }

    pub fn elevation(&self) -> f64 {
        self.position[ELEVATION]
    }

    pub fn velocity(&self) -> [f64; 3] {
        self.velocity
    }

    /// Recompute the three axis forces from the current key state. Each call
    /// starts from zero; only drag and currently pressed keys contribute.
    pub fn apply_input(&mut self, input: &CameraInput) {
        let [forward, backward, left, right, up, down] = input.sample();

        self.force[RADIUS] = 0.0;
        if forward {
            self.force[RADIUS] -= constants::KEYSTROKE_FORCE * 1.5;
        }
        if backward {
            self.force[RADIUS] += constants::KEYSTROKE_FORCE * 1.5;
        }
        self.force[RADIUS] += -constants::CAMERA_DRAG * self.velocity[RADIUS];

        self.force[AZIMUTH] = 0.0;
        if right {
            self.force[AZIMUTH] += constants::KEYSTROKE_FORCE;
        }
        if left {
            self.force[AZIMUTH] -= constants::KEYSTROKE_FORCE;
        }
        self.force[AZIMUTH] += -constants::CAMERA_DRAG * self.velocity[AZIMUTH];

        self.force[ELEVATION] = 0.0;
        if up {
            self.force[ELEVATION] -= constants::KEYSTROKE_FORCE;
        }
        if down {
            self.force[ELEVATION] += constants::KEYSTROKE_FORCE;
        }
        self.force[ELEVATION] += -constants::CAMERA_DRAG * self.velocity[ELEVATION];
    }

    /// Advance the camera by one fixed tick.
    pub fn step(&mut self) {
        for axis in 0..3 {
            let (position, velocity) = step_axis(
                self.position[axis],
                self.velocity[axis],
                self.force[axis],
                self.mass,
                constants::CAMERA_DT,
                self.min[axis],
                self.max[axis],
                BoundaryPolicy::Stop,
            );
            self.position[axis] = position;
            self.velocity[axis] = velocity;
        }
    }

    /// Cartesian eye position reconstructed from the spherical coordinates.
    pub fn eye(&self) -> Vec3 {
        let (r, theta, phi) = (
            self.position[RADIUS],
            self.position[AZIMUTH],
            self.position[ELEVATION],
        );
        Vec3::new(
            r * theta.sin() * phi.sin(),
            r * phi.cos(),
            r * theta.cos() * phi.sin(),
        )
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye(),
            target: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
