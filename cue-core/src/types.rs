//! Core types for the billiards simulation.
//!
//! All units are SI:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Angular velocity: radians per second (rad/s)
//! - Mass: kilograms (kg)
//! - Force: Newtons (N)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities, forces, torques and spin.
///
/// Coordinate system:
/// - X: horizontal, along the table length
/// - Y: vertical (positive upward)
/// - Z: horizontal, along the table width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero.
    ///
    /// The zero guard matters: several friction/contact directions in the ball
    /// model are normalized from vectors that are legitimately zero at rest,
    /// and must not produce non-finite components.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Axis access for the per-axis integrator (0 = x, 1 = y, 2 = z).
impl Index<usize> for Vec3 {
    type Output = f64;
    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 axis out of range: {}", axis),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 axis out of range: {}", axis),
        }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

// =============================================================================
// Mat3 - 3x3 rotation matrix
// =============================================================================

/// A 3x3 matrix, used for the rotation part of a ball pose.
///
/// Row-major: `m[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation from accumulated per-axis euler angles (radians), composed
    /// in X-then-Y-then-Z order: `Rx * Ry * Rz`.
    pub fn from_euler_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::rotation_x(x) * Self::rotation_y(y) * Self::rotation_z(z)
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[row][k] * rhs.m[k][col]).sum();
            }
        }
        Self { m: out }
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// Pose
// =============================================================================

/// Externally visible transform of a simulated object, handed to the render
/// sink once per tick for every object whose state changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Mat3,
}

impl Pose {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Mat3::IDENTITY,
        }
    }
}

// =============================================================================
// Physical and game constants
// =============================================================================

/// Constants used throughout the simulation.
pub mod constants {
    use super::Vec3;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
    use std::time::Duration;

    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.8;

    /// Rolling friction coefficient between ball and cloth
    pub const ROLLING_FRICTION: f64 = 0.01;

    /// Linear viscous drag factor for the bounded body model.
    /// Friction force per axis is `-LINEAR_DRAG * mass * GRAVITY * v`.
    pub const LINEAR_DRAG: f64 = 0.05;

    /// Gain applied to the rolling-friction torque
    pub const TORQUE_GAIN: f64 = 100.0;

    /// Per-tick multiplicative damping on angular velocity
    pub const SPIN_DAMPING: f64 = 0.98;

    /// Squared-speed threshold below which a body counts as stopped.
    /// A termination heuristic, not a physical quantity.
    pub const REST_EPSILON: f64 = 1e-4;

    /// Small value guarding zero-length normalization
    pub const EPSILON: f64 = 1e-10;

    /// Integration step for bodies and balls (seconds)
    pub const BODY_DT: f64 = 0.009;

    /// Integration step for the camera (seconds)
    pub const CAMERA_DT: f64 = 0.01667;

    /// Wall-clock period of the shot-simulation loop
    pub const BODY_TICK: Duration = Duration::from_millis(9);

    /// Wall-clock period of the camera loop (~1/60 s)
    pub const CAMERA_TICK: Duration = Duration::from_millis(17);

    /// Force magnitude applied per pressed camera key
    pub const KEYSTROKE_FORCE: f64 = 5.0;

    /// Drag factor on camera axis velocities
    pub const CAMERA_DRAG: f64 = 8.0;

    /// Camera point mass
    pub const CAMERA_MASS: f64 = 5.0;

    /// Initial camera spherical position (r, theta, phi)
    pub const CAMERA_START: [f64; 3] = [5.0, -FRAC_PI_4, FRAC_PI_4];

    pub const CAMERA_MIN_RADIUS: f64 = 0.5;
    pub const CAMERA_MAX_RADIUS: f64 = 8.0;
    pub const CAMERA_MAX_ELEVATION: f64 = FRAC_PI_2 + 0.15;

    /// Sentinel distance the pair matrix is re-initialized to
    pub const DISTANCE_SENTINEL: f64 = 1000.0;

    /// Shot impulse magnitude is `(level + 1) * SHOT_FORCE_SCALE`
    pub const SHOT_FORCE_SCALE: f64 = 150.0;

    /// Highest selectable shot force level (levels are 0..=7)
    pub const MAX_FORCE_LEVEL: u8 = 7;

    /// Axis-aligned playing-surface bounds shared by all table bodies
    pub const TABLE_MIN: Vec3 = Vec3::new(-2.2, -0.82, -1.15);
    pub const TABLE_MAX: Vec3 = Vec3::new(2.2, -0.82, 1.15);

    /// Fixed Y coordinate of ground-shadow proxies
    pub const SHADOW_Y: f64 = -0.87;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(&b), 32.0); // 1*4 + 2*5 + 3*6 = 32
    }

    #[test]
    fn test_vec3_cross_product() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        assert!((z.x).abs() < 1e-10);
        assert!((z.y).abs() < 1e-10);
        assert!((z.z - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_vec3_normalized_zero_guard() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);

        let v = Vec3::new(3.0, 4.0, 0.0);
        let n = v.normalized();
        assert!((n.magnitude() - 1.0).abs() < 1e-10);
        assert!((n.x - 0.6).abs() < 1e-10);
        assert!((n.y - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_vec3_axis_indexing() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
        v[1] = 5.0;
        assert_eq!(v.y, 5.0);
    }

    #[test]
    fn test_mat3_rotation_y() {
        use std::f64::consts::FRAC_PI_2;
        // +X rotated 90 degrees about Y lands on -Z
        let v = Mat3::rotation_y(FRAC_PI_2) * Vec3::new(1.0, 0.0, 0.0);
        assert!(v.x.abs() < 1e-12);
        assert!((v.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mat3_euler_composition_order() {
        let x = 0.3;
        let y = -0.7;
        let z = 1.1;
        let composed = Mat3::from_euler_xyz(x, y, z);
        let manual = Mat3::rotation_x(x) * Mat3::rotation_y(y) * Mat3::rotation_z(z);
        for row in 0..3 {
            for col in 0..3 {
                assert!((composed.m[row][col] - manual.m[row][col]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_mat3_euler_zero_is_identity() {
        assert_eq!(Mat3::from_euler_xyz(0.0, 0.0, 0.0), Mat3::IDENTITY);
    }
}
