//! # Cue Core
//!
//! A physics engine for a billiards table: ball dynamics, cue shots and an
//! orbiting viewpoint, advanced on fixed-rate loops.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, Mat3, poses, physical constants)
//! - `integrator`: Numerical integration (collapsed per-axis RK4 with
//!   boundary policies)
//! - `body`: Bounded point-mass body with linear viscous drag
//! - `ball`: Ball dynamics (rolling friction, spin, cushion bounces)
//! - `camera`: Spherical orbit camera driven by keystroke forces
//! - `collision`: Pair distance gating and impulse response
//! - `rack`: YAML-based rack layout loader
//! - `simulation`: The shot loop, from cue impulse to full rest
//! - `runtime`: Camera and game loop threads with shot handoff

pub mod ball;
pub mod body;
pub mod camera;
pub mod collision;
pub mod integrator;
pub mod rack;
pub mod runtime;
pub mod simulation;
pub mod types;
