//! Rack configuration loader.
//!
//! A rack is the set of balls on the table, loaded from a YAML file so layouts
//! can be changed without recompiling:
//!
//! ```yaml
//! balls:
//!   - name: CueBall
//!     position: [-1.0, -0.82, 0.0]
//!   - name: Ball1
//!     position: [0.8, -0.82, 0.0]
//!     mass: 1.0
//!     radius: 0.0615
//! ```
//!
//! The first entry is always the cue ball. Every ball gets a paired shadow
//! node named `Shadow<name>`; the shadow is pure presentation and carries no
//! physics state, so only its naming convention lives here.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::types::Vec3;

pub const DEFAULT_BALL_RADIUS: f64 = 0.0615;
pub const DEFAULT_BALL_MASS: f64 = 1.0;

/// Error type for rack loading operations.
#[derive(Debug)]
pub enum RackError {
    IoError(std::io::Error),
    ParseError(serde_yaml::Error),
    /// A rack without a cue ball cannot be shot.
    Empty,
    DuplicateName(String),
}

impl std::fmt::Display for RackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RackError::IoError(e) => write!(f, "IO error: {}", e),
            RackError::ParseError(e) => write!(f, "YAML parse error: {}", e),
            RackError::Empty => write!(f, "rack contains no balls"),
            RackError::DuplicateName(name) => write!(f, "duplicate ball name: {}", name),
        }
    }
}

impl std::error::Error for RackError {}

impl From<std::io::Error> for RackError {
    fn from(err: std::io::Error) -> Self {
        RackError::IoError(err)
    }
}

impl From<serde_yaml::Error> for RackError {
    fn from(err: serde_yaml::Error) -> Self {
        RackError::ParseError(err)
    }
}

/// One ball entry in a rack file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSeed {
    pub name: String,
    /// Center position, meters. Y should sit on the table plane.
    pub position: [f64; 3],
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
}

fn default_radius() -> f64 {
    DEFAULT_BALL_RADIUS
}

fn default_mass() -> f64 {
    DEFAULT_BALL_MASS
}

/// On-disk rack layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackConfig {
    pub balls: Vec<BallSeed>,
}

/// Stable index of a ball within its rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BallHandle(pub usize);

/// The in-play ball set. Index 0 is the cue ball.
#[derive(Debug, Clone)]
pub struct Rack {
    balls: Vec<Ball>,
    by_name: HashMap<String, BallHandle>,
}

impl Rack {
    pub fn from_config(config: RackConfig) -> Result<Self, RackError> {
        if config.balls.is_empty() {
            return Err(RackError::Empty);
        }
        let mut balls = Vec::with_capacity(config.balls.len());
        let mut by_name = HashMap::with_capacity(config.balls.len());
        for (index, seed) in config.balls.into_iter().enumerate() {
            if by_name
                .insert(seed.name.clone(), BallHandle(index))
                .is_some()
            {
                return Err(RackError::DuplicateName(seed.name));
            }
            balls.push(Ball::new(
                seed.name,
                seed.mass,
                seed.radius,
                Vec3::from(seed.position),
            ));
        }
        Ok(Self { balls, by_name })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RackError> {
        let config: RackConfig = serde_yaml::from_str(yaml)?;
        Self::from_config(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RackError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn handle(&self, name: &str) -> Option<BallHandle> {
        self.by_name.get(name).copied()
    }

    pub fn ball(&self, handle: BallHandle) -> &Ball {
        &self.balls[handle.0]
    }

    pub fn ball_mut(&mut self, handle: BallHandle) -> &mut Ball {
        &mut self.balls[handle.0]
    }

    pub fn cue_ball(&self) -> &Ball {
        &self.balls[0]
    }

    pub fn cue_ball_mut(&mut self) -> &mut Ball {
        &mut self.balls[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }
}

/// Name of the shadow node paired with a ball.
pub fn shadow_name(ball_name: &str) -> String {
    format!("Shadow{}", ball_name)
}

// =============================================================================
// Tests
// =============================================================================
