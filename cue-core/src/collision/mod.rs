//! Ball-to-ball collision handling.
//!
//! - `detection`: the pair distance matrix and its decreasing-distance
//!   entering gate
//! - `response`: interchangeable impulse formulas applied once a pair is
//!   found to be colliding

pub mod detection;
pub mod response;

pub use detection::DistanceMatrix;
pub use response::{CollisionResponse, ContactPeer, ImpulseResponse, RestitutionResponse};
