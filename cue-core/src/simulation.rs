//! Shot simulation: the fixed-rate loop that drives a rack from cue impulse
//! to full rest.
//!
//! One shot is one call to [`ShotSimulator::simulate_shot`]:
//!
//! 1. the cue ball receives an impulse force scaled by the shot's force
//!    level;
//! 2. every tick, all ordered ball pairs pass through the [`DistanceMatrix`]
//!    entering gate; entering pairs get the configured [`CollisionResponse`]
//!    applied to the observing ball (each side computes its own half with
//!    the normal reversed, reading live peer state);
//! 3. every moving ball is then stepped, and updated poses with their table
//!    shadows are pushed to the [`RenderSink`];
//! 4. the cue force is cleared after the first iteration so the impulse acts
//!    exactly once;
//! 5. the loop ends when no ball is moving, or aborts early when the stop
//!    flag is raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::collision::{CollisionResponse, ContactPeer, DistanceMatrix};
use crate::rack::{shadow_name, BallHandle, Rack};
use crate::types::{constants, Pose, Vec3};

/// A requested shot: aim direction in the table plane plus a discrete force
/// level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub direction: Vec3,
    /// 0..=7; higher levels are clamped down.
    pub force_level: u8,
}

impl Shot {
    pub fn new(direction: Vec3, force_level: u8) -> Self {
        Self {
            direction,
            force_level: force_level.min(constants::MAX_FORCE_LEVEL),
        }
    }

    /// Impulse force applied to the cue ball: level 0 already strikes, each
    /// level adds one more multiple of the base scale.
    pub fn impulse(&self) -> Vec3 {
        self.direction * ((self.force_level as f64 + 1.0) * constants::SHOT_FORCE_SCALE)
    }
}

/// Lifecycle of one simulated shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPhase {
    Idle,
    ImpulseApplied,
    Stepping,
    Settled,
}

/// Receives ball poses as the simulation advances. Implementations draw the
/// scene; the physics loop never blocks on them.
pub trait RenderSink {
    fn apply_pose(&mut self, name: &str, pose: &Pose);
    /// The shadow is a flat decal pinned to the table surface under its
    /// ball; only the X/Z translation follows the ball.
    fn apply_shadow(&mut self, name: &str, pose: &Pose);
}

/// Receives the currently charged force level while the player aims.
pub trait HudSink {
    fn show_force_level(&mut self, level: u8);
}

/// Sink that discards everything. Used by headless runs and benches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn apply_pose(&mut self, _name: &str, _pose: &Pose) {}
    fn apply_shadow(&mut self, _name: &str, _pose: &Pose) {}
}

impl HudSink for NullSink {
    fn show_force_level(&mut self, _level: u8) {}
}

/// Aiming state between shots.
///
/// The charge key cycles the force level through 0..=7 and back around;
/// every change is mirrored to the HUD so the player sees what the release
/// will fire. Releasing builds the [`Shot`] and re-arms at level 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct AimControl {
    level: u8,
}

impl AimControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn cycle(&mut self, hud: &mut dyn HudSink) -> u8 {
        self.level = (self.level + 1) % (constants::MAX_FORCE_LEVEL + 1);
        hud.show_force_level(self.level);
        self.level
    }

    pub fn release(&mut self, direction: Vec3) -> Shot {
        let shot = Shot::new(direction, self.level);
        self.level = 0;
        shot
    }
}

/// Error type for simulation runs.
#[derive(Debug)]
pub enum SimulationError {
    /// The stop flag was raised mid-shot; the rack is left as-is.
    Aborted,
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Aborted => write!(f, "simulation aborted"),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result of a completed shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotOutcome {
    /// Ticks it took the rack to settle.
    pub iterations: u64,
    pub phase: ShotPhase,
}

/// Fixed-rate shot driver.
pub struct ShotSimulator {
    /// Real-time pacing between iterations. `Duration::ZERO` runs the loop
    /// flat out, which is what tests and benches want.
    pub tick: Duration,
    pub response: Box<dyn CollisionResponse + Send + Sync>,
}

impl ShotSimulator {
    pub fn new(tick: Duration, response: Box<dyn CollisionResponse + Send + Sync>) -> Self {
        Self { tick, response }
    }

    /// Simulator paced for interactive play.
    pub fn realtime(response: Box<dyn CollisionResponse + Send + Sync>) -> Self {
        Self::new(constants::BODY_TICK, response)
    }

    /// Run one full shot to rest. Poses stream to `sink` every tick.
    pub fn simulate_shot(
        &self,
        rack: &mut Rack,
        distances: &mut DistanceMatrix,
        shot: Shot,
        sink: &mut dyn RenderSink,
        stop: &AtomicBool,
    ) -> Result<ShotOutcome, SimulationError> {
        debug_assert_eq!(distances.len(), rack.len());

        let impulse = shot.impulse();
        rack.cue_ball_mut().apply_force(impulse);
        info!(
            force_level = shot.force_level,
            ?impulse,
            "shot impulse applied"
        );

        let mut live = vec![true; rack.len()];
        let mut iterations: u64 = 0;

        loop {
            if stop.load(Ordering::Relaxed) {
                info!(iterations, "shot aborted");
                return Err(SimulationError::Aborted);
            }

            self.collision_pass(rack, distances);

            let first = iterations == 0;
            for index in 0..rack.len() {
                // Settled balls are skipped until a collision wakes them
                // through is_moving, except on the first tick where everyone
                // moves once so the cue impulse takes effect.
                let handle = BallHandle(index);
                if !(first || rack.ball(handle).is_moving()) {
                    live[index] = false;
                    continue;
                }

                rack.ball_mut(handle).step(constants::BODY_DT);
                live[index] = rack.ball(handle).is_moving();
                self.emit(rack.ball(handle), sink);
            }

            if first {
                // The impulse is a one-tick force; anything left over would
                // keep accelerating the cue ball.
                rack.cue_ball_mut().apply_force(Vec3::ZERO);
            }

            iterations += 1;
            if !live.contains(&true) {
                break;
            }
            if !self.tick.is_zero() {
                std::thread::sleep(self.tick);
            }
        }

        info!(iterations, "rack settled");
        Ok(ShotOutcome {
            iterations,
            phase: ShotPhase::Settled,
        })
    }

    /// One full ordered-pair pass through the entering gate. Pairs are
    /// visited sequentially and each response reads the peer's live,
    /// current-pass state; an entering pair therefore fires twice, once per
    /// ordered cell, and each side resolves its own half.
    fn collision_pass(&self, rack: &mut Rack, distances: &mut DistanceMatrix) {
        for index in 0..rack.len() {
            for other in 0..rack.len() {
                if other == index {
                    continue;
                }
                let this = rack.ball(BallHandle(index));
                let peer_ball = rack.ball(BallHandle(other));
                let offset = peer_ball.position() - this.position();
                let min_distance = this.radius + peer_ball.radius;
                let peer = ContactPeer::of(peer_ball);

                if distances.observe(index, other, offset.magnitude(), min_distance) {
                    debug!(
                        ball = rack.ball(BallHandle(index)).name(),
                        "collision entered"
                    );
                    self.response
                        .respond(rack.ball_mut(BallHandle(index)), &peer, offset);
                }
            }
        }
    }

    fn emit(&self, ball: &crate::ball::Ball, sink: &mut dyn RenderSink) {
        let pose = ball.pose();
        sink.apply_pose(ball.name(), &pose);

        let shadow = Pose::from_translation(Vec3::new(
            pose.translation.x,
            constants::SHADOW_Y,
            pose.translation.z,
        ));
        sink.apply_shadow(&shadow_name(ball.name()), &shadow);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ImpulseResponse;
    use crate::types::Mat3;

    const TWO_BALL_RACK: &str = "\
balls:
  - name: CueBall
    position: [-1.0, -0.82, 0.0]
  - name: Ball1
    position: [0.5, -0.82, 0.0]
";

    fn simulator() -> ShotSimulator {
        ShotSimulator::new(Duration::ZERO, Box::new(ImpulseResponse))
    }

    struct RecordingSink {
        poses: Vec<(String, Pose)>,
        shadows: Vec<(String, Pose)>,
    }

    impl RenderSink for RecordingSink {
        fn apply_pose(&mut self, name: &str, pose: &Pose) {
            self.poses.push((name.to_string(), *pose));
        }
        fn apply_shadow(&mut self, name: &str, pose: &Pose) {
            self.shadows.push((name.to_string(), *pose));
        }
    }

    #[test]
    fn test_aim_control_cycles_and_wraps() {
        struct HudRecorder(Vec<u8>);
        impl HudSink for HudRecorder {
            fn show_force_level(&mut self, level: u8) {
                self.0.push(level);
            }
        }

        let mut aim = AimControl::new();
        let mut hud = HudRecorder(Vec::new());
        for _ in 0..9 {
            aim.cycle(&mut hud);
        }
        // 0 -> 1..=7 -> wraps to 0 -> 1
        assert_eq!(hud.0, vec![1, 2, 3, 4, 5, 6, 7, 0, 1]);
        assert_eq!(aim.level(), 1);

        let shot = aim.release(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(shot.force_level, 1);
        assert_eq!(aim.level(), 0, "release must re-arm at level 0");
    }

    #[test]
    fn test_force_level_clamped() {
        let shot = Shot::new(Vec3::new(1.0, 0.0, 0.0), 200);
        assert_eq!(shot.force_level, constants::MAX_FORCE_LEVEL);
    }

    #[test]
    fn test_impulse_scales_with_level() {
        let shot = Shot::new(Vec3::new(1.0, 0.0, 0.0), 2);
        assert_eq!(shot.impulse(), Vec3::new(450.0, 0.0, 0.0));
    }

    #[test]
    fn test_shot_terminates_and_moves_the_rack() {
        let mut rack = Rack::from_yaml_str(TWO_BALL_RACK).unwrap();
        let mut distances = DistanceMatrix::new(rack.len());
        let stop = AtomicBool::new(false);

        let outcome = simulator()
            .simulate_shot(
                &mut rack,
                &mut distances,
                Shot::new(Vec3::new(1.0, 0.0, 0.0), 3),
                &mut NullSink,
                &stop,
            )
            .expect("shot should settle");

        assert_eq!(outcome.phase, ShotPhase::Settled);
        assert!(outcome.iterations > 0);
        assert!(
            outcome.iterations < 50_000,
            "drag must bring the rack to rest, took {} ticks",
            outcome.iterations
        );
        // Final resting spot is anywhere after cushion bounces; only assert
        // that the cue ball left its seed position.
        let displacement = rack.cue_ball().position() - Vec3::new(-1.0, -0.82, 0.0);
        assert!(displacement.magnitude() > 1e-6, "cue ball never moved");
        assert!(!rack.iter().any(|ball| ball.is_moving()));
    }

    #[test]
    fn test_collision_transfers_motion() {
        let mut rack = Rack::from_yaml_str(TWO_BALL_RACK).unwrap();
        let mut distances = DistanceMatrix::new(rack.len());
        let stop = AtomicBool::new(false);

        simulator()
            .simulate_shot(
                &mut rack,
                &mut distances,
                Shot::new(Vec3::new(1.0, 0.0, 0.0), 5),
                &mut NullSink,
                &stop,
            )
            .unwrap();

        let struck = rack.ball(rack.handle("Ball1").unwrap());
        let displacement = struck.position() - Vec3::new(0.5, -0.82, 0.0);
        assert!(
            displacement.magnitude() > 1e-6,
            "struck ball never received the collision, at {:?}",
            struck.position()
        );
    }

    #[test]
    fn test_sink_receives_poses_and_shadows() {
        let mut rack = Rack::from_yaml_str(TWO_BALL_RACK).unwrap();
        let mut distances = DistanceMatrix::new(rack.len());
        let stop = AtomicBool::new(false);
        let mut sink = RecordingSink {
            poses: Vec::new(),
            shadows: Vec::new(),
        };

        simulator()
            .simulate_shot(
                &mut rack,
                &mut distances,
                Shot::new(Vec3::new(1.0, 0.0, 0.0), 0),
                &mut sink,
                &stop,
            )
            .unwrap();

        assert!(!sink.poses.is_empty());
        assert_eq!(sink.poses.len(), sink.shadows.len());
        let (name, shadow) = &sink.shadows[0];
        assert_eq!(name, "ShadowCueBall");
        assert_eq!(shadow.translation.y, constants::SHADOW_Y);
        assert_eq!(shadow.rotation, Mat3::IDENTITY);
    }

    #[test]
    fn test_stop_flag_aborts() {
        let mut rack = Rack::from_yaml_str(TWO_BALL_RACK).unwrap();
        let mut distances = DistanceMatrix::new(rack.len());
        let stop = AtomicBool::new(true);

        let result = simulator().simulate_shot(
            &mut rack,
            &mut distances,
            Shot::new(Vec3::new(1.0, 0.0, 0.0), 1),
            &mut NullSink,
            &stop,
        );
        assert!(matches!(result, Err(SimulationError::Aborted)));
    }

    #[test]
    fn test_zero_level_shot_still_strikes() {
        let mut rack = Rack::from_yaml_str(TWO_BALL_RACK).unwrap();
        let mut distances = DistanceMatrix::new(rack.len());
        let stop = AtomicBool::new(false);

        let outcome = simulator()
            .simulate_shot(
                &mut rack,
                &mut distances,
                Shot::new(Vec3::new(1.0, 0.0, 0.0), 0),
                &mut NullSink,
                &stop,
            )
            .unwrap();
        // Level 0 maps to one base-scale impulse, not zero force.
        assert!(outcome.iterations > 1);
    }
}
