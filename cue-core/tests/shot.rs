//! End-to-end shot test: rack loading, the game loop thread, the shot
//! channel and the render sink working together.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cue_core::collision::ImpulseResponse;
use cue_core::rack::Rack;
use cue_core::runtime::{shot_channel, spawn_game_loop, ShotRelease};
use cue_core::simulation::{RenderSink, ShotSimulator};
use cue_core::types::{Pose, Vec3};

const RACK: &str = "\
balls:
  - name: CueBall
    position: [-1.0, -0.82, 0.0]
  - name: Ball1
    position: [0.6, -0.82, 0.0]
  - name: Ball2
    position: [0.8, -0.82, 0.1]
";

#[derive(Clone)]
struct CollectingSink {
    frames: Arc<Mutex<Vec<(String, Pose)>>>,
}

impl RenderSink for CollectingSink {
    fn apply_pose(&mut self, name: &str, pose: &Pose) {
        self.frames.lock().unwrap().push((name.to_string(), *pose));
    }
    fn apply_shadow(&mut self, _name: &str, _pose: &Pose) {}
}

#[test]
fn full_shot_through_the_game_loop() {
    let rack = Rack::from_yaml_str(RACK).expect("rack should parse");
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = CollectingSink {
        frames: Arc::clone(&frames),
    };
    let (sender, receiver) = shot_channel();
    let stop = Arc::new(AtomicBool::new(false));
    let simulator = ShotSimulator::new(Duration::ZERO, Box::new(ImpulseResponse));

    let handle = spawn_game_loop(rack, receiver, sink, simulator, stop);

    sender
        .send(ShotRelease {
            direction: Vec3::new(1.0, 0.0, 0.0),
            force_level: 4,
        })
        .expect("game loop should be listening");
    drop(sender);

    let rack = handle.join().expect("game loop should not panic");

    // Everything came to rest and the cue ball actually travelled.
    assert!(!rack.iter().any(|ball| ball.is_moving()));
    let displacement = rack.cue_ball().position() - Vec3::new(-1.0, -0.82, 0.0);
    assert!(displacement.magnitude() > 1e-6);

    // The sink saw frames for the cue ball, and every recorded position
    // stayed inside the table bounds.
    let frames = frames.lock().unwrap();
    assert!(frames.iter().any(|(name, _)| name == "CueBall"));
    for (name, pose) in frames.iter() {
        assert!(
            pose.translation.x.abs() <= 2.2 && pose.translation.z.abs() <= 1.15,
            "{} escaped the table at {:?}",
            name,
            pose.translation
        );
    }
}
