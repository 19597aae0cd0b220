//! Thread plumbing for interactive play.
//!
//! Two fixed-rate loops run concurrently and never share mutable state
//! directly:
//!
//! - the **camera loop** (~60 Hz) samples the shared [`CameraInput`] flags,
//!   steps the orbit camera and hands the resulting pose to a callback;
//! - the **game loop** blocks on a rendezvous channel of [`ShotRelease`]
//!   messages and runs one full shot per message, owning the rack and the
//!   distance matrix for the whole session.
//!
//! The shot channel has capacity 1: a release submitted while a shot is
//! still in flight parks the sender until the rack settles, so at most one
//! shot is ever queued and none are dropped.
//!
//! Shutdown is cooperative: raising the stop flag ends both loops at their
//! next check, and dropping all senders ends the game loop once the current
//! shot finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use crate::camera::{CameraInput, CameraPose, OrbitCamera};
use crate::collision::DistanceMatrix;
use crate::rack::Rack;
use crate::simulation::{RenderSink, Shot, ShotSimulator, SimulationError};
use crate::types::{constants, Vec3};

/// A released shot, sent from the aiming side to the game loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRelease {
    pub direction: Vec3,
    pub force_level: u8,
}

/// Rendezvous channel for shot handoff. Capacity 1: the sender blocks while
/// a previous shot is still simulating.
pub fn shot_channel() -> (SyncSender<ShotRelease>, Receiver<ShotRelease>) {
    mpsc::sync_channel(1)
}

/// Spawn the camera loop. Each tick samples the key flags, advances the
/// camera and reports the new pose.
pub fn spawn_camera_loop<F>(
    mut camera: OrbitCamera,
    input: Arc<CameraInput>,
    mut on_pose: F,
    stop: Arc<AtomicBool>,
) -> JoinHandle<OrbitCamera>
where
    F: FnMut(CameraPose) + Send + 'static,
{
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            camera.apply_input(&input);
            camera.step();
            on_pose(camera.pose());
            thread::sleep(constants::CAMERA_TICK);
        }
        info!("camera loop stopped");
        camera
    })
}

/// Spawn the game loop. Owns the rack for its lifetime and hands it back on
/// join so a session can inspect the final table state.
pub fn spawn_game_loop<S>(
    mut rack: Rack,
    releases: Receiver<ShotRelease>,
    mut sink: S,
    simulator: ShotSimulator,
    stop: Arc<AtomicBool>,
) -> JoinHandle<Rack>
where
    S: RenderSink + Send + 'static,
{
    thread::spawn(move || {
        let mut distances = DistanceMatrix::new(rack.len());
        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            // Short timeout so the stop flag is observed even when no shot
            // ever arrives.
            let release = match releases.recv_timeout(Duration::from_millis(50)) {
                Ok(release) => release,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            let shot = Shot::new(release.direction, release.force_level);
            match simulator.simulate_shot(&mut rack, &mut distances, shot, &mut sink, &stop) {
                Ok(outcome) => {
                    info!(iterations = outcome.iterations, "shot completed");
                }
                Err(SimulationError::Aborted) => {
                    warn!("shot aborted by stop flag");
                    break;
                }
            }
        }
        info!("game loop stopped");
        rack
    })
}

// =============================================================================
// Tests
// =============================================================================
