//! In-flight step state.
//!
//! On native targets the solve runs on a worker thread so the host can
//! overlap its own work and poll with `fetch_results(block=false)`. On
//! wasm32 there is no thread to spawn; the solve completes inline and the
//! first fetch simply applies it.

use crate::handles::RigidDynamicHandle;
use crate::math::{Transform, Vec3};

use super::solver;

/// Snapshot of one dynamic member taken at `simulate` time.
pub(crate) struct BodyInput {
    pub handle: RigidDynamicHandle,
    pub pose: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub kinematic: bool,
    pub kinematic_target: Option<Transform>,
    pub velocity_delta: Vec3,
    pub acceleration: Vec3,
}

/// Solved state applied back to the registry at fetch time.
pub(crate) struct BodyOutput {
    pub handle: RigidDynamicHandle,
    pub pose: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

pub(crate) struct StepJob {
    pub(crate) dt: f32,
    #[cfg(not(target_arch = "wasm32"))]
    worker: std::thread::JoinHandle<Vec<BodyOutput>>,
    #[cfg(target_arch = "wasm32")]
    results: Vec<BodyOutput>,
}

impl StepJob {
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn spawn(inputs: Vec<BodyInput>, gravity: Vec3, dt: f32) -> Self {
        let worker = std::thread::spawn(move || solver::integrate(&inputs, gravity, dt));
        Self { dt, worker }
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn spawn(inputs: Vec<BodyInput>, gravity: Vec3, dt: f32) -> Self {
        Self {
            dt,
            results: solver::integrate(&inputs, gravity, dt),
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.worker.is_finished()
        }
        #[cfg(target_arch = "wasm32")]
        {
            true
        }
    }

    /// Blocks until the solve completes. A panicking step is engine-fatal
    /// and is not masked.
    pub(crate) fn join(self) -> Vec<BodyOutput> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.worker.join().expect("simulation step worker panicked")
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.results
        }
    }
}
