//! Simulated worlds and the two-phase stepping protocol.
//!
//! A scene is either `Idle` or `Simulating`. `simulate` snapshots the
//! dynamic members into a step job and flips to `Simulating`; only a
//! successful `fetch_results` applies the solved state and flips back.
//! Membership and member-actor state are frozen in between.

mod job;
mod solver;

pub(crate) use job::{BodyInput, BodyOutput, StepJob};

use crate::handles::{PhysicsHandle, RigidDynamicHandle, RigidStaticHandle};
use crate::math::Vec3;

/// Creation-time scene parameters.
#[derive(Clone, Copy, Debug)]
pub struct SceneDesc {
    pub gravity: Vec3,
    /// Capacity hint for member storage.
    pub max_actors: u32,
    pub enable_ccd: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Idle,
    Simulating,
}

pub struct Scene {
    pub physics: PhysicsHandle,
    pub desc: SceneDesc,
    pub(crate) statics: Vec<RigidStaticHandle>,
    pub(crate) dynamics: Vec<RigidDynamicHandle>,
    pub(crate) state: StepState,
    pub(crate) job: Option<StepJob>,
    /// Accumulated simulated time, advanced on each successful fetch.
    pub sim_time: f64,
    pub frame: u64,
}

impl Scene {
    pub fn new(physics: PhysicsHandle, desc: SceneDesc) -> Self {
        let hint = desc.max_actors as usize;
        Self {
            physics,
            desc,
            statics: Vec::with_capacity(hint),
            dynamics: Vec::with_capacity(hint),
            state: StepState::Idle,
            job: None,
            sim_time: 0.0,
            frame: 0,
        }
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn is_simulating(&self) -> bool {
        self.state == StepState::Simulating
    }

    pub fn actor_count(&self) -> usize {
        self.statics.len() + self.dynamics.len()
    }
}
