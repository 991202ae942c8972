//! Scene membership and the two-phase stepping protocol.
//!
//! `simulate` snapshots every dynamic member and hands the batch to a step
//! job; the scene is frozen until `fetch_results` applies the solved state.
//! Calling either out of order is a protocol violation, not a crash.

use crate::error::{EngineError, EngineResult};
use crate::handles::{PhysicsHandle, RigidDynamicHandle, RigidStaticHandle, SceneHandle};
use crate::pvd::{PvdActorState, PvdFrame};
use crate::scene::{BodyInput, Scene, SceneDesc, StepJob, StepState};

use super::{stale, EngineCore};

pub(super) fn create_scene(
    core: &mut EngineCore,
    physics: PhysicsHandle,
    desc: SceneDesc,
) -> EngineResult<SceneHandle> {
    core.physics_ref(physics)?;
    if !desc.gravity.is_finite() {
        return Err(EngineError::Validation(
            "scene gravity must be finite".to_string(),
        ));
    }
    let handle = SceneHandle(core.scenes.insert(Scene::new(physics, desc)));
    log::info!(
        "scene created (gravity ({}, {}, {}), max actors {}, ccd {})",
        desc.gravity.x,
        desc.gravity.y,
        desc.gravity.z,
        desc.max_actors,
        desc.enable_ccd
    );
    Ok(handle)
}

pub(super) fn release_scene(core: &mut EngineCore, handle: SceneHandle) -> EngineResult<()> {
    let (statics, dynamics) = {
        let scene = core.scene_ref(handle)?;
        if scene.is_simulating() {
            return Err(EngineError::ProtocolViolation {
                op: "release scene",
                reason: "a step is in flight",
            });
        }
        (scene.statics.clone(), scene.dynamics.clone())
    };
    // Members survive the scene; they just become free-standing again.
    for actor in statics {
        if let Some(a) = core.statics.get_mut(actor.0) {
            a.scene = None;
        }
    }
    for actor in dynamics {
        if let Some(a) = core.dynamics.get_mut(actor.0) {
            a.scene = None;
        }
    }
    core.scenes.remove(handle.0);
    log::info!("scene released");
    Ok(())
}

pub(super) fn add_actor(
    core: &mut EngineCore,
    scene: SceneHandle,
    actor: RigidDynamicHandle,
) -> EngineResult<()> {
    let physics = ensure_idle_scene(core, scene, "add actor")?;
    let a = core.dynamics.get(actor.0).ok_or(stale("rigid dynamic"))?;
    if a.scene.is_some() {
        return Err(EngineError::Validation(
            "actor already belongs to a scene".to_string(),
        ));
    }
    if a.physics != physics {
        return Err(EngineError::Validation(
            "actor belongs to a different physics instance".to_string(),
        ));
    }
    core.dynamics
        .get_mut(actor.0)
        .ok_or(stale("rigid dynamic"))?
        .scene = Some(scene);
    core.scenes
        .get_mut(scene.0)
        .ok_or(stale("scene"))?
        .dynamics
        .push(actor);
    Ok(())
}

pub(super) fn remove_actor(
    core: &mut EngineCore,
    scene: SceneHandle,
    actor: RigidDynamicHandle,
) -> EngineResult<()> {
    ensure_idle_scene(core, scene, "remove actor")?;
    let a = core.dynamics.get_mut(actor.0).ok_or(stale("rigid dynamic"))?;
    if a.scene != Some(scene) {
        return Err(EngineError::Validation(
            "actor is not a member of this scene".to_string(),
        ));
    }
    a.scene = None;
    core.scenes
        .get_mut(scene.0)
        .ok_or(stale("scene"))?
        .dynamics
        .retain(|&d| d != actor);
    Ok(())
}

pub(super) fn add_static_actor(
    core: &mut EngineCore,
    scene: SceneHandle,
    actor: RigidStaticHandle,
) -> EngineResult<()> {
    let physics = ensure_idle_scene(core, scene, "add actor")?;
    let a = core.statics.get(actor.0).ok_or(stale("rigid static"))?;
    if a.scene.is_some() {
        return Err(EngineError::Validation(
            "actor already belongs to a scene".to_string(),
        ));
    }
    if a.physics != physics {
        return Err(EngineError::Validation(
            "actor belongs to a different physics instance".to_string(),
        ));
    }
    core.statics
        .get_mut(actor.0)
        .ok_or(stale("rigid static"))?
        .scene = Some(scene);
    core.scenes
        .get_mut(scene.0)
        .ok_or(stale("scene"))?
        .statics
        .push(actor);
    Ok(())
}

pub(super) fn remove_static_actor(
    core: &mut EngineCore,
    scene: SceneHandle,
    actor: RigidStaticHandle,
) -> EngineResult<()> {
    ensure_idle_scene(core, scene, "remove actor")?;
    let a = core.statics.get_mut(actor.0).ok_or(stale("rigid static"))?;
    if a.scene != Some(scene) {
        return Err(EngineError::Validation(
            "actor is not a member of this scene".to_string(),
        ));
    }
    a.scene = None;
    core.scenes
        .get_mut(scene.0)
        .ok_or(stale("scene"))?
        .statics
        .retain(|&s| s != actor);
    Ok(())
}

pub(super) fn simulate(core: &mut EngineCore, scene: SceneHandle, dt: f32) -> EngineResult<()> {
    let (members, gravity) = {
        let s = core.scene_ref(scene)?;
        if s.state != StepState::Idle {
            return Err(EngineError::ProtocolViolation {
                op: "simulate",
                reason: "previous step has not been fetched",
            });
        }
        (s.dynamics.clone(), s.desc.gravity)
    };
    if !(dt.is_finite() && dt > 0.0) {
        return Err(EngineError::Validation(format!(
            "step dt must be positive, got {}",
            dt
        )));
    }

    let mut inputs = Vec::with_capacity(members.len());
    for member in members {
        if let Some(actor) = core.dynamics.get_mut(member.0) {
            let (velocity_delta, acceleration) = actor.take_accumulated();
            inputs.push(BodyInput {
                handle: member,
                pose: actor.pose,
                linear_velocity: actor.linear_velocity,
                angular_velocity: actor.angular_velocity,
                kinematic: actor.kinematic,
                kinematic_target: actor.kinematic_target,
                velocity_delta,
                acceleration,
            });
        }
    }

    log::debug!("step begins: {} bodies, dt {}", inputs.len(), dt);
    let job = StepJob::spawn(inputs, gravity, dt);
    let s = core.scenes.get_mut(scene.0).ok_or(stale("scene"))?;
    s.job = Some(job);
    s.state = StepState::Simulating;
    Ok(())
}

pub(super) fn fetch_results(
    core: &mut EngineCore,
    scene: SceneHandle,
    block: bool,
) -> EngineResult<bool> {
    {
        let s = core.scene_ref(scene)?;
        if s.state != StepState::Simulating {
            return Err(EngineError::ProtocolViolation {
                op: "fetch results",
                reason: "no step in flight",
            });
        }
        if !block && !s.job.as_ref().map(StepJob::is_finished).unwrap_or(true) {
            return Ok(false);
        }
    }

    let (job, physics) = {
        let s = core.scenes.get_mut(scene.0).ok_or(stale("scene"))?;
        let Some(job) = s.job.take() else {
            return Err(EngineError::ProtocolViolation {
                op: "fetch results",
                reason: "no step in flight",
            });
        };
        (job, s.physics)
    };
    let dt = job.dt;
    let outputs = job.join();

    for out in &outputs {
        if let Some(actor) = core.dynamics.get_mut(out.handle.0) {
            actor.pose = out.pose;
            actor.linear_velocity = out.linear_velocity;
            actor.angular_velocity = out.angular_velocity;
            // A kinematic target is good for exactly one step.
            actor.kinematic_target = None;
        }
    }

    let (frame, sim_time) = {
        let s = core.scenes.get_mut(scene.0).ok_or(stale("scene"))?;
        s.sim_time += dt as f64;
        s.frame += 1;
        s.state = StepState::Idle;
        (s.frame, s.sim_time)
    };
    log::debug!("step fetched: frame {}, sim time {}", frame, sim_time);

    if let Some(pvd_handle) = core.physics.get(physics.0).and_then(|p| p.pvd) {
        if let Some(pvd) = core.pvds.get_mut(pvd_handle.0) {
            if pvd.is_connected() {
                let actors = outputs
                    .iter()
                    .map(|out| PvdActorState {
                        id: out.handle.raw(),
                        p: out.pose.position,
                        q: out.pose.rotation,
                    })
                    .collect();
                pvd.send_frame(&PvdFrame {
                    frame,
                    sim_time,
                    actors,
                });
            }
        }
    }

    Ok(true)
}

/// Scene must exist and be idle; returns its physics handle for membership
/// checks.
fn ensure_idle_scene(
    core: &EngineCore,
    scene: SceneHandle,
    op: &'static str,
) -> EngineResult<PhysicsHandle> {
    let s = core.scene_ref(scene)?;
    if s.is_simulating() {
        return Err(EngineError::ProtocolViolation {
            op,
            reason: "scene is simulating",
        });
    }
    Ok(s.physics)
}
