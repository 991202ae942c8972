//! Foundation, physics, cooking and debugger lifecycle.
//!
//! Version tokens are checked at creation so a host linked against a
//! different header generation fails loudly instead of corrupting state.
//! Releases scan the registries for live dependents; a parent never goes
//! away underneath its children.

use crate::error::{EngineError, EngineResult};
use crate::handles::{CookingHandle, FoundationHandle, PhysicsHandle, PvdHandle};
use crate::pvd::Pvd;

use super::{Cooking, EngineCore, Foundation, Physics};

pub(super) fn create_foundation(
    core: &mut EngineCore,
    version: u32,
    allocator: &str,
) -> EngineResult<FoundationHandle> {
    if version != crate::FOUNDATION_VERSION {
        return Err(EngineError::VersionMismatch {
            kind: "foundation",
            expected: crate::FOUNDATION_VERSION,
            got: version,
        });
    }
    let handle = FoundationHandle(core.foundations.insert(Foundation {
        version,
        allocator: allocator.to_string(),
    }));
    log::info!("foundation created (allocator: {})", allocator);
    Ok(handle)
}

pub(super) fn release_foundation(
    core: &mut EngineCore,
    handle: FoundationHandle,
) -> EngineResult<()> {
    core.foundation_ref(handle)?;
    let dependents = core
        .pvds
        .iter()
        .filter(|(_, p)| p.foundation == handle)
        .count()
        + core
            .physics
            .iter()
            .filter(|(_, p)| p.foundation == handle)
            .count()
        + core
            .cookings
            .iter()
            .filter(|(_, c)| c.foundation == handle)
            .count();
    if dependents > 0 {
        return Err(EngineError::DependentsAlive {
            kind: "foundation",
            dependents,
        });
    }
    core.foundations.remove(handle.0);
    log::info!("foundation released");
    Ok(())
}

pub(super) fn create_pvd(
    core: &mut EngineCore,
    foundation: FoundationHandle,
) -> EngineResult<PvdHandle> {
    core.foundation_ref(foundation)?;
    Ok(PvdHandle(core.pvds.insert(Pvd::new(foundation))))
}

pub(super) fn pvd_connect(
    core: &mut EngineCore,
    handle: PvdHandle,
    host: &str,
    port: u16,
) -> EngineResult<bool> {
    let pvd = core
        .pvds
        .get_mut(handle.0)
        .ok_or(EngineError::StaleHandle { kind: "pvd" })?;
    Ok(pvd.connect(host, port))
}

pub(super) fn release_pvd(core: &mut EngineCore, handle: PvdHandle) -> EngineResult<()> {
    if !core.pvds.contains(handle.0) {
        return Err(EngineError::StaleHandle { kind: "pvd" });
    }
    let dependents = core
        .physics
        .iter()
        .filter(|(_, p)| p.pvd == Some(handle))
        .count();
    if dependents > 0 {
        return Err(EngineError::DependentsAlive {
            kind: "pvd",
            dependents,
        });
    }
    // Dropping the transport closes any live connection.
    core.pvds.remove(handle.0);
    Ok(())
}

pub(super) fn create_physics(
    core: &mut EngineCore,
    version: u32,
    foundation: FoundationHandle,
    tolerance_scale: f32,
    pvd: Option<PvdHandle>,
) -> EngineResult<PhysicsHandle> {
    if version != crate::PHYSICS_VERSION {
        return Err(EngineError::VersionMismatch {
            kind: "physics",
            expected: crate::PHYSICS_VERSION,
            got: version,
        });
    }
    core.foundation_ref(foundation)?;
    if !(tolerance_scale.is_finite() && tolerance_scale > 0.0) {
        return Err(EngineError::Validation(format!(
            "tolerance scale must be positive, got {}",
            tolerance_scale
        )));
    }
    if let Some(pvd_handle) = pvd {
        let attached = core
            .pvds
            .get(pvd_handle.0)
            .ok_or(EngineError::StaleHandle { kind: "pvd" })?;
        if attached.foundation != foundation {
            return Err(EngineError::Validation(
                "pvd belongs to a different foundation".to_string(),
            ));
        }
    }
    let handle = PhysicsHandle(core.physics.insert(Physics {
        foundation,
        tolerance_scale,
        pvd,
    }));
    log::info!(
        "physics created (tolerance scale {}, pvd: {})",
        tolerance_scale,
        pvd.is_some()
    );
    Ok(handle)
}

pub(super) fn release_physics(core: &mut EngineCore, handle: PhysicsHandle) -> EngineResult<()> {
    let pvd = core.physics_ref(handle)?.pvd;
    let dependents = core
        .materials
        .iter()
        .filter(|(_, m)| m.physics == handle)
        .count()
        + core
            .shapes
            .iter()
            .filter(|(_, s)| s.physics == handle)
            .count()
        + core
            .statics
            .iter()
            .filter(|(_, a)| a.physics == handle)
            .count()
        + core
            .dynamics
            .iter()
            .filter(|(_, a)| a.physics == handle)
            .count()
        + core
            .scenes
            .iter()
            .filter(|(_, s)| s.physics == handle)
            .count()
        + core
            .collections
            .iter()
            .filter(|(_, c)| c.physics == handle)
            .count();
    if dependents > 0 {
        return Err(EngineError::DependentsAlive {
            kind: "physics",
            dependents,
        });
    }
    // The debugger stream follows the physics instance it was watching.
    if let Some(pvd_handle) = pvd {
        if let Some(pvd) = core.pvds.get_mut(pvd_handle.0) {
            pvd.disconnect();
        }
    }
    core.physics.remove(handle.0);
    log::info!("physics released");
    Ok(())
}

pub(super) fn create_cooking(
    core: &mut EngineCore,
    version: u32,
    foundation: FoundationHandle,
) -> EngineResult<CookingHandle> {
    if version != crate::PHYSICS_VERSION {
        return Err(EngineError::VersionMismatch {
            kind: "cooking",
            expected: crate::PHYSICS_VERSION,
            got: version,
        });
    }
    core.foundation_ref(foundation)?;
    Ok(CookingHandle(core.cookings.insert(Cooking {
        foundation,
        version,
    })))
}

pub(super) fn release_cooking(core: &mut EngineCore, handle: CookingHandle) -> EngineResult<()> {
    core.cooking_ref(handle)?;
    let dependents = core
        .collections
        .iter()
        .filter(|(_, c)| c.cooking == handle)
        .count();
    if dependents > 0 {
        return Err(EngineError::DependentsAlive {
            kind: "cooking",
            dependents,
        });
    }
    core.cookings.remove(handle.0);
    Ok(())
}
