//! Opaque handles and the liveness-checked registry behind them.
//!
//! Hosts never see engine memory: every resource is referenced by a packed
//! `u64` token (slot index + generation). The generation is bumped on
//! release, so a double release or a forged token resolves to nothing
//! instead of aliasing whatever reused the slot.

mod registry;

pub use registry::HandleRegistry;

/// Slot index plus generation, packed as `generation << 32 | index`.
///
/// Generations start at 1, so the raw value 0 is never a live handle and can
/// double as a null sentinel at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl RawHandle {
    pub fn pack(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    pub fn unpack(raw: u64) -> Self {
        Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) RawHandle);

        impl $name {
            /// Reconstructs a handle from its packed boundary representation.
            pub fn from_raw(raw: u64) -> Self {
                Self(RawHandle::unpack(raw))
            }

            /// Packed representation handed across the boundary.
            pub fn raw(self) -> u64 {
                self.0.pack()
            }
        }
    };
}

define_handle!(
    /// Process-wide engine root.
    FoundationHandle
);
define_handle!(
    /// Diagnostics transport created against a foundation.
    PvdHandle
);
define_handle!(
    /// Simulation subsystem instance.
    PhysicsHandle
);
define_handle!(
    /// Offline baking context used to interpret collections.
    CookingHandle
);
define_handle!(
    /// Friction/restitution descriptor shared by shapes.
    MaterialHandle
);
define_handle!(
    /// Collision geometry bound to a material.
    ShapeHandle
);
define_handle!(
    /// Immovable actor.
    RigidStaticHandle
);
define_handle!(
    /// Movable (optionally kinematic) actor.
    RigidDynamicHandle
);
define_handle!(
    /// Simulated world of actors.
    SceneHandle
);
define_handle!(
    /// Bundle of pre-authored actor templates.
    CollectionHandle
);
