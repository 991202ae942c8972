//! Rigid actors: immovable statics and movable (optionally kinematic)
//! dynamics.

mod rigid_dynamic;
mod rigid_static;

pub use rigid_dynamic::RigidDynamic;
pub use rigid_static::RigidStatic;

/// How an applied force vector is interpreted at the next step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force (mass * distance / time^2), scaled by dt.
    Force = 0,
    /// Instant momentum change (mass * distance / time).
    Impulse = 1,
    /// Instant velocity change, mass ignored.
    VelocityChange = 2,
    /// Continuous acceleration, mass ignored, scaled by dt.
    Acceleration = 3,
}

impl ForceMode {
    /// Integer code used across the boundary.
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ForceMode::Force),
            1 => Some(ForceMode::Impulse),
            2 => Some(ForceMode::VelocityChange),
            3 => Some(ForceMode::Acceleration),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_mode_codes_roundtrip() {
        for mode in [
            ForceMode::Force,
            ForceMode::Impulse,
            ForceMode::VelocityChange,
            ForceMode::Acceleration,
        ] {
            assert_eq!(ForceMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(ForceMode::from_code(4), None);
    }
}
