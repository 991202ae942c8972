use crate::error::{EngineError, EngineResult};
use crate::handles::PhysicsHandle;

/// Surface response parameters shared by any number of shapes.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub physics: PhysicsHandle,
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Material {
    pub fn new(
        physics: PhysicsHandle,
        static_friction: f32,
        dynamic_friction: f32,
        restitution: f32,
    ) -> EngineResult<Self> {
        validate_coefficients(static_friction, dynamic_friction, restitution)?;
        Ok(Self {
            physics,
            static_friction,
            dynamic_friction,
            restitution,
        })
    }
}

pub fn validate_coefficients(
    static_friction: f32,
    dynamic_friction: f32,
    restitution: f32,
) -> EngineResult<()> {
    if !(static_friction.is_finite() && static_friction >= 0.0) {
        return Err(EngineError::Validation(format!(
            "static friction must be finite and non-negative, got {}",
            static_friction
        )));
    }
    if !(dynamic_friction.is_finite() && dynamic_friction >= 0.0) {
        return Err(EngineError::Validation(format!(
            "dynamic friction must be finite and non-negative, got {}",
            dynamic_friction
        )));
    }
    if !(restitution.is_finite() && (0.0..=1.0).contains(&restitution)) {
        return Err(EngineError::Validation(format!(
            "restitution must be in [0, 1], got {}",
            restitution
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_bounds() {
        assert!(validate_coefficients(0.5, 0.5, 0.1).is_ok());
        assert!(validate_coefficients(0.0, 0.0, 0.0).is_ok());
        assert!(validate_coefficients(-0.1, 0.5, 0.1).is_err());
        assert!(validate_coefficients(0.5, f32::NAN, 0.1).is_err());
        assert!(validate_coefficients(0.5, 0.5, 1.5).is_err());
    }
}
