use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Vec3;

/// Closed set of collision geometry descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Geometry {
    Sphere {
        radius: f32,
    },
    #[serde(rename_all = "camelCase")]
    Box {
        half_extents: Vec3,
    },
    #[serde(rename_all = "camelCase")]
    Capsule {
        radius: f32,
        half_height: f32,
    },
}

impl Geometry {
    /// Dimensions must be strictly positive and finite; nothing is clamped.
    pub fn validate(&self) -> EngineResult<()> {
        match *self {
            Geometry::Sphere { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(EngineError::Validation(format!(
                        "sphere radius must be positive, got {}",
                        radius
                    )));
                }
            }
            Geometry::Box { half_extents } => {
                let ok = half_extents.is_finite()
                    && half_extents.x > 0.0
                    && half_extents.y > 0.0
                    && half_extents.z > 0.0;
                if !ok {
                    return Err(EngineError::Validation(format!(
                        "box half extents must be positive, got ({}, {}, {})",
                        half_extents.x, half_extents.y, half_extents.z
                    )));
                }
            }
            Geometry::Capsule { radius, half_height } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(EngineError::Validation(format!(
                        "capsule radius must be positive, got {}",
                        radius
                    )));
                }
                if !(half_height.is_finite() && half_height > 0.0) {
                    return Err(EngineError::Validation(format!(
                        "capsule half height must be positive, got {}",
                        half_height
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_geometry_validates() {
        assert!(Geometry::Sphere { radius: 1.0 }.validate().is_ok());
        assert!(Geometry::Box { half_extents: Vec3::new(1.0, 2.0, 3.0) }.validate().is_ok());
        assert!(Geometry::Capsule { radius: 0.5, half_height: 1.0 }.validate().is_ok());
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert!(Geometry::Sphere { radius: 0.0 }.validate().is_err());
        assert!(Geometry::Sphere { radius: -1.0 }.validate().is_err());
        assert!(Geometry::Sphere { radius: f32::NAN }.validate().is_err());
        assert!(Geometry::Box { half_extents: Vec3::new(1.0, 0.0, 1.0) }.validate().is_err());
        assert!(Geometry::Capsule { radius: 1.0, half_height: -0.1 }.validate().is_err());
    }

    #[test]
    fn geometry_json_uses_tagged_camel_case() {
        let g: Geometry = serde_json::from_str(
            r#"{"type":"box","halfExtents":{"x":1.0,"y":2.0,"z":3.0}}"#,
        )
        .unwrap();
        assert_eq!(g, Geometry::Box { half_extents: Vec3::new(1.0, 2.0, 3.0) });
    }
}
