//! Serialized collection bundles.
//!
//! A collection is a versioned JSON document holding an ordered list of
//! actor templates plus the materials they reference. The document is parsed
//! and cross-checked up front; instantiation later deep-copies templates into
//! live resources without touching the bundle again.

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::math::Geometry;

pub const COLLECTION_FORMAT_VERSION: u32 = 1;

/// Validated, immutable contents of a loaded collection.
#[derive(Clone, Debug)]
pub struct CollectionData {
    pub name: Option<String>,
    pub materials: Vec<MaterialTemplate>,
    pub actors: Vec<ActorTemplate>,
}

#[derive(Clone, Copy, Debug)]
pub struct MaterialTemplate {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct ShapeTemplate {
    pub geometry: Geometry,
    /// Index into [`CollectionData::materials`].
    pub material: usize,
}

#[derive(Clone, Debug)]
pub struct ActorTemplate {
    pub name: Option<String>,
    /// Used when the template is instantiated as a dynamic/kinematic actor.
    pub mass: f32,
    pub shapes: Vec<ShapeTemplate>,
}

impl CollectionData {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let root: BundleRoot =
            serde_json::from_str(json).map_err(|e| EngineError::Parse(e.to_string()))?;
        Self::from_bundle(root)
    }

    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        let json = std::str::from_utf8(bytes)
            .map_err(|e| EngineError::Parse(format!("collection is not valid utf-8: {}", e)))?;
        Self::from_json(json)
    }

    pub fn from_file(path: &str) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn template_count(&self) -> usize {
        self.actors.len()
    }

    fn from_bundle(root: BundleRoot) -> EngineResult<Self> {
        if root.format_version != COLLECTION_FORMAT_VERSION {
            return Err(EngineError::Parse(format!(
                "unsupported collection format version {} (expected {})",
                root.format_version, COLLECTION_FORMAT_VERSION
            )));
        }

        let mut materials = Vec::with_capacity(root.materials.len());
        for (idx, m) in root.materials.iter().enumerate() {
            crate::domain::material::validate_coefficients(
                m.static_friction,
                m.dynamic_friction,
                m.restitution,
            )
            .map_err(|e| EngineError::Parse(format!("material {}: {}", idx, e)))?;
            materials.push(MaterialTemplate {
                static_friction: m.static_friction,
                dynamic_friction: m.dynamic_friction,
                restitution: m.restitution,
            });
        }

        let mut actors = Vec::with_capacity(root.actors.len());
        for (idx, a) in root.actors.into_iter().enumerate() {
            if a.shapes.is_empty() {
                return Err(EngineError::Parse(format!(
                    "actor template {} has no shapes",
                    idx
                )));
            }
            let mass = a.mass.unwrap_or(1.0);
            if !(mass.is_finite() && mass > 0.0) {
                return Err(EngineError::Parse(format!(
                    "actor template {}: mass must be positive, got {}",
                    idx, mass
                )));
            }

            let mut shapes = Vec::with_capacity(a.shapes.len());
            for (sidx, s) in a.shapes.into_iter().enumerate() {
                s.geometry.validate().map_err(|e| {
                    EngineError::Parse(format!("actor template {} shape {}: {}", idx, sidx, e))
                })?;
                if s.material as usize >= materials.len() {
                    return Err(EngineError::Parse(format!(
                        "actor template {} shape {}: material index {} out of range ({} materials)",
                        idx,
                        sidx,
                        s.material,
                        materials.len()
                    )));
                }
                shapes.push(ShapeTemplate {
                    geometry: s.geometry,
                    material: s.material as usize,
                });
            }

            actors.push(ActorTemplate {
                name: a.name,
                mass,
                shapes,
            });
        }

        Ok(Self {
            name: root.name,
            materials,
            actors,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleRoot {
    format_version: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    materials: Vec<BundleMaterial>,
    actors: Vec<BundleActor>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleMaterial {
    static_friction: f32,
    dynamic_friction: f32,
    restitution: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleActor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mass: Option<f32>,
    shapes: Vec<BundleShape>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleShape {
    geometry: Geometry,
    material: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    const BUNDLE: &str = r#"{
        "formatVersion": 1,
        "name": "level01",
        "materials": [
            {"staticFriction": 0.5, "dynamicFriction": 0.5, "restitution": 0.1}
        ],
        "actors": [
            {"name": "crate", "mass": 10.0,
             "shapes": [{"geometry": {"type": "box", "halfExtents": {"x": 1.0, "y": 1.0, "z": 1.0}}, "material": 0}]},
            {"name": "ball",
             "shapes": [{"geometry": {"type": "sphere", "radius": 0.5}, "material": 0}]}
        ]
    }"#;

    #[test]
    fn parses_and_validates_bundle() {
        let data = CollectionData::from_json(BUNDLE).unwrap();
        assert_eq!(data.name.as_deref(), Some("level01"));
        assert_eq!(data.template_count(), 2);
        assert_eq!(data.actors[0].mass, 10.0);
        // Mass defaults to 1.0 when omitted.
        assert_eq!(data.actors[1].mass, 1.0);
        assert_eq!(
            data.actors[0].shapes[0].geometry,
            Geometry::Box { half_extents: Vec3::new(1.0, 1.0, 1.0) }
        );
    }

    #[test]
    fn rejects_wrong_format_version() {
        let err = CollectionData::from_json(r#"{"formatVersion": 2, "actors": []}"#).unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn rejects_out_of_range_material_index() {
        let json = r#"{
            "formatVersion": 1,
            "materials": [],
            "actors": [{"shapes": [{"geometry": {"type": "sphere", "radius": 1.0}, "material": 0}]}]
        }"#;
        assert!(matches!(
            CollectionData::from_json(json),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn rejects_invalid_geometry_in_bundle() {
        let json = r#"{
            "formatVersion": 1,
            "materials": [{"staticFriction": 0.5, "dynamicFriction": 0.5, "restitution": 0.1}],
            "actors": [{"shapes": [{"geometry": {"type": "sphere", "radius": -1.0}, "material": 0}]}]
        }"#;
        assert!(matches!(
            CollectionData::from_json(json),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn rejects_non_utf8_memory_buffer() {
        assert!(matches!(
            CollectionData::from_bytes(&[0xff, 0xfe, 0x00]),
            Err(EngineError::Parse(_))
        ));
    }
}
