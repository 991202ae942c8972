//! Reusable simulation resources: materials, shapes, and pre-authored
//! collection bundles.

pub mod collection;
pub mod material;
pub mod shape;

pub use collection::{ActorTemplate, CollectionData, MaterialTemplate, ShapeTemplate};
pub use material::Material;
pub use shape::Shape;
