//! Tool registry for Parley.
//!
//! A [`Skill`] is a named, schema-described async function the model may ask
//! to call. The [`SkillRegistry`] is the static dispatch table built at
//! startup and shared read-only by every chat turn.

/// Registry and dispatch table.
pub mod registry;
/// Structural validation of tool arguments.
pub mod schema;
/// The skill trait and its descriptor.
pub mod skill;

pub use registry::SkillRegistry;
pub use schema::validate;
pub use skill::{Skill, SkillDescriptor};
