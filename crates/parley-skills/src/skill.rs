use parley_core::ParleyResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata describing a skill's interface, as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDescriptor {
    pub name: String,
    pub description: String,
    pub parameters_schema: serde_json::Value,
}

/// Trait that all tools must implement.
///
/// `execute` only ever sees arguments that already passed validation against
/// `descriptor().parameters_schema`; see [`crate::SkillRegistry::execute`].
#[async_trait]
pub trait Skill: Send + Sync {
    fn descriptor(&self) -> &SkillDescriptor;

    async fn execute(&self, arguments: &serde_json::Value) -> ParleyResult<serde_json::Value>;
}
