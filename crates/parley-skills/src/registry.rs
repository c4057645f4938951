use crate::schema;
use crate::skill::{Skill, SkillDescriptor};
use parley_core::{render_output, ParleyError, ParleyResult, ToolCall, ToolResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Central registry for all available tools.
///
/// Name → skill dispatch table. Built once at startup and then shared behind
/// an `Arc`; nothing mutates it while turns are running.
pub struct SkillRegistry {
    skills: HashMap<String, Arc<dyn Skill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self {
            skills: HashMap::new(),
        }
    }

    /// Registers a skill under its descriptor name. A skill registered later
    /// under the same name replaces the earlier one.
    pub fn register(&mut self, skill: Arc<dyn Skill>) {
        let name = skill.descriptor().name.clone();
        if self.skills.insert(name.clone(), skill).is_some() {
            warn!(skill = %name, "Replaced previously registered skill");
        } else {
            info!(skill = %name, "Registered skill");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Skill>> {
        self.skills.get(name)
    }

    /// Descriptors of every registered skill, sorted by name so the tool list
    /// sent to the model is stable across runs.
    pub fn list_descriptors(&self) -> Vec<&SkillDescriptor> {
        let mut descriptors: Vec<_> = self.skills.values().map(|s| s.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Validate the call's arguments, then run the skill.
    ///
    /// Fails with [`ParleyError::Validation`] when the arguments do not match
    /// the declared schema and with [`ParleyError::ToolExecution`] when no
    /// skill has that name.
    pub async fn execute(&self, call: &ToolCall) -> ParleyResult<serde_json::Value> {
        let skill = self
            .skills
            .get(&call.name)
            .ok_or_else(|| ParleyError::ToolExecution(format!("Unknown tool: {}", call.name)))?;

        schema::validate(&skill.descriptor().parameters_schema, &call.arguments)?;
        skill.execute(&call.arguments).await
    }

    /// Execute a call and fold every outcome into a [`ToolResult`].
    ///
    /// - unknown tool name: empty, non-error result (no-op)
    /// - validation or executor failure: error result describing the failure
    /// - success: the output rendered by [`render_output`]
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        if !self.skills.contains_key(&call.name) {
            warn!(tool = %call.name, call_id = %call.id, "No matching tool, returning empty result");
            return ToolResult::empty(&call.id, &call.name);
        }

        match self.execute(call).await {
            Ok(value) => {
                debug!(tool = %call.name, call_id = %call.id, "Tool call succeeded");
                ToolResult::success(&call.id, &call.name, render_output(&value))
            }
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Tool call failed");
                ToolResult::error(&call.id, &call.name, format!("Error: {e}"))
            }
        }
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}
