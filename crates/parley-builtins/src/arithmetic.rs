use parley_core::{ParleyError, ParleyResult};
use parley_skills::{Skill, SkillDescriptor};
use async_trait::async_trait;
use serde_json::Value;

/// Adds two numbers.
///
/// Two integer operands produce an integer (so 15 + 27 renders as `42`, not
/// `42.0`); anything else is summed as `f64`.
pub struct AddSkill {
    descriptor: SkillDescriptor,
}

impl AddSkill {
    pub fn new() -> Self {
        Self {
            descriptor: SkillDescriptor {
                name: "add_two_numbers".to_string(),
                description: "Add two numbers".to_string(),
                parameters_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "a": {"type": "number"},
                        "b": {"type": "number"}
                    },
                    "required": ["a", "b"]
                }),
            },
        }
    }
}

impl Default for AddSkill {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Skill for AddSkill {
    fn descriptor(&self) -> &SkillDescriptor {
        &self.descriptor
    }

    async fn execute(&self, arguments: &Value) -> ParleyResult<Value> {
        let (a, b) = (&arguments["a"], &arguments["b"]);

        if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
            if let Some(sum) = x.checked_add(y) {
                return Ok(Value::from(sum));
            }
        }

        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => serde_json::Number::from_f64(x + y)
                .map(Value::Number)
                .ok_or_else(|| ParleyError::ToolExecution("sum is not a finite number".into())),
            _ => Err(ParleyError::ToolExecution(
                "both 'a' and 'b' must be numbers".into(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use parley_core::{render_output, ToolCall};
    use parley_skills::SkillRegistry;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_integer_sum() {
        let out = AddSkill::new().execute(&json!({"a": 15, "b": 27})).await.unwrap();
        assert_eq!(out, json!(42));
        assert_eq!(render_output(&out), "42");
    }

    #[tokio::test]
    async fn test_float_sum() {
        let out = AddSkill::new().execute(&json!({"a": 1.5, "b": 2})).await.unwrap();
        assert_eq!(out.as_f64(), Some(3.5));
    }

    #[tokio::test]
    async fn test_overflow_falls_back_to_float() {
        let out = AddSkill::new()
            .execute(&json!({"a": i64::MAX, "b": 1}))
            .await
            .unwrap();
        assert!(out.is_f64());
    }

    #[tokio::test]
    async fn test_string_operand_rejected_by_registry() {
        let mut registry = SkillRegistry::new();
        registry.register(Arc::new(AddSkill::new()));
        let result = registry
            .dispatch(&ToolCall {
                id: "c1".into(),
                name: "add_two_numbers".into(),
                arguments: json!({"a": "15", "b": 27}),
            })
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("$.a: expected number, got string"));
    }
}
