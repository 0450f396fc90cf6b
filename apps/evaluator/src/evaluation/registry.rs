//! Prompt Variant Registry — named, pure prompt renderers in insertion order.
//!
//! Reports and exports are keyed by this order, so iteration never reorders.

use crate::errors::RegistryError;
use crate::evaluation::prompts::{render_original, render_skills_focused};

/// Renders one scoring prompt from the full question/answer set.
pub type RenderFn = fn(&[String], &[String]) -> String;

#[derive(Clone)]
pub struct PromptVariant {
    pub name: String,
    pub render: RenderFn,
}

impl PromptVariant {
    pub fn render(&self, questions: &[String], answers: &[String]) -> String {
        (self.render)(questions, answers)
    }
}

impl std::fmt::Debug for PromptVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptVariant").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptRegistry {
    variants: Vec<PromptVariant>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The variants compared on every run, in report order.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register("original", render_original)?;
        registry.register("skills_focused", render_skills_focused)?;
        Ok(registry)
    }

    pub fn register(&mut self, name: &str, render: RenderFn) -> Result<(), RegistryError> {
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateVariant(name.to_string()));
        }
        self.variants.push(PromptVariant {
            name: name.to_string(),
            render,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PromptVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptVariant> {
        self.variants.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(questions: &[String], _answers: &[String]) -> String {
        questions.join("|")
    }

    #[test]
    fn test_builtin_order_is_original_then_skills_focused() {
        let registry = PromptRegistry::builtin().unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["original", "skills_focused"]);
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = PromptRegistry::new();
        registry.register("v1", echo).unwrap();
        assert_eq!(
            registry.register("v1", echo),
            Err(RegistryError::DuplicateVariant("v1".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut registry = PromptRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(name, echo).unwrap();
        }
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_variant_render_calls_function() {
        let mut registry = PromptRegistry::new();
        registry.register("echo", echo).unwrap();
        let variant = registry.get("echo").unwrap();
        let out = variant.render(&["a".to_string(), "b".to_string()], &[]);
        assert_eq!(out, "a|b");
    }
}
