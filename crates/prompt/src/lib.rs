//! Prompt system for docqa.
//!
//! This crate provides the mode-keyed instruction templates used by answer
//! generation:
//! - Built-in templates for every `Mode`
//! - Optional YAML overrides from `.docqa/prompts/<mode>.yml`
//! - A `PromptTable` compiled once and rendered per question

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::PromptTable;
pub use defaults::default_definition;
pub use loader::{list_prompts, load_overrides, load_prompt};
pub use types::{BuiltPrompt, PromptDefinition};
