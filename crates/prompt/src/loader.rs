//! Loader for prompt overrides stored as YAML.
//!
//! Overrides live in `<workspace>/.docqa/prompts/<mode>.yml`. A missing
//! directory is not an error; the built-in templates are used instead.

use crate::types::PromptDefinition;
use docqa_core::{AppError, AppResult, Mode};
use std::path::{Path, PathBuf};

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".docqa").join("prompts")
}

/// Load the override definition for `mode` from the workspace.
///
/// # Example
/// ```no_run
/// use docqa_core::Mode;
/// use docqa_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), Mode::Fact)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, mode: Mode) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", mode));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    if definition.mode != mode {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares mode '{}' but is named for '{}'",
            prompt_file, definition.mode, mode
        )));
    }

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List the modes that have an override file in the workspace.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<Mode>> {
    let dir = prompts_dir(workspace_path);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut modes = Vec::new();

    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("yml") {
            continue;
        }

        match path.file_stem().and_then(|s| s.to_str()).map(str::parse::<Mode>) {
            Some(Ok(mode)) => modes.push(mode),
            _ => tracing::debug!("Ignoring prompt file with no matching mode: {:?}", path),
        }
    }

    modes.sort_by_key(|mode| Mode::ALL.iter().position(|m| m == mode));
    Ok(modes)
}

/// Load every override present in the workspace.
pub fn load_overrides(workspace_path: &Path) -> AppResult<Vec<PromptDefinition>> {
    list_prompts(workspace_path)?
        .into_iter()
        .map(|mode| load_prompt(workspace_path, mode))
        .collect()
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.api_version.is_empty() {
        return Err(AppError::Prompt(
            "Prompt apiVersion cannot be empty".to_string(),
        ));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    // Validate API version format (simple check)
    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // A template that never sees the retrieved text cannot answer from it
    if !def.template.contains("context") {
        return Err(AppError::Prompt(format!(
            "Prompt {} must reference {{{{context}}}}",
            def.id
        )));
    }

    Ok(())
}
