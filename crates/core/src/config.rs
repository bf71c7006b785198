//! Configuration management for docqa.
//!
//! Configuration is merged from several sources, lowest precedence first:
//! - Built-in defaults
//! - Config file (`.docqa/config.yaml` in the workspace, or `DOCQA_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Nothing here is persisted; the index lives only for one session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Generation providers the core knows how to talk to.
pub const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "openai"];

/// Embedding providers the core knows how to construct.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 3] = ["trigram", "ollama", "openai"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (may contain .docqa/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation provider (e.g., "ollama", "openai")
    pub provider: String,

    /// Generation model identifier
    pub model: String,

    /// Embedding provider (e.g., "trigram", "ollama", "openai")
    pub embedding_provider: String,

    /// API key override for the generation provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,

    /// Chunking and embedding settings
    pub indexing: IndexingConfig,

    /// Context window sizes per mode
    pub retrieval: RetrievalConfig,

    /// Sampling settings for answer generation
    pub generation: GenerationConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(rename = "activeEmbeddingProvider", default = "default_embedding_provider")]
    pub active_embedding_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        endpoint: Option<String>,
        timeout: Option<u64>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Generation model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { model, .. } | ProviderConfig::Ollama { model, .. } => model,
        }
    }

    /// Custom endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenAI { endpoint, .. } => endpoint.as_deref(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.as_str()),
        }
    }

    /// Embedding model configured for this provider.
    pub fn embedding_model(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenAI {
                embedding_model, ..
            }
            | ProviderConfig::Ollama {
                embedding_model, ..
            } => embedding_model.as_deref(),
        }
    }

    /// Request timeout in seconds.
    pub fn timeout(&self) -> Option<u64> {
        match self {
            ProviderConfig::OpenAI { timeout, .. } | ProviderConfig::Ollama { timeout, .. } => {
                *timeout
            }
        }
    }
}

/// Chunking and embedding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Chunk window length in characters
    pub chunk_window: usize,

    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,

    /// Embedding vector dimension
    pub embedding_dimensions: usize,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_window: 1500,
            chunk_overlap: 200,
            embedding_dimensions: 384,
        }
    }
}

/// Number of chunks retrieved for each mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrievalConfig {
    pub fact_k: usize,
    pub summary_k: usize,
    pub analysis_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            fact_k: 3,
            summary_k: 6,
            analysis_k: 8,
        }
    }
}

/// Sampling settings for answer generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 1000,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    indexing: Option<IndexingConfig>,
    retrieval: Option<RetrievalConfig>,
    generation: Option<GenerationConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

fn default_embedding_provider() -> String {
    "trigram".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            embedding_provider: default_embedding_provider(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            indexing: IndexingConfig::default(),
            retrieval: RetrievalConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and environment variables.
    ///
    /// Environment variables:
    /// - `DOCQA_WORKSPACE`: Override workspace path
    /// - `DOCQA_CONFIG`: Path to config file
    /// - `DOCQA_PROVIDER`: Generation provider
    /// - `DOCQA_MODEL`: Generation model identifier
    /// - `DOCQA_EMBEDDING_PROVIDER`: Embedding provider
    /// - `DOCQA_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use docqa_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("DOCQA_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("DOCQA_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.docqa_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DOCQA_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DOCQA_MODEL") {
            config.model = model;
        }

        if let Ok(provider) = std::env::var("DOCQA_EMBEDDING_PROVIDER") {
            config.embedding_provider = provider;
        }

        config.api_key = std::env::var("DOCQA_API_KEY").ok();

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(indexing) = config_file.indexing {
            result.indexing = indexing;
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(generation) = config_file.generation {
            result.generation = generation;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            result.embedding_provider = llm.active_embedding_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        embedding_provider: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(embedding_provider) = embedding_provider {
            self.embedding_provider = embedding_provider;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .docqa directory.
    pub fn docqa_dir(&self) -> PathBuf {
        self.workspace.join(".docqa")
    }

    /// Get a provider's configuration, if the config file declares one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve the API key for a provider.
    ///
    /// `DOCQA_API_KEY` wins; otherwise the provider's `apiKeyEnv` is consulted.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAI { api_key_env, .. }) => std::env::var(api_key_env).ok(),
            _ => None,
        }
    }

    /// Validate configuration before building anything from it.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        let indexing = &self.indexing;
        if indexing.chunk_window == 0 {
            return Err(AppError::Config(
                "indexing.chunkWindow must be greater than zero".to_string(),
            ));
        }

        if indexing.chunk_overlap >= indexing.chunk_window {
            return Err(AppError::Config(format!(
                "indexing.chunkOverlap ({}) must be smaller than indexing.chunkWindow ({})",
                indexing.chunk_overlap, indexing.chunk_window
            )));
        }

        if indexing.embedding_dimensions == 0 {
            return Err(AppError::Config(
                "indexing.embeddingDimensions must be greater than zero".to_string(),
            ));
        }

        let retrieval = &self.retrieval;
        if retrieval.fact_k == 0 || retrieval.summary_k == 0 || retrieval.analysis_k == 0 {
            return Err(AppError::Config(
                "retrieval sizes must all be at least 1".to_string(),
            ));
        }

        if retrieval.fact_k > retrieval.summary_k || retrieval.summary_k > retrieval.analysis_k {
            return Err(AppError::Config(format!(
                "retrieval sizes must satisfy factK <= summaryK <= analysisK (got {} / {} / {})",
                retrieval.fact_k, retrieval.summary_k, retrieval.analysis_k
            )));
        }

        if self.provider == "openai" && self.resolve_api_key("openai").is_none() {
            return Err(AppError::Config(
                "OpenAI provider requires an API key (DOCQA_API_KEY or apiKeyEnv)".to_string(),
            ));
        }

        Ok(())
    }
}
