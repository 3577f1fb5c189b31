use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config_manager::utils::{parse_language_list, read_config_text, substitute_vars};
use crate::config_manager::{PipelineConfig, ServiceConfig, Stage, SystemConfig};
use crate::error::PipelineError;
use crate::translate::SupportedLanguage;

/// Process-wide configuration, built once at start-up and handed to every stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(default)]
    pub pipeline_config: PipelineConfig,

    #[serde(default)]
    pub service_config: ServiceConfig,
}

impl Config {
    /// Load a YAML or JSON file, substituting `${VAR}` from the environment
    pub fn load(path: &str) -> Result<Self> {
        let content = read_config_text(path)?;
        let content = substitute_vars(&content, |name| std::env::var(name).ok())?;

        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Find a configuration file, falling back to plain environment variables.
    ///
    /// `CONFIG_PATH` wins and must load. Otherwise the well-known locations are
    /// tried in order; the first one that exists must load. Returns the config
    /// and a label saying where it came from.
    pub fn discover() -> Result<(Self, String)> {
        if let Ok(path) = std::env::var("CONFIG_PATH") {
            let config = Self::load(&path)?;
            return Ok((config, path));
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        let candidates = [
            PathBuf::from("conf.yaml"),
            PathBuf::from("conf.json"),
            exe_dir.join("conf.yaml"),
        ];

        match Self::load_first_existing(&candidates)? {
            Some(found) => Ok(found),
            None => {
                debug!("No configuration file found, reading the environment");
                Ok((Self::from_env(), "environment".to_string()))
            }
        }
    }

    /// Load the first candidate that exists. A file that exists but does not
    /// load is an error, never a reason to move on.
    fn load_first_existing(candidates: &[PathBuf]) -> Result<Option<(Self, String)>> {
        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            let path = candidate.to_string_lossy().into_owned();
            let config = Self::load(&path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            return Ok(Some((config, path)));
        }
        Ok(None)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from the variables the functions were deployed with
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            config.system_config.port = port;
        }
        if let Some(stages) = lookup("STAGES") {
            config.system_config.stages = stages.split(',').filter_map(Stage::parse).collect();
        }

        let pipeline = &mut config.pipeline_config;
        pipeline.project_id = lookup("GCP_PROJECT").unwrap_or_default();
        pipeline.target_languages = parse_language_list(&lookup("TO_LANG").unwrap_or_default());
        pipeline.request_topic = lookup("TRANSLATE_TOPIC").unwrap_or_default();
        pipeline.result_topic = lookup("RESULT_TOPIC").unwrap_or_default();
        pipeline.result_bucket = lookup("RESULT_BUCKET").unwrap_or_default();

        if let Some(host) = lookup("PUBSUB_EMULATOR_HOST") {
            config.service_config.endpoints.pubsub = format!("http://{}", host);
            config
                .service_config
                .auth
                .unauthenticated
                .push("pubsub".to_string());
        }

        config
    }

    /// Check that every enabled stage has what it needs
    pub fn validate(&self) -> Result<(), PipelineError> {
        let system = &self.system_config;
        let pipeline = &self.pipeline_config;

        if system.stages.is_empty() {
            return Err(PipelineError::Config("no stage enabled".to_string()));
        }

        let mut missing = Vec::new();
        if system.is_enabled(Stage::Extract) {
            if pipeline.project_id.is_empty() {
                missing.push("project_id");
            }
            if pipeline.request_topic.is_empty() {
                missing.push("request_topic");
            }
            if pipeline.target_languages.is_empty() {
                missing.push("target_languages");
            }
        }
        if system.is_enabled(Stage::Translate) {
            if pipeline.project_id.is_empty() && !missing.contains(&"project_id") {
                missing.push("project_id");
            }
            if pipeline.result_topic.is_empty() {
                missing.push("result_topic");
            }
        }
        if system.is_enabled(Stage::Save) && pipeline.result_bucket.is_empty() {
            missing.push("result_bucket");
        }

        if !missing.is_empty() {
            return Err(PipelineError::Config(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        if system.is_enabled(Stage::Extract) {
            for lang in &pipeline.target_languages {
                SupportedLanguage::parse(lang).map_err(|_| {
                    PipelineError::Config(format!("target language {} is not supported", lang))
                })?;
            }
        }

        Ok(())
    }
}
