//! Configuration read from the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::agents::DEFAULT_VARIANT_COUNT;
use crate::campaign::parse_rules;
use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    /// Sampling temperature for every agent call.
    pub temperature: f32,
    /// JSON-lines campaign log.
    pub log_path: PathBuf,
    /// CSV export target.
    pub csv_path: PathBuf,
    /// Variants requested per run.
    pub variant_count: usize,
    /// Directory for daily-rolling trace files, if any.
    pub trace_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend: LlmBackend = match var("CAMPAIGN_LLM_BACKEND") {
            Some(raw) => raw
                .parse()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "CAMPAIGN_LLM_BACKEND".to_string(),
                    message,
                })?,
            None => LlmBackend::OpenAi,
        };

        let api_key = var(backend.credential_var()).map(SecretString::from);
        let model = var("CAMPAIGN_MODEL").unwrap_or_else(|| backend.default_model().to_string());

        let temperature: f32 = parse_var(&var, "CAMPAIGN_TEMPERATURE", 0.0)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                key: "CAMPAIGN_TEMPERATURE".to_string(),
                message: format!("{} is outside 0.0..=2.0", temperature),
            });
        }

        let variant_count: usize = parse_var(&var, "CAMPAIGN_VARIANTS", DEFAULT_VARIANT_COUNT)?;
        if variant_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CAMPAIGN_VARIANTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key,
                model,
            },
            temperature,
            log_path: var("CAMPAIGN_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("memory_store.jsonl")),
            csv_path: var("CAMPAIGN_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("outgoing_campaign.csv")),
            variant_count,
            trace_dir: var("CAMPAIGN_TRACE_DIR").map(PathBuf::from),
        })
    }
}

/// Read compliance rules from a file, one per line.
pub async fn read_rules_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::RulesFile {
            path: path.display().to_string(),
            source,
        })?;
    Ok(parse_rules(&text))
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{:?}: {}", raw, e),
            }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.llm.backend, LlmBackend::OpenAi);
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
        assert_eq!(cfg.temperature, 0.0);
        assert_eq!(cfg.log_path, PathBuf::from("memory_store.jsonl"));
        assert_eq!(cfg.csv_path, PathBuf::from("outgoing_campaign.csv"));
        assert_eq!(cfg.variant_count, 5);
        assert!(cfg.trace_dir.is_none());
    }

    #[test]
    fn anthropic_backend_reads_its_own_key() {
        let cfg = config(&[
            ("CAMPAIGN_LLM_BACKEND", "Anthropic"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ])
        .unwrap();
        assert_eq!(cfg.llm.backend, LlmBackend::Anthropic);
        assert_eq!(cfg.llm.api_key.unwrap().expose_secret(), "sk-ant");
        assert_eq!(cfg.llm.model, "claude-3-5-haiku-latest");
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let cfg = config(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert!(cfg.llm.api_key.is_none());
    }

    #[test]
    fn overrides_apply() {
        let cfg = config(&[
            ("CAMPAIGN_MODEL", "gpt-4o"),
            ("CAMPAIGN_TEMPERATURE", "0.7"),
            ("CAMPAIGN_LOG_PATH", "/tmp/log.jsonl"),
            ("CAMPAIGN_VARIANTS", "3"),
            ("CAMPAIGN_TRACE_DIR", "/tmp/traces"),
        ])
        .unwrap();
        assert_eq!(cfg.llm.model, "gpt-4o");
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/log.jsonl"));
        assert_eq!(cfg.variant_count, 3);
        assert_eq!(cfg.trace_dir, Some(PathBuf::from("/tmp/traces")));
    }

    #[tokio::test]
    async fn rules_file_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, "include unsubscribe link\n\n  no medical claims  \n").unwrap();

        let rules = read_rules_file(&path).await.unwrap();
        assert_eq!(rules, vec!["include unsubscribe link", "no medical claims"]);
    }

    #[tokio::test]
    async fn missing_rules_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rules_file(&dir.path().join("absent.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::RulesFile { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (key, value) in [
            ("CAMPAIGN_VARIANTS", "many"),
            ("CAMPAIGN_VARIANTS", "0"),
            ("CAMPAIGN_TEMPERATURE", "hot"),
            ("CAMPAIGN_TEMPERATURE", "3.5"),
            ("CAMPAIGN_LLM_BACKEND", "ollama"),
        ] {
            let err = config(&[(key, value)]).unwrap_err();
            match err {
                ConfigError::InvalidValue { key: k, .. } => assert_eq!(k, key),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
