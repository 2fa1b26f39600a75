use anyhow::{anyhow, Context, Result};
use std::env;

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_PROMPT: &str = "> ";

pub struct AppConfig {
    pub log_level: String,
    pub show_examples: bool,
    pub prompt: String,
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("Invalid boolean: {}", s)),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            show_examples: lookup("SHOW_EXAMPLES")
                .map(|value| parse_flag(&value))
                .transpose()
                .context("Failed to parse SHOW_EXAMPLES")?
                .unwrap_or(true),
            prompt: lookup("PROMPT").unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            show_examples: true,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.log_level, "warn");
        assert!(config.show_examples);
        assert_eq!(config.prompt, "> ");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LOG_LEVEL", "tick_price_calc=debug"),
            ("SHOW_EXAMPLES", "No"),
            ("PROMPT", "tick> "),
        ])
        .unwrap();
        assert_eq!(config.log_level, "tick_price_calc=debug");
        assert!(!config.show_examples);
        assert_eq!(config.prompt, "tick> ");
    }

    #[test]
    fn test_invalid_flag() {
        let err = config_from(&[("SHOW_EXAMPLES", "maybe")]).err().unwrap();
        assert!(err.to_string().contains("SHOW_EXAMPLES"));
    }
}
