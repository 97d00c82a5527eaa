//! Planner gateway configuration.

use std::env;

/// OpenRouter chat completions endpoint.
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Vision-capable model used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the model.
pub const MODEL_VAR: &str = "GUIDE_MODEL";

/// Environment variable overriding the endpoint.
pub const URL_VAR: &str = "GUIDE_PLANNER_URL";

/// Settings for [`ChatPlanner`](crate::ChatPlanner).
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Bearer token; requests fail with `NoApiKey` while unset.
    pub api_key: Option<String>,
    /// Model identifier, e.g. `openai/gpt-4o`.
    pub model: String,
    /// Chat completions URL.
    pub endpoint: String,
    pub max_tokens: u32,
    /// Sampling temperature (0.0 to 2.0).
    pub temperature: f32,
    /// Oldest exchanges are dropped to stay within this many messages; `None`
    /// keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: OPENROUTER_URL.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            history_limit: None,
        }
    }
}

impl PlannerConfig {
    /// Creates a config with default values and no API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the API key, model and endpoint from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            api_key: present(API_KEY_VAR),
            model: present(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: present(URL_VAR).unwrap_or_else(|| OPENROUTER_URL.to_string()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the temperature, clamped to `0.0..=2.0`.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, OPENROUTER_URL);
        assert!(config.history_limit.is_none());
    }

    #[test]
    fn test_from_lookup() {
        let config = PlannerConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "anthropic/claude-sonnet-4"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.endpoint, OPENROUTER_URL);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = PlannerConfig::from_lookup(lookup(&[(API_KEY_VAR, "  "), (URL_VAR, "")]));
        assert!(config.api_key.is_none());
        assert_eq!(config.endpoint, OPENROUTER_URL);
    }

    #[test]
    fn test_from_lookup_keeps_tuning_defaults() {
        let config = PlannerConfig::from_lookup(lookup(&[(URL_VAR, "http://localhost:8080/v1")]));
        assert_eq!(config.endpoint, "http://localhost:8080/v1");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, PlannerConfig::default().max_tokens);
        assert!(config.history_limit.is_none());
    }

    #[test]
    fn test_builder() {
        let config = PlannerConfig::new()
            .with_api_key("key")
            .with_temperature(5.0)
            .with_history_limit(8)
            .with_max_tokens(256);
        assert_eq!(config.temperature, 2.0);
        assert_eq!(config.history_limit, Some(8));
        assert_eq!(config.max_tokens, 256);
    }
}
