//! Environment-derived defaults for Reelsmith runs.
//!
//! The unattended trigger path builds its `RunConfig` entirely from a closed
//! set of environment overrides; the interactive path overlays a request
//! payload onto the same defaults. Validation itself lives on `RunConfig` so
//! both paths share one routine.

use std::str::FromStr;

use thiserror::Error;

use reelsmith_types::{Credentials, Preset, RunConfig, Visibility};

/// Result type alias using the config error type.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ─────────────────────────────────────────────────────────────────────────────
// Environment variable names
// ─────────────────────────────────────────────────────────────────────────────

pub const ENV_TOPIC: &str = "REELSMITH_TOPIC";
pub const ENV_DURATION_SECS: &str = "REELSMITH_DURATION_SECS";
pub const ENV_VOICE: &str = "REELSMITH_VOICE";
pub const ENV_PRESET: &str = "REELSMITH_PRESET";
pub const ENV_INSTRUCTIONS: &str = "REELSMITH_INSTRUCTIONS";
pub const ENV_CONTEXT: &str = "REELSMITH_CONTEXT";
pub const ENV_TITLE_TEMPLATE: &str = "REELSMITH_TITLE_TEMPLATE";
pub const ENV_DESCRIPTION_TEMPLATE: &str = "REELSMITH_DESCRIPTION_TEMPLATE";
pub const ENV_TAGS: &str = "REELSMITH_TAGS";
pub const ENV_VISIBILITY: &str = "REELSMITH_VISIBILITY";
pub const ENV_ALLOW_COPYRIGHTED_AUDIO: &str = "REELSMITH_ALLOW_COPYRIGHTED_AUDIO";
pub const ENV_WEBHOOK_URL: &str = "REELSMITH_WEBHOOK_URL";

pub const ENV_TEXT_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_VOICE_API_KEY: &str = "ELEVENLABS_API_KEY";
pub const ENV_FOOTAGE_API_KEY: &str = "PEXELS_API_KEY";
pub const ENV_UPLOAD_CLIENT_ID: &str = "YOUTUBE_CLIENT_ID";
pub const ENV_UPLOAD_CLIENT_SECRET: &str = "YOUTUBE_CLIENT_SECRET";
pub const ENV_UPLOAD_REFRESH_TOKEN: &str = "YOUTUBE_REFRESH_TOKEN";

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_TOPIC: &str = "surprising facts about technology";
pub const DEFAULT_DURATION_SECS: u32 = 60;
/// Default voice id for the synthesis service.
pub const DEFAULT_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_TITLE_TEMPLATE: &str = "Daily Briefing - {{date}}";
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str = "Generated on {{date}}.";
pub const DEFAULT_TAGS: &str = "shorts,facts";

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Error type for environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed.
    #[error("invalid value for {var}: {message}")]
    Invalid { var: String, message: String },
}

impl ConfigError {
    fn invalid(var: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            var: var.to_string(),
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────────────────

/// Build a `RunConfig` from process environment variables.
///
/// Every field falls back to its documented default; missing credentials are
/// left empty and surface through `RunConfig::validate()`.
pub fn from_env() -> Result<RunConfig> {
    from_lookup(|var| std::env::var(var).ok())
}

/// Build a `RunConfig` from an arbitrary variable lookup.
///
/// The lookup form exists so tests and embedders can supply variables without
/// touching process state.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<RunConfig> {
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    let duration_secs = match get(ENV_DURATION_SECS) {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::invalid(ENV_DURATION_SECS, e.to_string()))?,
        None => DEFAULT_DURATION_SECS,
    };

    let preset = match get(ENV_PRESET) {
        Some(raw) => Preset::from_str(&raw).map_err(|e| ConfigError::invalid(ENV_PRESET, e))?,
        None => Preset::Facts,
    };

    let visibility = match get(ENV_VISIBILITY) {
        Some(raw) => {
            Visibility::from_str(&raw).map_err(|e| ConfigError::invalid(ENV_VISIBILITY, e))?
        }
        None => Visibility::Unlisted,
    };

    let allow_copyrighted_audio = match get(ENV_ALLOW_COPYRIGHTED_AUDIO) {
        Some(raw) => parse_bool(&raw)
            .ok_or_else(|| ConfigError::invalid(ENV_ALLOW_COPYRIGHTED_AUDIO, "expected a boolean"))?,
        None => false,
    };

    let tags = get(ENV_TAGS)
        .unwrap_or_else(|| DEFAULT_TAGS.to_string())
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let config = RunConfig {
        topic: get(ENV_TOPIC).unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        duration_secs,
        voice: get(ENV_VOICE).unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        preset,
        instructions: get(ENV_INSTRUCTIONS).unwrap_or_default(),
        context: get(ENV_CONTEXT).unwrap_or_default(),
        title_template: get(ENV_TITLE_TEMPLATE)
            .unwrap_or_else(|| DEFAULT_TITLE_TEMPLATE.to_string()),
        description_template: get(ENV_DESCRIPTION_TEMPLATE)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION_TEMPLATE.to_string()),
        tags,
        visibility,
        allow_copyrighted_audio,
        webhook_url: get(ENV_WEBHOOK_URL),
        credentials: Credentials {
            text_api_key: get(ENV_TEXT_API_KEY).unwrap_or_default(),
            voice_api_key: get(ENV_VOICE_API_KEY).unwrap_or_default(),
            footage_api_key: get(ENV_FOOTAGE_API_KEY).unwrap_or_default(),
            upload_client_id: get(ENV_UPLOAD_CLIENT_ID).unwrap_or_default(),
            upload_client_secret: get(ENV_UPLOAD_CLIENT_SECRET).unwrap_or_default(),
            upload_refresh_token: get(ENV_UPLOAD_REFRESH_TOKEN).unwrap_or_default(),
        },
    };

    tracing::debug!(
        topic = %config.topic,
        preset = %config.preset,
        duration_secs = config.duration_secs,
        "run defaults assembled from environment"
    );
    Ok(config)
}

/// Accepts the usual truthy/falsy spellings.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| map.get(var).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = from_lookup(|_| None).unwrap();
        assert_eq!(config.topic, DEFAULT_TOPIC);
        assert_eq!(config.duration_secs, DEFAULT_DURATION_SECS);
        assert_eq!(config.voice, DEFAULT_VOICE);
        assert_eq!(config.preset, Preset::Facts);
        assert_eq!(config.visibility, Visibility::Unlisted);
        assert!(!config.allow_copyrighted_audio);
        assert_eq!(config.tags, vec!["shorts", "facts"]);
        assert!(config.webhook_url.is_none());
        // Credentials default empty and fail validation, by contract.
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let map = HashMap::from([
            (ENV_TOPIC, "space weather"),
            (ENV_DURATION_SECS, "90"),
            (ENV_PRESET, "longform"),
            (ENV_VISIBILITY, "public"),
            (ENV_TAGS, "space, weather ,"),
            (ENV_ALLOW_COPYRIGHTED_AUDIO, "yes"),
            (ENV_WEBHOOK_URL, "https://hooks.example.com/run"),
        ]);
        let config = from_lookup(lookup_from(&map)).unwrap();
        assert_eq!(config.topic, "space weather");
        assert_eq!(config.duration_secs, 90);
        assert_eq!(config.preset, Preset::Longform);
        assert_eq!(config.visibility, Visibility::Public);
        assert_eq!(config.tags, vec!["space", "weather"]);
        assert!(config.allow_copyrighted_audio);
        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://hooks.example.com/run")
        );
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let map = HashMap::from([(ENV_DURATION_SECS, "ninety")]);
        let err = from_lookup(lookup_from(&map)).unwrap_err();
        assert!(err.to_string().contains(ENV_DURATION_SECS));
    }

    #[test]
    fn test_invalid_preset_rejected() {
        let map = HashMap::from([(ENV_PRESET, "vlog")]);
        assert!(from_lookup(lookup_from(&map)).is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let map = HashMap::from([(ENV_TOPIC, "  "), (ENV_DURATION_SECS, "")]);
        let config = from_lookup(lookup_from(&map)).unwrap();
        assert_eq!(config.topic, DEFAULT_TOPIC);
        assert_eq!(config.duration_secs, DEFAULT_DURATION_SECS);
    }

    #[test]
    fn test_parse_bool_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_credentials_read_from_env_names() {
        let map = HashMap::from([
            (ENV_TEXT_API_KEY, "sk-text"),
            (ENV_VOICE_API_KEY, "sk-voice"),
            (ENV_FOOTAGE_API_KEY, "sk-footage"),
            (ENV_UPLOAD_CLIENT_ID, "cid"),
            (ENV_UPLOAD_CLIENT_SECRET, "csecret"),
            (ENV_UPLOAD_REFRESH_TOKEN, "rtoken"),
        ]);
        let config = from_lookup(lookup_from(&map)).unwrap();
        assert_eq!(config.credentials.text_api_key, "sk-text");
        assert_eq!(config.credentials.upload_refresh_token, "rtoken");
        assert!(config.validate().is_ok());
    }
}
