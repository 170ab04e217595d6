//! Run configuration and validation.
//!
//! A `RunConfig` is the immutable input to one pipeline run. Both construction
//! paths (interactive request payload and environment defaults) produce one of
//! these and go through the same `validate()` routine, so acceptance rules
//! cannot diverge.

use serde::{Deserialize, Serialize};

/// Ceiling on the target duration. Longer runs would exceed what the footage
/// and render stages can reasonably assemble in one pass.
pub const MAX_DURATION_SECS: u32 = 3600;

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Creative preset selecting tone, pacing and segment structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Current-events tone, short punchy segments.
    News,
    /// Listicle of standalone facts, medium segments.
    Facts,
    /// Narrative long-form, fewer and longer segments.
    Longform,
}

impl Preset {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::News => "news",
            Preset::Facts => "facts",
            Preset::Longform => "longform",
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(Preset::News),
            "facts" => Ok(Preset::Facts),
            "longform" => Ok(Preset::Longform),
            other => Err(format!(
                "unknown preset '{}' (expected news, facts or longform)",
                other
            )),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility applied to the published video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

impl Visibility {
    /// Stable lowercase name, matching the serialized form and the value the
    /// upload API expects in its status block.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Unlisted => "unlisted",
            Visibility::Private => "private",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "unlisted" => Ok(Visibility::Unlisted),
            "private" => Ok(Visibility::Private),
            other => Err(format!(
                "unknown visibility '{}' (expected public, unlisted or private)",
                other
            )),
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// Credential set for every downstream service one run touches.
///
/// Read-only for the lifetime of the run; no stage caches or mutates these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Text-generation API key.
    #[serde(default)]
    pub text_api_key: String,

    /// Voice-synthesis API key.
    #[serde(default)]
    pub voice_api_key: String,

    /// Stock-footage search API key.
    #[serde(default)]
    pub footage_api_key: String,

    /// OAuth client id for the video platform.
    #[serde(default)]
    pub upload_client_id: String,

    /// OAuth client secret for the video platform.
    #[serde(default)]
    pub upload_client_secret: String,

    /// Long-lived refresh token for the video platform.
    #[serde(default)]
    pub upload_refresh_token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// RunConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable input to one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Subject of the video.
    pub topic: String,

    /// Target duration of the final video in seconds.
    pub duration_secs: u32,

    /// Voice selector passed to the synthesis service.
    pub voice: String,

    /// Creative preset.
    pub preset: Preset,

    /// Free-text creative instructions appended to the script prompt.
    #[serde(default)]
    pub instructions: String,

    /// Free-text run context (e.g. the series this episode belongs to).
    #[serde(default)]
    pub context: String,

    /// Upload title template. Supports `{{date}}` and `{{topic}}` tokens.
    pub title_template: String,

    /// Upload description template. Supports `{{date}}` and `{{topic}}` tokens.
    pub description_template: String,

    /// Tags applied to the published video.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Visibility applied to the published video.
    pub visibility: Visibility,

    /// Permit sourcing footage that carries its own (possibly copyrighted)
    /// audio track. Off by default; the footage stage then restricts search
    /// to muted clips.
    #[serde(default)]
    pub allow_copyrighted_audio: bool,

    /// Optional webhook to notify when the run finishes.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Downstream service credentials.
    #[serde(default)]
    pub credentials: Credentials,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl RunConfig {
    /// Validate the configuration, returning every problem found rather than
    /// stopping at the first.
    ///
    /// This is the single validation routine shared by the interactive and
    /// environment construction paths.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.topic.trim().is_empty() {
            errors.push(FieldError::new("topic", "must not be empty"));
        }

        if self.duration_secs == 0 {
            errors.push(FieldError::new("duration_secs", "must be greater than 0"));
        } else if self.duration_secs > MAX_DURATION_SECS {
            errors.push(FieldError::new(
                "duration_secs",
                format!("must be at most {}", MAX_DURATION_SECS),
            ));
        }

        if self.voice.trim().is_empty() {
            errors.push(FieldError::new("voice", "must not be empty"));
        }

        if self.title_template.trim().is_empty() {
            errors.push(FieldError::new("title_template", "must not be empty"));
        }

        if self.description_template.trim().is_empty() {
            errors.push(FieldError::new(
                "description_template",
                "must not be empty",
            ));
        }

        if let Some(url) = &self.webhook_url {
            match url::Url::parse(url) {
                Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
                Ok(parsed) => errors.push(FieldError::new(
                    "webhook_url",
                    format!("unsupported scheme '{}'", parsed.scheme()),
                )),
                Err(e) => errors.push(FieldError::new("webhook_url", format!("invalid URL: {}", e))),
            }
        }

        let creds = &self.credentials;
        let required = [
            ("credentials.text_api_key", &creds.text_api_key),
            ("credentials.voice_api_key", &creds.voice_api_key),
            ("credentials.footage_api_key", &creds.footage_api_key),
            ("credentials.upload_client_id", &creds.upload_client_id),
            (
                "credentials.upload_client_secret",
                &creds.upload_client_secret,
            ),
            (
                "credentials.upload_refresh_token",
                &creds.upload_refresh_token,
            ),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "must not be empty"));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RunConfig {
        RunConfig {
            topic: "deep sea creatures".to_string(),
            duration_secs: 60,
            voice: "narrator-1".to_string(),
            preset: Preset::Facts,
            instructions: String::new(),
            context: String::new(),
            title_template: "Daily Briefing - {{date}}".to_string(),
            description_template: "Generated on {{date}}.".to_string(),
            tags: vec!["shorts".to_string()],
            visibility: Visibility::Unlisted,
            allow_copyrighted_audio: false,
            webhook_url: None,
            credentials: Credentials {
                text_api_key: "sk-text".to_string(),
                voice_api_key: "sk-voice".to_string(),
                footage_api_key: "sk-footage".to_string(),
                upload_client_id: "client-id".to_string(),
                upload_client_secret: "client-secret".to_string(),
                upload_refresh_token: "refresh-token".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = valid_config();
        config.topic = "  ".to_string();
        config.duration_secs = 0;
        config.credentials.text_api_key = String::new();

        let errors = config.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"topic"));
        assert!(fields.contains(&"duration_secs"));
        assert!(fields.contains(&"credentials.text_api_key"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_duration_upper_bound() {
        let mut config = valid_config();
        config.duration_secs = MAX_DURATION_SECS + 1;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "duration_secs");
    }

    #[test]
    fn test_webhook_url_must_be_http() {
        let mut config = valid_config();
        config.webhook_url = Some("ftp://example.com/hook".to_string());
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "webhook_url");

        config.webhook_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.webhook_url = Some("https://example.com/hook".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_round_trip() {
        for preset in [Preset::News, Preset::Facts, Preset::Longform] {
            let parsed: Preset = preset.as_str().parse().unwrap();
            assert_eq!(parsed, preset);
        }
        assert!("documentary".parse::<Preset>().is_err());
    }

    #[test]
    fn test_visibility_parse_is_case_insensitive() {
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!(
            " unlisted ".parse::<Visibility>().unwrap(),
            Visibility::Unlisted
        );
        assert!("hidden".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = valid_config();
        let json = serde_json::to_string(&config).unwrap();
        let restored: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.topic, config.topic);
        assert_eq!(restored.preset, config.preset);
        assert_eq!(restored.visibility, config.visibility);
    }
}
