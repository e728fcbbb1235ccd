//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for the server, identity verification and caption rendering.
//! Every section defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub caption: CaptionStyle,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.auth.enabled && self.auth.tokens.is_empty() {
            warnings.push("auth is enabled but no tokens are configured".into());
        }

        for (token, user) in &self.auth.tokens {
            if token.len() < 16 {
                warnings.push(format!("auth token for user '{user}' is shorter than 16 chars"));
            }
        }

        if self.caption.max_chars == 0 {
            warnings.push("caption.max_chars is 0; every caption will be an ellipsis".into());
        }

        if self.caption.marker.is_empty() {
            warnings.push("caption.marker is empty; captions cannot be spliced".into());
        }

        for (name, color) in [
            ("caption.text_color", &self.caption.text_color),
            ("caption.overlay_color", &self.caption.overlay_color),
        ] {
            if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
                warnings.push(format!("{name} '{color}' is not a 6-digit hex colour"));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            db_path: PathBuf::from("./data/memoria.db"),
        }
    }
}

/// Identity verification settings.
///
/// With `enabled = false` the user id in the request path is trusted as
/// given. With `enabled = true` every `/api` request must carry a bearer
/// token that maps to exactly that user id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Bearer token -> user id.
    pub tokens: HashMap<String, String>,
}

/// Parameters of the caption overlay directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    /// Captions longer than this many characters are cut and get `...`.
    pub max_chars: usize,
    pub font: String,
    pub text_color: String,
    pub overlay_color: String,
    pub colorize_strength: u32,
    /// Horizontal nudge of the text layer, in pixels.
    pub x_nudge: i32,
    /// Path segment after which the directive is spliced.
    pub marker: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            max_chars: 20,
            font: "georgia".into(),
            text_color: "DDD9D9".into(),
            overlay_color: "000000".into(),
            colorize_strength: 40,
            x_nudge: -30,
            marker: "/upload".into(),
        }
    }
}
