use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub postgres: PostgresConfig,
    pub llm: LlmConfig,
    pub ocr: OcrConfig,
    pub auth: AuthConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `LEGALYZE_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("LEGALYZE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            postgres: PostgresConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ocr: OcrConfig::from_env_profiled(p),
            auth: AuthConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{} (max upload {} MB)", self.server.host, self.server.port, self.server.max_upload_mb);
        tracing::info!("  postgres:    host={}, db={}, configured={}", self.postgres.host, self.postgres.database, self.postgres.is_configured());
        tracing::info!("  llm:         url={}, model={}, configured={}", self.llm.api_url, self.llm.model, self.llm.is_configured());
        tracing::info!("  ocr:         binary={}, language={}", self.ocr.binary, self.ocr.language);
        tracing::info!("  auth:        {} dev session token(s)", self.auth.dev_tokens.len());
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": {
                "host": self.server.host,
                "port": self.server.port,
                "max_upload_mb": self.server.max_upload_mb,
            },
            "postgres": {
                "host": self.postgres.host,
                "port": self.postgres.port,
                "database": self.postgres.database,
                "configured": self.postgres.is_configured(),
            },
            "llm": {
                "api_url": self.llm.api_url,
                "model": self.llm.model,
                "temperature": self.llm.temperature,
                "max_tokens": self.llm.max_tokens,
                "configured": self.llm.is_configured(),
            },
            "ocr": { "binary": self.ocr.binary, "language": self.ocr.language },
            "auth": { "dev_tokens": self.auth.dev_tokens.len() },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub max_upload_mb: u32,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 3000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_mb: profiled_env_u32(p, "MAX_UPLOAD_MB", 10),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }
}

// ── PostgreSQL ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl PostgresConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "PG_HOST", "localhost"),
            port: profiled_env_u16(p, "PG_PORT", 5432),
            database: profiled_env_or(p, "PG_DATABASE", "legalyze"),
            username: profiled_env_opt(p, "PG_USERNAME"),
            password: profiled_env_opt(p, "PG_PASSWORD"),
            ssl_mode: profiled_env_or(p, "PG_SSL_MODE", "prefer"),
            max_connections: profiled_env_u32(p, "PG_MAX_CONNECTIONS", 10),
        }
    }

    pub fn connection_string(&self) -> String {
        let user = self.username.as_deref().unwrap_or("postgres");
        let pass = self.password.as_deref().unwrap_or("");
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            user, pass, self.host, self.port, self.database, self.ssl_mode
        )
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some()
    }
}

// ── LLM (OpenAI-compatible chat completions) ─────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Base URL including the version segment, e.g. `https://api.x.ai/v1`.
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "LLM_API_KEY"),
            api_url: profiled_env_or(p, "LLM_API_URL", "https://api.x.ai/v1"),
            model: profiled_env_or(p, "LLM_MODEL", "grok-beta"),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.2")
                .parse()
                .unwrap_or(0.2),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 2000),
            timeout_secs: profiled_env_u64(p, "LLM_TIMEOUT_SECS", 120),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── OCR ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    pub binary: String,
    pub language: String,
    pub timeout_secs: u64,
    /// Scratch directory for images handed to the binary; system temp dir when unset.
    pub work_dir: Option<String>,
}

impl OcrConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            binary: profiled_env_or(p, "OCR_BINARY", "tesseract"),
            language: profiled_env_or(p, "OCR_LANGUAGE", "eng"),
            timeout_secs: profiled_env_u64(p, "OCR_TIMEOUT_SECS", 60),
            work_dir: profiled_env_opt(p, "OCR_WORK_DIR"),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout_secs: 60,
            work_dir: None,
        }
    }
}

// ── Auth ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// `(token, user_id)` pairs seeded into the in-memory session provider.
    pub dev_tokens: Vec<(String, String)>,
}

impl AuthConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dev_tokens: profiled_env_opt(p, "DEV_SESSION_TOKENS")
                .map(|raw| parse_token_pairs(&raw))
                .unwrap_or_default(),
        }
    }
}

/// Parse `token=user,token2=user2`. Malformed pairs are skipped.
pub fn parse_token_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (token, user) = pair.split_once('=')?;
            let (token, user) = (token.trim(), user.trim());
            if token.is_empty() || user.is_empty() {
                tracing::warn!("Ignoring malformed DEV_SESSION_TOKENS entry: {:?}", pair);
                return None;
            }
            Some((token.to_string(), user.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_pairs_parse_and_skip_garbage() {
        let pairs = parse_token_pairs("abc=alice, def = bob,broken,=nobody,ghi=");
        assert_eq!(
            pairs,
            vec![
                ("abc".to_string(), "alice".to_string()),
                ("def".to_string(), "bob".to_string()),
            ]
        );
    }

    #[test]
    fn postgres_connection_string() {
        let pg = PostgresConfig {
            host: "db".into(),
            port: 5433,
            database: "legalyze".into(),
            username: Some("app".into()),
            password: Some("secret".into()),
            ssl_mode: "disable".into(),
            max_connections: 5,
        };
        assert_eq!(
            pg.connection_string(),
            "postgres://app:secret@db:5433/legalyze?sslmode=disable"
        );
        assert!(pg.is_configured());
    }

    #[test]
    fn redacted_summary_has_no_api_key() {
        let mut config = Config::for_profile("LEGALYZE_TEST_UNUSED_PROFILE");
        config.llm.api_key = Some("sk-very-secret".into());
        let text = config.redacted_summary().to_string();
        assert!(!text.contains("sk-very-secret"));
        assert!(text.contains("\"configured\":true"));
    }

    #[test]
    fn upload_limit_in_bytes() {
        let server = ServerConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            cors_origin: "*".into(),
            max_upload_mb: 2,
        };
        assert_eq!(server.max_upload_bytes(), 2 * 1024 * 1024);
    }
}
