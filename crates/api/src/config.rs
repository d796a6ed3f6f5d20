use std::path::PathBuf;
use std::time::Duration;

use reelcast_cloud::SupabaseConfig;
use reelcast_core::rendering::manim::{DEFAULT_PROGRAM, DEFAULT_TIMEOUT_SECS};
use reelcast_core::rendering::RendererSettings;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// Supabase credentials, which are reported as missing by `/health`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A `*` entry allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Must leave room
    /// for a full render plus upload.
    pub request_timeout_secs: u64,
    /// Renderer invocation and work directory settings.
    pub render: RenderConfig,
    /// Supabase project and bucket.
    pub supabase: SupabaseConfig,
    /// Mount `/debug/files` (default: `false`).
    pub debug_routes: bool,
}

/// Renderer settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Renderer executable (default: `manim`).
    pub renderer_bin: String,
    /// Per-render timeout in seconds (default: `120`).
    pub timeout_secs: u64,
    /// Parent of the per-request work directories (default: system temp dir).
    pub work_root: PathBuf,
    /// Render a tiny scene at startup (default: `false`).
    pub warm_up: bool,
}

impl RenderConfig {
    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            program: self.renderer_bin.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default            |
    /// |------------------------|--------------------|
    /// | `HOST`                 | `0.0.0.0`          |
    /// | `PORT`                 | `5000`             |
    /// | `CORS_ORIGINS`         | `*`                |
    /// | `REQUEST_TIMEOUT_SECS` | `300`              |
    /// | `RENDERER_BIN`         | `manim`            |
    /// | `RENDER_TIMEOUT_SECS`  | `120`              |
    /// | `RENDER_WORK_ROOT`     | system temp dir    |
    /// | `RENDER_WARMUP`        | `false`            |
    /// | `DEBUG_ROUTES`         | `false`            |
    ///
    /// Supabase variables are read by [`SupabaseConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let render = RenderConfig {
            renderer_bin: std::env::var("RENDERER_BIN").unwrap_or_else(|_| DEFAULT_PROGRAM.into()),
            timeout_secs: std::env::var("RENDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .expect("RENDER_TIMEOUT_SECS must be a valid u64"),
            work_root: std::env::var("RENDER_WORK_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            warm_up: env_flag("RENDER_WARMUP"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            render,
            supabase: SupabaseConfig::from_env(),
            debug_routes: env_flag("DEBUG_ROUTES"),
        }
    }
}

/// `true` for `1`, `true`, `yes` or `on` (any case); `false` otherwise.
fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
