// Configuration module entry point
// Manages application configuration, the startup secret, and shared state

mod secret;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use secret::SecretKey;
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ResourcesConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the specified file path (without extension)
    ///
    /// Every key has a built-in default, so the file is optional and a bare
    /// checkout starts with loopback defaults. Environment variables with
    /// the `GAMEHOST_` prefix override file values.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("GAMEHOST").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("resources.template_dir", "templates")?
            .set_default("resources.index_template", "index.html")?
            .set_default("resources.static_dir", "static")?
            .set_default("resources.static_route", "/static")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "gamehost/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("no-such-config").expect("defaults should load");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.resources.static_route, "/static");
        assert_eq!(cfg.resources.index_template, "index.html");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_socket_addr_from_defaults() {
        let cfg = Config::load_from("no-such-config").expect("defaults should load");
        let addr = cfg.socket_addr().expect("default address should parse");
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"0.0.0.0\"\nport = 8400\nworkers = 2\n\n[resources]\nstatic_dir = \"assets\"\n",
        )
        .expect("write config file");

        let stem = path.with_extension("");
        let cfg = Config::load_from(stem.to_str().expect("utf-8 path")).expect("load");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8400);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.resources.static_dir, "assets");
        // Untouched sections keep their defaults
        assert_eq!(cfg.resources.template_dir, "templates");
        assert_eq!(cfg.performance.read_timeout, 30);
    }
}
