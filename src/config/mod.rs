mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./streamcat.toml",
        "./config.toml",
        "~/.config/streamcat/config.toml",
        "/etc/streamcat/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Database path with `~` expanded.
pub fn database_path(config: &Config) -> String {
    shellexpand::tilde(&config.database.path).into_owned()
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.database.path.trim().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    if config.database.pool_size == 0 {
        anyhow::bail!("Database pool_size must be greater than 0");
    }

    if config.streaming.read_buffer_bytes == 0 {
        anyhow::bail!("Streaming read_buffer_bytes must be greater than 0");
    }

    if axum::http::HeaderValue::from_str(&config.streaming.cache_control).is_err() {
        anyhow::bail!(
            "Streaming cache_control is not a valid header value: {:?}",
            config.streaming.cache_control
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "streamcat.db");
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.streaming.read_buffer_bytes, 65536);
        assert_eq!(config.streaming.cache_control, "private, no-cache");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(
            r#"
[server]
port = 9000

[streaming]
read_buffer_bytes = 8192
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.streaming.read_buffer_bytes, 8192);
        assert_eq!(config.database.pool_size, 4);
    }

    #[test]
    fn rejects_invalid_values() {
        for contents in [
            "[server]\nport = 0\n",
            "[database]\npool_size = 0\n",
            "[database]\npath = \"  \"\n",
            "[streaming]\nread_buffer_bytes = 0\n",
            "[streaming]\ncache_control = \"bad\\nvalue\"\n",
        ] {
            let file = write_config(contents);
            assert!(load_config(file.path()).is_err(), "{contents}");
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        let file = write_config("[server\nport = ");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn custom_path_must_exist() {
        let missing = Path::new("/definitely/not/here/streamcat.toml");
        assert!(load_config_or_default(Some(missing)).is_err());
    }

    #[test]
    fn tilde_is_expanded() {
        let mut config = Config::default();
        config.database.path = "~/catalog.db".into();
        assert!(!database_path(&config).starts_with('~'));
    }
}
