use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use ubl_engine::{AtomicFileWriter, UblConfig};

pub const DEFAULT_CONFIG_FILENAME: &str = "ubl.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// How a config was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// The file was missing; defaults were used and written out if possible.
    Defaults { write_error: Option<String> },
}

/// Reads the config at `path`. A missing file is replaced by the defaults.
pub fn load_or_create(path: &Path) -> Result<(UblConfig, ConfigOrigin), ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let config = UblConfig::default();
            let write_error = write_config(path, &config).err();
            return Ok((config, ConfigOrigin::Defaults { write_error }));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((config, ConfigOrigin::File))
}

fn write_config(path: &Path, config: &UblConfig) -> Result<(), String> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty).map_err(|err| err.to_string())?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("{:?} has no usable file name", path))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    AtomicFileWriter::new(dir)
        .write(filename, content.as_bytes())
        .map(|_| ())
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults_and_writes_them() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILENAME);

        let (config, origin) = load_or_create(&path).unwrap();
        assert_eq!(config, UblConfig::default());
        assert_eq!(origin, ConfigOrigin::Defaults { write_error: None });

        let (reloaded, origin) = load_or_create(&path).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(origin, ConfigOrigin::File);
    }

    #[test]
    fn partial_file_uses_raw_kebab_case_names_and_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(
            &path,
            r##"(r#banlist-url: "https://example.com/ubl.csv", r#auto-check-interval: 0)"##,
        )
        .unwrap();

        let (config, _) = load_or_create(&path).unwrap();
        assert_eq!(config.banlist_url, "https://example.com/ubl.csv");
        assert_eq!(config.auto_check_interval, 0);
        assert_eq!(config.retries, 3);
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, "(retries: \"lots\"").unwrap();

        let err = load_or_create(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unreadable_location_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = load_or_create(&blocker.join(DEFAULT_CONFIG_FILENAME)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
