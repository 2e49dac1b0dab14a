#![allow(missing_docs)]

use std::{fs, path::Path};

use crate::{config::Config, error::Error};

/// Load configuration from file
pub fn load_config(config_file: &Path) -> Result<Config, Error> {
    let content =
        fs::read_to_string(config_file).map_err(|_| Error::OpenFile(config_file.to_path_buf()))?;
    toml::from_str(&content).map_err(|e| Error::Parse(e.to_string()))
}

/// Save configuration to file
pub fn save_config(config_file: &Path, config: &Config) -> Result<(), Error> {
    save(config_file, &toml::to_string_pretty(config).map_err(|e| Error::ToToml(e.to_string()))?)
}

/// Read an Engine API JWT secret: 32 raw bytes, or 64 hex chars with optional `0x` and
/// surrounding whitespace.
pub fn read_jwt_secret(path: &Path) -> Result<[u8; 32], Error> {
    let raw = fs::read(path).map_err(|_| Error::OpenFile(path.to_path_buf()))?;
    let invalid = |reason: String| Error::InvalidJwt { path: path.to_path_buf(), reason };

    if let Ok(secret) = <[u8; 32]>::try_from(raw.as_slice()) {
        return Ok(secret);
    }

    let text = String::from_utf8_lossy(&raw);
    let text = text.trim();
    let digits = text.strip_prefix("0x").unwrap_or(text);

    let decoded = hex::decode(digits)
        .map_err(|e| invalid(format!("must be 32 raw bytes or 64 hex chars: {e}")))?;
    let len = decoded.len();
    decoded
        .try_into()
        .map_err(|_| invalid(format!("must decode to exactly 32 bytes (got {len} bytes)")))
}

fn save(path: &Path, data: &str) -> Result<(), Error> {
    use std::io::Write;

    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|_| Error::ParentDir(parent_dir.to_path_buf()))?;
    }

    let mut f = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|_| Error::OpenFile(path.to_path_buf()))?;

    f.write_all(data.as_bytes()).map_err(|_| Error::WriteFile(path.to_path_buf()))?;

    Ok(())
}
