use std::path::{Path, PathBuf};

/// Errors that can occur while loading the bearer token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("failed to read token file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token file {} is empty", .path.display())]
    Empty { path: PathBuf },
}

/// Token file path: `dressel/earthdata.token` under the platform config
/// directory (`~/.config` on Linux, `~/Library/Application Support` on macOS).
pub fn default_token_path() -> Result<PathBuf, TokenError> {
    dirs::config_dir()
        .map(|d| d.join("dressel").join("earthdata.token"))
        .ok_or(TokenError::NoConfigDir)
}

/// Read the bearer token, trimming surrounding whitespace.
pub fn load_token(path: &Path) -> Result<String, TokenError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TokenError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let token = contents.trim();
    if token.is_empty() {
        return Err(TokenError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(token.to_owned())
}
