use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("failed to parse canvas configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid canvas configuration: {0}")]
    Invalid(String),
    #[error("debug surface host failed for '{label}'")]
    Host {
        label: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("draw callback failed for '{label}'")]
    Draw {
        label: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode surface image to {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("gpu texture mismatch: {0}")]
    Gpu(String),
    #[error("failed to acquire a GPU device: {0}")]
    Device(String),
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;
