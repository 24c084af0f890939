use thiserror::Error;

use crate::core::types::{Cell, SiteId, SiteKind};

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Site not found: {0}")]
    SiteNotFound(SiteId),

    #[error("Site {0} already registered")]
    DuplicateSite(SiteId),

    #[error("Site {0} cannot be run as {1:?}")]
    UnsupportedKind(SiteId, SiteKind),

    #[error("No clear {width}x{height} area left on the plan")]
    NoClearArea { width: u32, height: u32 },

    #[error("No clear cell adjacent to {0}")]
    NoClearAdjacent(Cell),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SiteError>;
