use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to {action} {}: {source}", .path.display())]
    Fs {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SDK root is not set; pass --sdk-root or set the {var} environment variable")]
    SdkRootNotSet { var: &'static str },

    #[error("{kind} not found: {}", .path.display())]
    MissingFile { kind: &'static str, path: PathBuf },

    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("install list line {line}: '{entry}' does not name a file")]
    InvalidEntry { line: usize, entry: String },

    #[error("unknown platform '{0}' (expected windows, linux or macos)")]
    UnknownPlatform(String),

    #[error("'{name}' is staged from both {} and {}", .first.display(), .second.display())]
    NameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    pub fn custom<T: Into<String>>(msg: T) -> Self {
        Error::Custom(msg.into())
    }

    /// Adapter for `map_err` that records which filesystem action failed on which path
    pub fn fs(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Fs { action, path, source }
    }
}
