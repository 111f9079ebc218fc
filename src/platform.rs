use crate::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

/// Directory inside staging that receives platform plugins
pub const PLATFORMS_DIR: &str = "platforms";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Windows,
    Linux,
    MacOS,
}

impl Platform {
    /// Get platform identifier as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }

    /// File name of the Qt platform integration plugin
    pub fn plugin_file(&self) -> &'static str {
        match self {
            Platform::Windows => "qwindows.dll",
            Platform::Linux => "libqxcb.so",
            Platform::MacOS => "libqcocoa.dylib",
        }
    }

    /// Location of the platform plugin relative to the SDK root
    pub fn plugin_path(&self) -> PathBuf {
        ["qtbase", "plugins", PLATFORMS_DIR, self.plugin_file()]
            .iter()
            .collect()
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" | "mac" | "osx" => Ok(Platform::MacOS),
            _ => Err(Error::UnknownPlatform(s.to_string())),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
