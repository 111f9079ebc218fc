use crate::platform::{PLATFORMS_DIR, Platform};
use std::path::{Path, PathBuf};

/// A file taken from the SDK installation and placed under a staging subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    /// Absolute (or working-directory relative) location of the plugin file
    pub source: PathBuf,
    /// Directory relative to the staging root that receives the file
    pub dest: PathBuf,
}

impl PluginSpec {
    /// The Qt platform integration plugin for `platform`
    pub fn for_platform(sdk_root: &Path, platform: Platform) -> Self {
        Self {
            source: sdk_root.join(platform.plugin_path()),
            dest: PathBuf::from(PLATFORMS_DIR),
        }
    }

    /// A plugin named in the config file
    ///
    /// Relative sources are looked up under the SDK root. Without an explicit
    /// destination the file lands in a directory named after its parent in the
    /// SDK (`plugins/imageformats/qjpeg.dll` goes to `imageformats/`).
    pub fn from_config(sdk_root: Option<&Path>, source: &str, dest: Option<&str>) -> Self {
        let source = PathBuf::from(source);
        let source = match sdk_root {
            Some(root) if source.is_relative() => root.join(source),
            _ => source,
        };

        let dest = match dest {
            Some(dest) => PathBuf::from(dest),
            None => source
                .parent()
                .and_then(Path::file_name)
                .map(PathBuf::from)
                .unwrap_or_default(),
        };

        Self { source, dest }
    }
}
