use crate::args::{Args, SDK_ROOT_ENV};
use crate::context::Context;
use crate::error::Error;
use crate::platform::Platform;
use crate::plugin::PluginSpec;
use crate::result::Result;
use crate::tpl::Tpl;
use crate::utils;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "stagepack.toml";
pub const DEFAULT_LIST: &str = "install_list.txt";
pub const DEFAULT_STAGING: &str = "bin";
pub const DEFAULT_OUTPUT: &str = "package.zip";

/// What to do when two different sources map to the same staged path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    #[default]
    Error,
    Overwrite,
}

/// Contents of `stagepack.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub list: Option<String>,

    #[serde(default)]
    pub staging: Option<String>,

    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub sdk_root: Option<String>,

    #[serde(default)]
    pub platforms: Option<Vec<String>>,

    #[serde(default)]
    pub on_collision: Option<CollisionPolicy>,

    #[serde(rename = "plugin", default)]
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginEntry {
    pub source: String,

    #[serde(default)]
    pub dest: Option<String>,
}

impl ConfigFile {
    /// Load the config file named on the command line, or `stagepack.toml`
    /// from the working directory when it exists
    pub fn load(ctx: &Context, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                let path = ctx.resolve(path);
                if !path.is_file() {
                    return Err(Error::ConfigNotFound(path));
                }
                path
            }
            None => {
                let path = ctx.base_dir.join(DEFAULT_CONFIG);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path).map_err(Error::fs("read", &path))?;
        Ok(toml::from_str(&content)?)
    }
}

/// Fully resolved packaging configuration
///
/// Every input of a packaging run is carried here; nothing is read from the
/// environment after resolution.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Install list, resolved against the working directory
    pub list: PathBuf,
    /// Staging directory as configured (relative paths name archive entries)
    pub staging: PathBuf,
    /// Output archive, resolved against the working directory
    pub output: PathBuf,
    pub plugins: Vec<PluginSpec>,
    pub on_collision: CollisionPolicy,
}

impl PackConfig {
    /// Resolve command-line arguments and the optional config file
    pub fn resolve(ctx: &Context, args: &Args) -> Result<Self> {
        let file = ConfigFile::load(ctx, args.config.as_deref())?;
        Self::from_parts(ctx, args, file)
    }

    /// Merge arguments over file settings over built-in defaults
    pub fn from_parts(ctx: &Context, args: &Args, file: ConfigFile) -> Result<Self> {
        let platforms: Vec<Platform> = if !args.platforms.is_empty() {
            args.platforms
                .iter()
                .map(|p| p.parse::<Platform>())
                .collect::<Result<_>>()?
        } else if let Some(names) = &file.platforms {
            names.iter().map(|p| p.parse::<Platform>()).collect::<Result<_>>()?
        } else {
            vec![Platform::default()]
        };

        let sdk_root = args
            .sdk_root
            .clone()
            .or_else(|| file.sdk_root.as_ref().map(PathBuf::from))
            .map(|root| ctx.resolve(&root));

        let needs_sdk = !platforms.is_empty()
            || file.plugins.iter().any(|p| {
                Tpl::references(&p.source, "SDK_ROOT") || Path::new(&p.source).is_relative()
            });
        if needs_sdk && sdk_root.is_none() {
            return Err(Error::SdkRootNotSet { var: SDK_ROOT_ENV });
        }

        let mut tpl = Tpl::new();
        if let Some(root) = &sdk_root {
            tpl.register("SDK_ROOT", root.to_string_lossy());
        }
        tpl.register(
            "PLATFORM",
            platforms.first().map(Platform::as_str).unwrap_or_default(),
        );

        let mut plugins: Vec<PluginSpec> = Vec::new();
        if let Some(root) = &sdk_root {
            plugins.extend(platforms.iter().map(|p| PluginSpec::for_platform(root, *p)));
        }
        for entry in &file.plugins {
            let source = tpl.parse(&entry.source);
            let dest = entry.dest.as_ref().map(|d| tpl.parse(d));
            plugins.push(PluginSpec::from_config(
                sdk_root.as_deref(),
                &source,
                dest.as_deref(),
            ));
        }

        let list = args
            .list
            .clone()
            .or_else(|| file.list.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LIST));

        let staging = args
            .staging
            .clone()
            .or_else(|| file.staging.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING));

        let output = args
            .output
            .as_ref()
            .map(|o| o.to_string_lossy().into_owned())
            .or_else(|| file.output.clone())
            .map(|o| PathBuf::from(tpl.parse(&o)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let on_collision = if args.allow_overwrite {
            CollisionPolicy::Overwrite
        } else {
            file.on_collision.unwrap_or_default()
        };

        let config = Self {
            list: ctx.resolve(&list),
            staging,
            output: ctx.resolve(&output),
            plugins,
            on_collision,
        };
        config.validate(ctx)?;
        Ok(config)
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        // Resetting staging removes it recursively, so it has to name a real subdirectory
        if self.staging.file_name().is_none() {
            return Err(Error::custom(format!(
                "staging directory '{}' must name a directory below the working directory",
                self.staging.display()
            )));
        }

        if self.output.file_name().is_none() {
            return Err(Error::custom(format!(
                "output '{}' does not name a file",
                self.output.display()
            )));
        }

        // Compare resolved locations: `../proj` or a symlink can name the working directory
        let base_dir = utils::canonical_path(&ctx.base_dir);
        let staging_root = utils::canonical_path(&ctx.resolve(&self.staging));
        let output = utils::canonical_path(&self.output);

        if output.starts_with(&staging_root) {
            return Err(Error::custom(format!(
                "output '{}' must not be inside the staging directory",
                self.output.display()
            )));
        }

        if base_dir.starts_with(&staging_root) {
            return Err(Error::custom(format!(
                "staging directory '{}' contains the working directory",
                self.staging.display()
            )));
        }

        Ok(())
    }
}
