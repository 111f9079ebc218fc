use crate::archive;
use crate::config::PackConfig;
use crate::context::Context;
use crate::manifest::InstallList;
use crate::result::Result;
use crate::staging::Staging;
use std::path::PathBuf;

/// Outcome of a packaging run
#[derive(Debug)]
pub struct Report {
    /// Install list entries copied into staging
    pub copied: usize,
    /// Plugins installed from the SDK
    pub plugins: usize,
    /// Files written to the archive
    pub entries: usize,
    pub archive: PathBuf,
}

/// Runs the packaging steps for one resolved configuration
pub struct Packager<'a> {
    ctx: &'a Context,
    config: &'a PackConfig,
}

impl<'a> Packager<'a> {
    pub fn new(ctx: &'a Context, config: &'a PackConfig) -> Self {
        Self { ctx, config }
    }

    /// Reset staging, copy the install list and install plugins
    ///
    /// Returns the populated staging directory along with the number of
    /// install list copies and plugins.
    pub fn stage(&self) -> Result<(Staging, usize, usize)> {
        let list = InstallList::load(&self.config.list)?;

        let mut staging = Staging::new(self.ctx, &self.config.staging, self.config.on_collision);
        staging.reset()?;

        let copied = staging.copy_install_list(self.ctx, &list)?;
        let plugins = staging.install_plugins(self.ctx, &self.config.plugins)?;

        Ok((staging, copied, plugins))
    }

    /// Compress a staged tree into the configured archive
    pub fn archive(&self, staging: &Staging) -> Result<usize> {
        archive::create_zip(staging.root(), staging.prefix(), &self.config.output)
    }

    /// Stage and archive in one go
    pub fn run(&self) -> Result<Report> {
        let (staging, copied, plugins) = self.stage()?;

        let spinner = cliclack::spinner();
        spinner.start("Creating zip archive...");
        let entries = match self.archive(&staging) {
            Ok(entries) => {
                spinner.stop(format!("Archived {} file(s)", entries));
                entries
            }
            Err(e) => {
                spinner.error("Failed to create archive");
                return Err(e);
            }
        };

        Ok(Report {
            copied,
            plugins,
            entries,
            archive: self.config.output.clone(),
        })
    }
}
