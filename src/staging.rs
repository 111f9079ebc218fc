//! The staging directory: a flat copy of the install list plus SDK plugins,
//! mirroring the archive contents before compression.

use crate::config::CollisionPolicy;
use crate::context::Context;
use crate::error::Error;
use crate::manifest::InstallList;
use crate::plugin::PluginSpec;
use crate::result::Result;
use crate::utils;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Staging {
    /// Directory on disk
    root: PathBuf,
    /// Leading path of every archive entry
    prefix: PathBuf,
    policy: CollisionPolicy,
    /// Staged path (relative to root) -> source it was copied from
    staged: HashMap<PathBuf, PathBuf>,
}

impl Staging {
    pub fn new(ctx: &Context, dir: &Path, policy: CollisionPolicy) -> Self {
        let root = ctx.resolve(dir);
        let prefix = if dir.is_absolute() {
            dir.file_name().map(PathBuf::from).unwrap_or_default()
        } else {
            utils::normal_components(dir)
        };

        Self {
            root,
            prefix,
            policy,
            staged: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Delete the staging directory with all its contents and recreate it empty
    pub fn reset(&mut self) -> Result<()> {
        utils::reset_dir(&self.root)?;
        self.staged.clear();
        Ok(())
    }

    /// Copy every install list entry into the staging root by file name
    ///
    /// Prints each entry as written once it has been copied. Returns the
    /// number of copies made.
    pub fn copy_install_list(&mut self, ctx: &Context, list: &InstallList) -> Result<usize> {
        if list.is_empty() {
            cliclack::log::warning("install list is empty")?;
        }

        for entry in &list.entries {
            let source = ctx.resolve(&entry.path);
            let dest = self.stage_file(ctx, "install list entry", &source, Path::new(""))?;
            println!("{}", entry.path.display());

            if ctx.verbose {
                cliclack::log::remark(format!(
                    "line {}: {} -> {}",
                    entry.line,
                    source.display(),
                    dest.display()
                ))?;
            }
        }

        Ok(list.len())
    }

    /// Copy each plugin into its subdirectory under the staging root
    pub fn install_plugins(&mut self, ctx: &Context, plugins: &[PluginSpec]) -> Result<usize> {
        for plugin in plugins {
            let dest = self.stage_file(ctx, "platform plugin", &plugin.source, &plugin.dest)?;

            if ctx.verbose {
                println!("Copying {} to {}", plugin.source.display(), dest.display());
            }
        }

        Ok(plugins.len())
    }

    /// Copy `source` to `<root>/<dest_dir>/<file name>`
    fn stage_file(
        &mut self,
        ctx: &Context,
        kind: &'static str,
        source: &Path,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(Error::MissingFile {
                kind,
                path: source.to_path_buf(),
            });
        }

        let name = source
            .file_name()
            .ok_or_else(|| Error::custom(format!("{} has no file name", source.display())))?;
        let relative = utils::normal_components(dest_dir).join(name);

        if let Some(first) = self.staged.get(&relative)
            && !utils::same_file(first, source)
        {
            match self.policy {
                CollisionPolicy::Error => {
                    return Err(Error::NameCollision {
                        name: relative.display().to_string(),
                        first: first.clone(),
                        second: source.to_path_buf(),
                    });
                }
                CollisionPolicy::Overwrite => {
                    cliclack::log::warning(format!(
                        "{} replaces {} as {}",
                        source.display(),
                        first.display(),
                        relative.display()
                    ))?;
                }
            }
        }

        let dest = self.root.join(&relative);
        if let Some(parent) = dest.parent() {
            utils::ensure_dir(parent)?;
        }

        if ctx.verbose && self.staged.contains_key(&relative) {
            println!("Overwriting {}", dest.display());
        }

        fs::copy(source, &dest).map_err(Error::fs("copy", source))?;
        self.staged.insert(relative, source.to_path_buf());

        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        dir: tempfile::TempDir,
        ctx: Context,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let ctx = Context::new(dir.path().to_path_buf(), false);
            Self { dir, ctx }
        }

        fn write(&self, relative: &str, content: &str) {
            let path = self.dir.path().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn staging(&self, policy: CollisionPolicy) -> Staging {
            let mut staging = Staging::new(&self.ctx, Path::new("bin"), policy);
            staging.reset().unwrap();
            staging
        }

        fn read(&self, relative: &str) -> String {
            fs::read_to_string(self.dir.path().join(relative)).unwrap()
        }
    }

    #[test]
    fn test_files_are_flattened_to_base_name() {
        let fx = Fixture::new();
        fx.write("build/release/app.exe", "binary");
        fx.write("docs/readme.txt", "hello");

        let list = InstallList::parse("build/release/app.exe\n\ndocs/readme.txt\n").unwrap();
        let mut staging = fx.staging(CollisionPolicy::Error);
        let copied = staging.copy_install_list(&fx.ctx, &list).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fx.read("bin/app.exe"), "binary");
        assert_eq!(fx.read("bin/readme.txt"), "hello");
    }

    #[test]
    fn test_reset_removes_previous_contents() {
        let fx = Fixture::new();
        fx.write("bin/stale.dll", "old");
        fx.write("bin/platforms/old.dll", "old");

        let staging = fx.staging(CollisionPolicy::Error);

        assert!(staging.root().is_dir());
        assert_eq!(fs::read_dir(staging.root()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_entry_aborts() {
        let fx = Fixture::new();
        let list = InstallList::parse("missing.dll\n").unwrap();
        let mut staging = fx.staging(CollisionPolicy::Error);

        let err = staging.copy_install_list(&fx.ctx, &list).unwrap_err();
        assert!(matches!(err, Error::MissingFile { kind: "install list entry", .. }));
    }

    #[test]
    fn test_directory_entry_is_not_a_file() {
        let fx = Fixture::new();
        fx.write("lib/a.dll", "a");
        let list = InstallList::parse("lib\n").unwrap();
        let mut staging = fx.staging(CollisionPolicy::Error);

        assert!(staging.copy_install_list(&fx.ctx, &list).is_err());
    }

    #[test]
    fn test_same_source_twice_is_not_a_collision() {
        let fx = Fixture::new();
        fx.write("a.dll", "a");
        let list = InstallList::parse("a.dll\n./a.dll\n").unwrap();
        let mut staging = fx.staging(CollisionPolicy::Error);

        assert_eq!(staging.copy_install_list(&fx.ctx, &list).unwrap(), 2);
        assert_eq!(fx.read("bin/a.dll"), "a");
    }

    #[test]
    fn test_base_name_collision_is_reported() {
        let fx = Fixture::new();
        fx.write("x/util.dll", "x");
        fx.write("y/util.dll", "y");
        let list = InstallList::parse("x/util.dll\ny/util.dll\n").unwrap();
        let mut staging = fx.staging(CollisionPolicy::Error);

        let err = staging.copy_install_list(&fx.ctx, &list).unwrap_err();
        match err {
            Error::NameCollision { name, first, second } => {
                assert_eq!(name, "util.dll");
                assert!(first.ends_with("x/util.dll"));
                assert!(second.ends_with("y/util.dll"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overwrite_policy_keeps_later_file() {
        let fx = Fixture::new();
        fx.write("x/util.dll", "x");
        fx.write("y/util.dll", "y");
        let list = InstallList::parse("x/util.dll\ny/util.dll\n").unwrap();
        let mut staging = fx.staging(CollisionPolicy::Overwrite);

        staging.copy_install_list(&fx.ctx, &list).unwrap();
        assert_eq!(fx.read("bin/util.dll"), "y");
    }

    #[test]
    fn test_plugins_land_in_subdirectory() {
        let fx = Fixture::new();
        fx.write("qt/qtbase/plugins/platforms/qwindows.dll", "plugin");
        let plugins = vec![PluginSpec {
            source: fx.dir.path().join("qt/qtbase/plugins/platforms/qwindows.dll"),
            dest: PathBuf::from("platforms"),
        }];
        let mut staging = fx.staging(CollisionPolicy::Error);

        assert_eq!(staging.install_plugins(&fx.ctx, &plugins).unwrap(), 1);
        assert_eq!(fx.read("bin/platforms/qwindows.dll"), "plugin");
    }

    #[test]
    fn test_missing_plugin_aborts() {
        let fx = Fixture::new();
        let plugins = vec![PluginSpec {
            source: fx.dir.path().join("qt/qtbase/plugins/platforms/qwindows.dll"),
            dest: PathBuf::from("platforms"),
        }];
        let mut staging = fx.staging(CollisionPolicy::Error);

        let err = staging.install_plugins(&fx.ctx, &plugins).unwrap_err();
        assert!(matches!(err, Error::MissingFile { kind: "platform plugin", .. }));
    }

    #[test]
    fn test_archive_prefix() {
        let fx = Fixture::new();
        let relative = Staging::new(&fx.ctx, Path::new("./out/bin"), CollisionPolicy::Error);
        assert_eq!(relative.prefix(), Path::new("out/bin"));

        let absolute_dir = fx.dir.path().join("stage");
        let absolute = Staging::new(&fx.ctx, &absolute_dir, CollisionPolicy::Error);
        assert_eq!(absolute.prefix(), Path::new("stage"));
        assert_eq!(absolute.root(), absolute_dir);
    }
}
