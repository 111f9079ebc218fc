use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write every file under `source_dir` into a new zip archive at `output_path`
///
/// Entries are named `<prefix>/<path below source_dir>`. The archive is built
/// next to the output and renamed over it only once complete, so a failure
/// leaves any earlier archive in place. Returns the number of entries written.
pub fn create_zip(source_dir: &Path, prefix: &Path, output_path: &Path) -> Result<usize> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        utils::ensure_dir(parent)?;
    }

    let partial = partial_path(output_path);
    match write_zip(source_dir, prefix, &partial) {
        Ok(count) => {
            fs::rename(&partial, output_path).map_err(Error::fs("replace", output_path))?;
            Ok(count)
        }
        Err(err) => {
            let _ = fs::remove_file(&partial);
            Err(err)
        }
    }
}

fn partial_path(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    output_path.with_file_name(name)
}

fn write_zip(source_dir: &Path, prefix: &Path, output_path: &Path) -> Result<usize> {
    let file = File::create(output_path).map_err(Error::fs("create", output_path))?;
    let mut zip = ZipWriter::new(file);
    let mut count = 0;

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|_| Error::custom(format!("{} escaped the staging directory", entry.path().display())))?;
        let name = utils::entry_name(prefix, relative);

        zip.start_file(name, file_options(&entry)?)?;
        let mut f = File::open(entry.path()).map_err(Error::fs("open", entry.path()))?;
        io::copy(&mut f, &mut zip)?;
        count += 1;
    }

    zip.finish()?;
    Ok(count)
}

#[cfg(unix)]
fn file_options(entry: &DirEntry) -> Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;
    let mode = entry.metadata()?.permissions().mode();
    Ok(SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(mode & 0o777))
}

#[cfg(not(unix))]
fn file_options(_entry: &DirEntry) -> Result<SimpleFileOptions> {
    Ok(SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated))
}
