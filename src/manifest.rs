use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// One file named by the install list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 1-based line number in the install list
    pub line: usize,
    /// The path as written (surrounding whitespace removed)
    pub path: PathBuf,
}

/// Parsed install list: the files to be copied into staging, in order
#[derive(Debug, Default)]
pub struct InstallList {
    pub entries: Vec<Entry>,
}

impl InstallList {
    /// Load and parse the install list at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingFile {
                kind: "install list",
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(Error::fs("read", path))?;
        Self::parse(&content)
    }

    /// Parse install list text
    ///
    /// Blank lines are skipped. There is no comment syntax: every other line,
    /// trimmed, is taken as a path.
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut entries = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }

            let path = PathBuf::from(trimmed);
            if path.file_name().is_none() {
                return Err(Error::InvalidEntry {
                    line: index + 1,
                    entry: trimmed.to_string(),
                });
            }

            entries.push(Entry {
                line: index + 1,
                path,
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_skipped() {
        let list = InstallList::parse("app.exe\n\n   \nreadme.txt\r\n").unwrap();
        let paths: Vec<_> = list.entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("app.exe"), PathBuf::from("readme.txt")]);
        assert_eq!(list.entries[1].line, 4);
    }

    #[test]
    fn test_no_comment_syntax() {
        let list = InstallList::parse("# notes.txt\n").unwrap();
        assert_eq!(list.entries[0].path, PathBuf::from("# notes.txt"));
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let list = InstallList::parse("a.dll\nb.dll\na.dll\n").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.entries[2].path, PathBuf::from("a.dll"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let list = InstallList::parse("\u{feff}app.exe\n").unwrap();
        assert_eq!(list.entries[0].path, PathBuf::from("app.exe"));
    }

    #[test]
    fn test_entry_without_file_name() {
        let err = InstallList::parse("app.exe\n..\n").unwrap_err();
        assert!(matches!(err, Error::InvalidEntry { line: 2, .. }));
    }

    #[test]
    fn test_empty_list() {
        assert!(InstallList::parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InstallList::load(&dir.path().join("install_list.txt")).unwrap_err();
        assert!(matches!(err, Error::MissingFile { kind: "install list", .. }));
    }
}
