use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

/// Anything that can produce the raw text of a variable's observation file.
pub trait Source: Sync {
    /// Raw newline-delimited observations for `name`. A missing or
    /// unreadable variable is an error.
    fn read(&self, name: &str) -> anyhow::Result<String>;
}

/// Variable files laid out as `<root>/<name>.csv`.
///
/// When `archive` is set, every file read is also copied to the same
/// relative location under the archive directory.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
    archive: Option<PathBuf>,
}

impl Directory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            archive: None,
        }
    }
    pub fn archive(mut self, archive: impl Into<PathBuf>) -> Self {
        self.archive = Some(archive.into());
        self
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    /// path to a variable's file under `base`
    fn path(base: &Path, name: &str) -> PathBuf {
        base.join(format!("{}.csv", name))
    }
    fn preserve(&self, name: &str) -> anyhow::Result<()> {
        if let Some(ref archive) = self.archive {
            let ref from = Self::path(&self.root, name);
            let ref into = Self::path(archive, name);
            if let Some(parent) = into.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create archive directory {}", parent.display()))?;
            }
            std::fs::copy(from, into)
                .with_context(|| format!("archive {} to {}", from.display(), into.display()))?;
        }
        Ok(())
    }
}

impl Source for Directory {
    fn read(&self, name: &str) -> anyhow::Result<String> {
        let ref path = Self::path(&self.root, name);
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read variable file {}", path.display()))?;
        self.preserve(name)?;
        Ok(text)
    }
}

/// In-memory source, keyed by variable name.
impl Source for BTreeMap<String, String> {
    fn read(&self, name: &str) -> anyhow::Result<String> {
        self.get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such variable: {}", name))
    }
}

/// Normalize one line of a variable list into a storage key.
/// Commas separate path segments and become `/`.
pub fn normalize(line: &str) -> String {
    line.trim().replace(',', "/")
}

/// Read a line-delimited variable list, skipping blank lines.
pub fn names(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read variable list {}", path.display()))?;
    Ok(text
        .lines()
        .map(normalize)
        .filter(|name| !name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_become_path_separators() {
        assert_eq!(normalize("proj,file.js,line_x"), "proj/file.js/line_x");
        assert_eq!(normalize("  plain \r"), "plain");
    }

    #[test]
    fn directory_reads_and_archives() {
        let root = tempfile::tempdir().expect("tempdir");
        let vault = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join("proj")).expect("mkdir");
        std::fs::write(root.path().join("proj/a.csv"), "1\n2\n").expect("write");
        let source = Directory::new(root.path()).archive(vault.path());
        assert_eq!(source.read("proj/a").expect("read"), "1\n2\n");
        let copied = std::fs::read_to_string(vault.path().join("proj/a.csv")).expect("copied");
        assert_eq!(copied, "1\n2\n");
    }

    #[test]
    fn directory_without_archive_is_pass_through() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::write(root.path().join("b.csv"), "3\n").expect("write");
        let source = Directory::new(root.path());
        assert_eq!(source.read("b").expect("read"), "3\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let source = Directory::new(root.path());
        assert!(source.read("missing").is_err());
    }

    #[test]
    fn names_skip_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ref list = dir.path().join("names.csv");
        std::fs::write(list, "a,b\n\nc\n").expect("write");
        assert_eq!(names(list).expect("names"), vec!["a/b", "c"]);
    }
}
