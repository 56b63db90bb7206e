//! Argument resolution for config commands
//!
//! Turns raw command-line strings into validated inputs for the store:
//! absolute doc paths or URLs, expanded source file lists and config
//! selections. Nothing here touches the database.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;
use walkdir::WalkDir;

use crate::domain::{Config, DocCategory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("Missing file doc")]
    MissingDoc,

    #[error("Doc {0} is not a valid existing file, nor a valid URL")]
    InvalidDoc(String),

    #[error("Missing file/folder sources")]
    MissingSources,

    #[error("File/folder source {0} doesn't exist")]
    SourceNotFound(String),

    #[error("Cannot read source folder {0}: {1}")]
    UnreadableFolder(String, String),

    #[error("No source files found")]
    NoSourceFiles,

    #[error("{0} is not a number")]
    NotANumber(String),

    #[error("Value {0} is out of bounds")]
    OutOfBounds(usize),
}

/// Validated input for `config add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigAddArgs {
    /// Absolute doc path or URL
    pub doc: String,
    pub category: DocCategory,
    /// Absolute source file paths, sorted and deduplicated
    pub sources: Vec<String>,
}

/// Resolves `config add` arguments relative to `cwd`
pub fn parse_config_add_args(
    doc: Option<&str>,
    sources: Option<&str>,
    cwd: &Path,
) -> Result<ConfigAddArgs, ArgsError> {
    let doc = doc.map(str::trim).filter(|d| !d.is_empty()).ok_or(ArgsError::MissingDoc)?;
    let (doc, category) = resolve_doc(doc, cwd)?;

    let names: Vec<&str> = sources
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        return Err(ArgsError::MissingSources);
    }

    let mut files = BTreeSet::new();
    for name in names {
        let path = cwd.join(name);
        if !path.exists() {
            return Err(ArgsError::SourceNotFound(name.to_string()));
        }

        if path.is_dir() {
            for entry in WalkDir::new(&path).follow_links(true) {
                let entry = entry
                    .map_err(|e| ArgsError::UnreadableFolder(name.to_string(), e.to_string()))?;
                if entry.file_type().is_file() {
                    files.insert(absolute(entry.path()));
                }
            }
        } else {
            files.insert(absolute(&path));
        }
    }

    if files.is_empty() {
        return Err(ArgsError::NoSourceFiles);
    }

    Ok(ConfigAddArgs {
        doc,
        category,
        sources: files.into_iter().collect(),
    })
}

fn resolve_doc(doc: &str, cwd: &Path) -> Result<(String, DocCategory), ArgsError> {
    let path = cwd.join(doc);
    if path.is_file() {
        return Ok((absolute(&path), DocCategory::File));
    }

    match Url::parse(doc) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok((doc.to_string(), DocCategory::Url))
        }
        _ => Err(ArgsError::InvalidDoc(path.to_string_lossy().into_owned())),
    }
}

/// Canonical form of an existing path, or the path itself if that fails
fn absolute(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .into_owned()
}

/// Absolute form of a path that may no longer exist
///
/// Existing paths are canonicalized. For a missing file the parent directory
/// is canonicalized instead, so a renamed-away path still matches the form
/// stored at `config add` time.
pub fn resolve_path(raw: &str, cwd: &Path) -> String {
    let path = cwd.join(raw);
    if path.exists() {
        return absolute(&path);
    }

    match (path.parent().and_then(|p| p.canonicalize().ok()), path.file_name()) {
        (Some(parent), Some(name)) => parent.join(name).to_string_lossy().into_owned(),
        _ => path.to_string_lossy().into_owned(),
    }
}

/// Splits a comma-separated path list and resolves each entry
pub fn resolve_paths(raw: &str, cwd: &Path) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|p| resolve_path(p, cwd))
        .collect()
}

/// Selects configs by comma-separated zero-based indexes
///
/// Duplicate indexes select a config once; the result follows index order.
pub fn parse_config_del_args(configs: &[Config], input: &str) -> Result<Vec<Config>, ArgsError> {
    let mut selected = BTreeSet::new();

    for raw in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let index: usize = raw
            .parse()
            .map_err(|_| ArgsError::NotANumber(raw.to_string()))?;
        if index >= configs.len() {
            return Err(ArgsError::OutOfBounds(index));
        }
        selected.insert(index);
    }

    Ok(selected.into_iter().map(|i| configs[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Doc;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("doc_test_1"), "").unwrap();
        fs::write(dir.path().join("source_test_1"), "").unwrap();
        fs::write(dir.path().join("source_test_2"), "").unwrap();
        dir
    }

    fn canonical(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).canonicalize().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn missing_doc() {
        let dir = workspace();
        let err = parse_config_add_args(None, None, dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Missing file doc");
    }

    #[test]
    fn unknown_doc() {
        let dir = workspace();
        let err = parse_config_add_args(Some("whatever"), None, dir.path()).unwrap_err();

        let expected = dir.path().join("whatever");
        assert_eq!(
            err.to_string(),
            format!("Doc {} is not a valid existing file, nor a valid URL", expected.display())
        );
    }

    #[test]
    fn missing_sources() {
        let dir = workspace();
        let err = parse_config_add_args(Some("doc_test_1"), Some(" , "), dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Missing file/folder sources");
    }

    #[test]
    fn unknown_source() {
        let dir = workspace();
        let err = parse_config_add_args(Some("doc_test_1"), Some("whatever"), dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "File/folder source whatever doesn't exist");
    }

    #[test]
    fn file_doc_and_sources() {
        let dir = workspace();
        let args = parse_config_add_args(
            Some("doc_test_1"),
            Some("source_test_2,source_test_1"),
            dir.path(),
        )
        .unwrap();

        assert_eq!(args.doc, canonical(&dir, "doc_test_1"));
        assert_eq!(args.category, DocCategory::File);
        assert_eq!(
            args.sources,
            vec![canonical(&dir, "source_test_1"), canonical(&dir, "source_test_2")]
        );
    }

    #[test]
    fn url_doc() {
        let dir = workspace();
        let args =
            parse_config_add_args(Some("http://google.com"), Some("source_test_1"), dir.path())
                .unwrap();

        assert_eq!(args.doc, "http://google.com");
        assert_eq!(args.category, DocCategory::Url);
    }

    #[test]
    fn non_http_url_is_rejected() {
        let dir = workspace();
        let err = parse_config_add_args(Some("mailto:me@example.com"), Some("source_test_1"), dir.path())
            .unwrap_err();
        assert!(matches!(err, ArgsError::InvalidDoc(_)));
    }

    #[test]
    fn folders_expand_recursively() {
        let dir = workspace();
        let nested = dir.path().join("src").join("inner");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("src").join("b.php"), "").unwrap();
        fs::write(nested.join("a.php"), "").unwrap();

        let args =
            parse_config_add_args(Some("doc_test_1"), Some("src,src/b.php"), dir.path()).unwrap();

        assert_eq!(
            args.sources,
            vec![canonical(&dir, "src/b.php"), canonical(&dir, "src/inner/a.php")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn folder_walk_error_names_the_folder() {
        let dir = workspace();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a.php"), "").unwrap();
        std::os::unix::fs::symlink(&src, src.join("again")).unwrap();

        let err = parse_config_add_args(Some("doc_test_1"), Some("src"), dir.path()).unwrap_err();

        assert!(matches!(&err, ArgsError::UnreadableFolder(name, _) if name == "src"));
        assert!(err.to_string().starts_with("Cannot read source folder src: "));
    }

    #[test]
    fn empty_folder_has_no_sources() {
        let dir = workspace();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let err = parse_config_add_args(Some("doc_test_1"), Some("empty"), dir.path()).unwrap_err();
        assert_eq!(err, ArgsError::NoSourceFiles);
    }

    #[test]
    fn resolve_missing_path_uses_canonical_parent() {
        let dir = workspace();
        let resolved = resolve_path("gone.php", dir.path());

        let parent = dir.path().canonicalize().unwrap();
        assert_eq!(resolved, parent.join("gone.php").to_string_lossy());
        assert_eq!(resolve_path("source_test_1", dir.path()), canonical(&dir, "source_test_1"));
    }

    #[test]
    fn resolve_paths_skips_blanks() {
        let dir = workspace();
        let paths = resolve_paths("source_test_1, ,source_test_2", dir.path());
        assert_eq!(paths.len(), 2);
    }

    fn configs(count: usize) -> Vec<Config> {
        (0..count)
            .map(|i| Config::new(Doc::new(format!("source_{i}.php"), DocCategory::File), vec![]))
            .collect()
    }

    #[test]
    fn del_rejects_non_numbers() {
        let err = parse_config_del_args(&configs(4), "1,2,3,a").unwrap_err();
        assert_eq!(err.to_string(), "a is not a number");
    }

    #[test]
    fn del_rejects_out_of_range() {
        let err = parse_config_del_args(&configs(3), "3,4").unwrap_err();
        assert_eq!(err.to_string(), "Value 3 is out of bounds");
    }

    #[test]
    fn del_selects_configs() {
        let configs = configs(5);
        let selected = parse_config_del_args(&configs, "4,3,4").unwrap();

        assert_eq!(selected, vec![configs[3].clone(), configs[4].clone()]);
    }
}
