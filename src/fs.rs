//! Filesystem helpers.

use eyre::{Result, WrapErr};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Match whitespace runs in a serie title.
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

// Linux only is not that restrictive, but Windows is another story...
// See https://docs.microsoft.com/en-us/windows/win32/fileio/naming-a-file
/// Match characters unusable in a directory name.
static ILLEGAL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[/\?<>\\:\*\|"]"#).expect("invalid chars regex")
});

/// Derive a directory name from a serie title.
///
/// Whitespace runs collapse to a single underscore and the result is
/// lowercased, so `My Great  Series` becomes `my_great_series`.
pub fn serie_dir_name(title: &str) -> PathBuf {
    let name = WHITESPACE.replace_all(title.trim(), "_");
    let name = ILLEGAL_CHARS.replace_all(&name, "_");

    name.to_lowercase().into()
}

/// Recursively create a directory and all of its parent if necessary.
pub fn mkdir_p(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("mkdir_p {}", path.display()))
}

/// Write a file atomically (using a tempfile + atomic rename).
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp_path = path.to_path_buf();
    tmp_path.set_extension("part");

    fs::write(&tmp_path, data)
        .with_context(|| format!("write {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("rename to {}", path.display()))?;

    Ok(())
}
