//! Album directory catalog
//!
//! Enumerates the playable files of one album directory into a stable,
//! sorted track list. The first scan writes an `index` cache file into the
//! directory; later opens trust the cache and skip the scan entirely, which
//! matters on slow removable storage. An unreadable or empty cache is
//! treated as a miss and triggers a rescan (and a fresh cache).

use crate::error::{AudioError, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the per-directory track index cache.
const INDEX_FILE: &str = "index";

/// Extensions the decoder can handle, lower case.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac"];

/// Sorted, cacheable list of the playable file names in one directory.
///
/// The list is immutable for the lifetime of the catalog; reopening picks
/// up directory changes (after deleting the stale `index` file).
pub struct Catalog {
    entries: Vec<String>,
}

impl Catalog {
    /// Open a directory, preferring its index cache over a full scan.
    ///
    /// Zero playable files is a valid, empty catalog. An unreadable
    /// directory with no usable cache is an error.
    pub fn open(dir: &Path) -> Result<Self> {
        let index_path = dir.join(INDEX_FILE);

        let mut entries = match load_index(&index_path) {
            Some(entries) => entries,
            None => {
                let entries = scan_directory(dir)?;
                write_index(&index_path, &entries);
                entries
            }
        };

        entries.sort_by(|a, b| compare_names(a, b));

        debug!("catalog for {} holds {} tracks", dir.display(), entries.len());

        Ok(Self { entries })
    }

    /// File name of the track at `index`, if in range.
    pub fn entry(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the index cache: one file name per line, CR/LF tolerant, blank
/// lines skipped. `None` (a cache miss) when the file is missing,
/// unreadable, or yields no entries.
fn load_index(path: &Path) -> Option<Vec<String>> {
    let data = fs::read_to_string(path).ok()?;

    let entries: Vec<String> = data
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if entries.is_empty() {
        return None;
    }

    debug!("using index cache {}", path.display());

    Some(entries)
}

/// Full directory scan: plain files with a supported audio extension.
/// Nested directories are excluded.
fn scan_directory(dir: &Path) -> Result<Vec<String>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;

        if entry.file_type().map_or(true, |t| t.is_dir()) {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        if is_audio_file(name) {
            entries.push(name.to_string());
        }
    }

    Ok(entries)
}

/// Write the cache back so the next open skips the scan. Failure is not
/// fatal; the catalog just gets rescanned next time.
fn write_index(path: &Path, entries: &[String]) {
    let mut data = String::new();
    for entry in entries {
        data.push_str(entry);
        data.push_str("\r\n");
    }

    if let Err(e) = fs::write(path, data) {
        warn!("could not write index cache {}: {e}", path.display());
    }
}

fn is_audio_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|&a| a == ext)
        })
}

/// Track name ordering: names with a leading number sort by (number,
/// case-insensitive remainder) and come before names without one; purely
/// textual names fall back to a case-insensitive comparison. Any path
/// prefix is ignored.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    let a = file_name(a);
    let b = file_name(b);

    let (num_a, rest_a) = split_numeric_prefix(a);
    let (num_b, rest_b) = split_numeric_prefix(b);

    match (num_a, num_b) {
        (Some(na), Some(nb)) => na
            .cmp(&nb)
            .then_with(|| caseless_cmp(rest_a, rest_b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => caseless_cmp(a, b),
    }
}

fn file_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Split a leading decimal number off a name: `"12-foo"` becomes
/// `(Some(12), "-foo")`, `"foo"` becomes `(None, "foo")`.
fn split_numeric_prefix(name: &str) -> (Option<i64>, &str) {
    let digits = name.len() - name.trim_start_matches(|c: char| c.is_ascii_digit()).len();

    if digits == 0 {
        return (None, name);
    }

    match name[..digits].parse() {
        Ok(value) => (Some(value), &name[digits..]),
        // Longer than i64: fall back to textual comparison.
        Err(_) => (None, name),
    }
}

fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.chars().map(|c| c.to_ascii_lowercase()))
}
