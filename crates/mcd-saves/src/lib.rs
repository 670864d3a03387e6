//! Listing and presentation helpers behind the `mcd-saves` binary.
//!
//! The binary has two jobs: finding card images in a folder, and showing
//! the saves on one card. Both live here so they can be exercised without
//! a terminal.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use mcd_reader::SaveEntry;
use serde_json::{json, Value};

/// A memory card image found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFile {
    pub path: PathBuf,
    pub file_size: u64,
    pub modified: Option<SystemTime>,
}

impl CardFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Whether `path` names a memory card image (`.ps2`, any case).
pub fn is_card_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("ps2"))
        .unwrap_or(false)
}

/// Finds the card images directly inside `dir`, sorted by file name.
///
/// A folder that cannot be read presents as holding no cards, matching how
/// unreadable cards present as holding no saves.
pub fn find_cards(dir: &Path) -> Vec<CardFile> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut cards: Vec<CardFile> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if !path.is_file() || !is_card_file(&path) {
                return None;
            }
            let metadata = entry.metadata().ok()?;
            Some(CardFile {
                file_size: metadata.len(),
                modified: metadata.modified().ok(),
                path,
            })
        })
        .collect();

    cards.sort_by_key(|card| card.file_name());
    cards
}

/// Human line for one save: a directory shows how many entries it holds,
/// a file shows its size in whole kilobytes.
pub fn entry_line(entry: &SaveEntry) -> String {
    if entry.is_directory {
        format!("{} ({} files)", entry.name, entry.size)
    } else {
        format!("{} ({} KB)", entry.name, entry.size / 1024)
    }
}

/// Pipe-separated line for one save, the format the original bridge handed
/// its callers: `name|size|is_directory` with `1`/`0` for the flag.
pub fn raw_line(entry: &SaveEntry) -> String {
    format!(
        "{}|{}|{}",
        entry.name,
        entry.size,
        if entry.is_directory { 1 } else { 0 }
    )
}

/// JSON array of `{name, size, is_directory}` objects.
pub fn saves_json(entries: &[SaveEntry]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|entry| {
                json!({
                    "name": entry.name,
                    "size": entry.size,
                    "is_directory": entry.is_directory,
                })
            })
            .collect(),
    )
}

/// Header line for one card file: name, size in MB, last-modified stamp.
pub fn card_line(card: &CardFile) -> String {
    let size_mb = card.file_size as f64 / (1024.0 * 1024.0);
    match card.modified.map(modified_stamp) {
        Some(stamp) => format!("{}  {size_mb:.2} MB  {stamp}", card.file_name()),
        None => format!("{}  {size_mb:.2} MB", card.file_name()),
    }
}

fn modified_stamp(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format("%b %d, %Y %H:%M")
        .to_string()
}
