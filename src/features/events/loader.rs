//! Schedule file loading
//!
//! Reads `;`-separated schedule files (`data;hora;titulo;descricao;local`)
//! from a directory. Each file name becomes the group of its events.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with header-mapped columns and per-row rejection

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use super::model::{normalize, Event, RawRecord};

const DATE_COLUMN: &str = "data";
const TITLE_COLUMN: &str = "titulo";
const DESCRIPTION_COLUMN: &str = "descricao";
const LOCATION_COLUMN: &str = "local";

/// Supplies the current event set
pub trait EventSource: Send + Sync {
    fn load_events(&self) -> Result<Vec<Event>>;
}

/// Event source backed by a directory of `*.csv` schedule files
#[derive(Debug, Clone)]
pub struct CsvEventSource {
    dir: PathBuf,
}

impl CsvEventSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Schedule files in name order
    fn schedule_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read schedules directory {}", self.dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl EventSource for CsvEventSource {
    fn load_events(&self) -> Result<Vec<Event>> {
        if !self.dir.is_dir() {
            warn!(
                "Schedules directory {} not found, no events loaded",
                self.dir.display()
            );
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        for path in self.schedule_files()? {
            let group = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable schedule file {}: {e}", path.display());
                    continue;
                }
            };

            for (line_number, record) in parse_records(&text, &group) {
                match normalize(&record) {
                    Ok(event) => events.push(event),
                    Err(e) => warn!("Skipping {group} line {line_number}: {e}"),
                }
            }
        }

        info!("Loaded {} events from {}", events.len(), self.dir.display());
        Ok(events)
    }
}

/// Parse one schedule file into raw records paired with their 1-based line numbers
///
/// The first non-blank line is the header; columns are matched by name so
/// their order in the file does not matter.
pub fn parse_records(text: &str, group: &str) -> Vec<(usize, RawRecord)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let header: Vec<String> = match lines.next() {
        Some((_, line)) => split_fields(line)
            .into_iter()
            .map(|h| h.trim().to_lowercase())
            .collect(),
        None => return Vec::new(),
    };
    let column = |name: &str| header.iter().position(|h| h == name);
    let date_idx = column(DATE_COLUMN);
    let title_idx = column(TITLE_COLUMN);
    let description_idx = column(DESCRIPTION_COLUMN);
    let location_idx = column(LOCATION_COLUMN);

    lines
        .map(|(idx, line)| {
            let fields = split_fields(line);
            let field = |i: Option<usize>| i.and_then(|i| fields.get(i)).cloned().unwrap_or_default();
            let record = RawRecord {
                date: field(date_idx),
                title: field(title_idx),
                description: field(description_idx),
                location: field(location_idx),
                group: group.to_string(),
            };
            (idx + 1, record)
        })
        .collect()
}

/// Split a `;`-separated line, honouring double-quoted fields with `""` escapes
///
/// A quote only opens a quoted section at the start of a field; anywhere
/// else it is kept as a literal character.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' if in_quotes => in_quotes = false,
            '"' if field_start => in_quotes = true,
            ';' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                field_start = true;
                continue;
            }
            _ => current.push(c),
        }
        field_start = false;
    }
    fields.push(current);
    fields
}
