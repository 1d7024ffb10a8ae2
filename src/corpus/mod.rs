// Headline corpus — CSV loading and seeded sampling.
//
// The corpus is a flat CSV with a `headline_text` column and, usually, a
// `publish_date` column in YYYYMMDD form (the ABC News dump format). Rows
// are immutable once loaded.

pub mod sample;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::PipelineError;

/// A single headline with its publication date.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusRow {
    /// None when the date column is missing or unparseable
    pub publish_date: Option<NaiveDate>,
    pub headline_text: String,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    publish_date: Option<String>,
    headline_text: String,
}

/// Load every row of a headline CSV.
///
/// A missing file is reported as `PipelineError::MissingInputFile` so the
/// training command can tell the operator what to do instead of crashing.
pub fn load_corpus(path: &Path) -> Result<Vec<CorpusRow>> {
    if !path.exists() {
        return Err(PipelineError::MissingInputFile {
            path: path.to_path_buf(),
        }
        .into());
    }

    let file = File::open(path).with_context(|| format!("Failed to open corpus at {}", path.display()))?;
    let mut reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(file);

    let mut rows = Vec::new();
    let mut undated = 0usize;
    for (line, result) in reader.deserialize::<RawRow>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let raw = result.with_context(|| format!("Malformed corpus row at line {}", line + 2))?;
        let publish_date = raw.publish_date.as_deref().and_then(parse_date);
        if publish_date.is_none() {
            undated += 1;
        }
        rows.push(CorpusRow {
            publish_date,
            headline_text: raw.headline_text,
        });
    }

    if undated > 0 {
        warn!(undated, "Some corpus rows have no parseable publish_date");
    }
    info!(rows = rows.len(), path = %path.display(), "Loaded headline corpus");

    Ok(rows)
}

/// Parse a publish date in `YYYYMMDD` or `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}
