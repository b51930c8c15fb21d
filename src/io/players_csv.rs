//! Delimited player-table reader.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data_handling::{Dataset, RawPlayerRow};
use crate::error::PipelineError;

/// Parsed player data ready for splitting and modeling, plus the cleaning
/// statistics callers may want to report.
#[derive(Debug)]
pub struct PlayersData {
    pub dataset: Dataset,
    pub rows_read: usize,
    pub rows_dropped_missing_age: usize,
}

/// Configuration for reading the player table.
#[derive(Debug, Clone)]
pub struct PlayersReaderConfig {
    /// Column name holding the player age. Matched case-insensitively.
    pub age_column: String,
    pub gender_column: String,
    pub experience_column: String,
    pub played_hours_column: String,
    /// Column name holding the boolean subscription label.
    pub subscribe_column: String,
    pub delimiter: u8,
}

impl Default for PlayersReaderConfig {
    fn default() -> Self {
        Self {
            age_column: "Age".to_string(),
            gender_column: "gender".to_string(),
            experience_column: "experience".to_string(),
            played_hours_column: "played_hours".to_string(),
            subscribe_column: "subscribe".to_string(),
            delimiter: b',',
        }
    }
}

/// Read a player table from a delimited file with the default column names.
pub fn read_players_csv<P: AsRef<Path>>(path: P) -> Result<PlayersData, PipelineError> {
    read_players_csv_with_config(path, &PlayersReaderConfig::default())
}

/// Read a player table from a delimited file using a custom configuration.
pub fn read_players_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &PlayersReaderConfig,
) -> Result<PlayersData, PipelineError> {
    let file = File::open(&path).map_err(|e| {
        PipelineError::Data(format!(
            "failed to open player file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    read_players_from_reader(file, config)
}

/// Read a player table from any reader. Used by tests to parse in-memory
/// tables without touching the filesystem.
pub fn read_players_from_reader<R: Read>(
    rdr: R,
    config: &PlayersReaderConfig,
) -> Result<PlayersData, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::Data(format!("failed to read header row: {}", e)))?
        .clone();

    let age_idx = require_column(&headers, &config.age_column)?;
    let gender_idx = require_column(&headers, &config.gender_column)?;
    let experience_idx = require_column(&headers, &config.experience_column)?;
    let played_hours_idx = require_column(&headers, &config.played_hours_column)?;
    let subscribe_idx = require_column(&headers, &config.subscribe_column)?;

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| PipelineError::Data(format!("failed to read row {}: {}", row_idx + 1, e)))?;

        let age = parse_age(get_cell(&record, age_idx, &config.age_column, row_idx)?);

        let gender = get_cell(&record, gender_idx, &config.gender_column, row_idx)?
            .trim()
            .to_string();
        let experience = get_cell(&record, experience_idx, &config.experience_column, row_idx)?
            .trim()
            .to_string();

        let played_hours = parse_played_hours(
            get_cell(&record, played_hours_idx, &config.played_hours_column, row_idx)?,
            &config.played_hours_column,
            row_idx,
        )?;

        let subscribe = parse_bool(
            get_cell(&record, subscribe_idx, &config.subscribe_column, row_idx)?,
            &config.subscribe_column,
            row_idx,
        )?;

        rows.push(RawPlayerRow {
            age,
            gender,
            experience,
            played_hours,
            subscribe,
        });
    }

    let rows_read = rows.len();
    let (dataset, rows_dropped_missing_age) = Dataset::from_rows(rows);

    Ok(PlayersData {
        dataset,
        rows_read,
        rows_dropped_missing_age,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn require_column(headers: &StringRecord, name: &str) -> Result<usize, PipelineError> {
    find_column(headers, name)
        .ok_or_else(|| PipelineError::Data(format!("missing required column '{}'", name)))
}

fn get_cell<'a>(
    record: &'a StringRecord,
    idx: usize,
    column: &str,
    row_idx: usize,
) -> Result<&'a str, PipelineError> {
    record.get(idx).ok_or_else(|| {
        PipelineError::Data(format!("missing '{}' value at row {}", column, row_idx + 1))
    })
}

/// An empty cell, an NA marker, or a non-finite number all count as a
/// missing age; the cleaning step drops those rows.
fn parse_age(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(age) if age.is_finite() => Some(age),
        _ => None,
    }
}

fn parse_played_hours(value: &str, column: &str, row_idx: usize) -> Result<f64, PipelineError> {
    let parsed = value.trim().parse::<f64>().map_err(|_| {
        PipelineError::Data(format!(
            "invalid '{}' value '{}' at row {}",
            column,
            value.trim(),
            row_idx + 1
        ))
    })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(PipelineError::Data(format!(
            "'{}' must be a non-negative number, got '{}' at row {}",
            column,
            value.trim(),
            row_idx + 1
        )));
    }
    Ok(parsed)
}

fn parse_bool(value: &str, column: &str, row_idx: usize) -> Result<bool, PipelineError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(PipelineError::Data(format!(
            "invalid '{}' value '{}' at row {}: expected TRUE or FALSE",
            column,
            other,
            row_idx + 1
        ))),
    }
}
