//! Import text shaping.
//!
//! ## Accepted shapes
//!
//! - JSON snapshot object: `{"settings": {...}, "transactions": [...]}`
//! - JSON array of transaction records
//! - Delimited text (CSV-style), one record per line:
//!   `type,date,amount[,note...]`, with an optional header row
//!
//! Structural failures (unparseable JSON, broken CSV quoting, a
//! malformed settings block) fail the whole parse. A record whose
//! fields don't shape into a valid transaction is skipped and reported
//! with its position; one bad row never poisons the batch.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::info;
use serde::Deserialize;

use crate::domain::errors::LedgerError;
use crate::domain::models::TransactionKind;

/// One shaped record, ready to become a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub note: Option<String>,
}

/// Settings carried by a snapshot import.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    pub tracking_start: DateTime<Utc>,
    pub weekly_allowance: f64,
    pub initial_savings: f64,
}

/// A record that failed shaping, with why and where.
#[derive(Debug)]
pub struct SkippedRecord {
    /// 1-based position of the record in its source document.
    pub position: usize,
    pub reason: LedgerError,
}

/// Result of shaping an import document.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub settings: Option<SettingsDraft>,
    pub records: Vec<TransactionDraft>,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    settings: Option<RawSettings>,
    #[serde(default)]
    transactions: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    tracking_start: Option<String>,
    weekly_allowance: Option<RawAmount>,
    initial_savings: Option<RawAmount>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    date: Option<String>,
    amount: Option<RawAmount>,
    note: Option<String>,
}

/// Amounts arrive as JSON numbers or as strings ("12.50").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn to_f64(&self) -> Result<f64, LedgerError> {
        match self {
            RawAmount::Number(amount) => Ok(*amount),
            RawAmount::Text(text) => {
                text.trim().parse::<f64>().map_err(|_| LedgerError::InvalidAmount {
                    reason: format!("not a number: {:?}", text.trim()),
                })
            }
        }
    }
}

/// Shapes pasted or uploaded text into an [`ImportBatch`].
#[derive(Clone)]
pub struct ImportService;

impl ImportService {
    pub fn new() -> Self {
        Self
    }

    /// Shape an import document, sniffing its format from the first
    /// non-whitespace character.
    pub fn parse(&self, text: &str) -> Result<ImportBatch> {
        let trimmed = text.trim_start();
        let batch = if trimmed.starts_with('{') {
            self.parse_snapshot(text)?
        } else if trimmed.starts_with('[') {
            self.parse_records(text)?
        } else {
            self.parse_delimited(text)?
        };

        info!(
            "📥 IMPORT: shaped {} records ({} skipped)",
            batch.records.len(),
            batch.skipped.len()
        );
        Ok(batch)
    }

    fn parse_snapshot(&self, text: &str) -> Result<ImportBatch> {
        let snapshot: RawSnapshot =
            serde_json::from_str(text).context("invalid JSON import document")?;
        let mut batch = shape_records(snapshot.transactions);
        if let Some(raw) = snapshot.settings {
            batch.settings = Some(shape_settings(raw)?);
        }
        Ok(batch)
    }

    fn parse_records(&self, text: &str) -> Result<ImportBatch> {
        let records: Vec<RawRecord> =
            serde_json::from_str(text).context("invalid JSON import document")?;
        Ok(shape_records(records))
    }

    fn parse_delimited(&self, text: &str) -> Result<ImportBatch> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut batch = ImportBatch::default();
        for (index, result) in reader.records().enumerate() {
            let record = result.context("invalid delimited import document")?;
            if index == 0 && is_header_row(&record) {
                continue;
            }
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let raw = RawRecord {
                kind: record.get(0).map(|field| field.to_string()),
                date: record.get(1).map(|field| field.to_string()),
                amount: record.get(2).map(|field| RawAmount::Text(field.to_string())),
                note: join_note_fields(&record),
            };
            match shape_record(raw) {
                Ok(draft) => batch.records.push(draft),
                Err(reason) => batch.skipped.push(SkippedRecord {
                    position: index + 1,
                    reason,
                }),
            }
        }
        Ok(batch)
    }
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}

fn shape_records(raw: Vec<RawRecord>) -> ImportBatch {
    let mut batch = ImportBatch::default();
    for (index, record) in raw.into_iter().enumerate() {
        match shape_record(record) {
            Ok(draft) => batch.records.push(draft),
            Err(reason) => batch.skipped.push(SkippedRecord {
                position: index + 1,
                reason,
            }),
        }
    }
    batch
}

fn shape_record(raw: RawRecord) -> Result<TransactionDraft, LedgerError> {
    let kind = raw.kind.as_deref().unwrap_or("").parse::<TransactionKind>()?;
    let date = parse_flexible_date(raw.date.as_deref().unwrap_or(""))?;
    let amount = raw
        .amount
        .ok_or_else(|| LedgerError::InvalidAmount {
            reason: "missing amount".to_string(),
        })?
        .to_f64()?;
    kind.validate_amount(amount)?;
    let note = raw
        .note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());
    Ok(TransactionDraft {
        kind,
        date,
        amount,
        note,
    })
}

fn shape_settings(raw: RawSettings) -> Result<SettingsDraft, LedgerError> {
    let tracking_start = match raw.tracking_start.as_deref() {
        Some(value) => parse_flexible_date(value)?,
        None => {
            return Err(LedgerError::InvalidDateFormat {
                value: "missing tracking_start".to_string(),
            })
        }
    };
    let weekly_allowance = raw
        .weekly_allowance
        .ok_or_else(|| LedgerError::InvalidAmount {
            reason: "missing weekly allowance".to_string(),
        })?
        .to_f64()?;
    if !weekly_allowance.is_finite() || weekly_allowance < 0.0 {
        return Err(LedgerError::InvalidAmount {
            reason: format!(
                "weekly allowance must be a non-negative number, got {}",
                weekly_allowance
            ),
        });
    }
    let initial_savings = match raw.initial_savings {
        Some(amount) => amount.to_f64()?,
        None => 0.0,
    };
    if !initial_savings.is_finite() {
        return Err(LedgerError::InvalidAmount {
            reason: format!("initial savings must be a finite number, got {}", initial_savings),
        });
    }
    Ok(SettingsDraft {
        tracking_start,
        weekly_allowance,
        initial_savings,
    })
}

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Parse the date formats seen in real import text.
///
/// RFC 3339 keeps its offset; everything else is taken as UTC wall time.
/// Date-only values land at midnight.
pub fn parse_flexible_date(value: &str) -> Result<DateTime<Utc>, LedgerError> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return tolerant_to_utc(parsed, value);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return tolerant_to_utc(parsed.and_time(NaiveTime::MIN), value);
        }
    }
    Err(LedgerError::InvalidDateFormat {
        value: value.to_string(),
    })
}

fn tolerant_to_utc(parsed: NaiveDateTime, original: &str) -> Result<DateTime<Utc>, LedgerError> {
    // chrono lets %Y match a two-digit year, so "3/4/24" would otherwise
    // come back as year 24. Require four-digit years.
    if parsed.year() < 1000 {
        return Err(LedgerError::InvalidDateFormat {
            value: original.to_string(),
        });
    }
    Ok(parsed.and_utc())
}

fn is_header_row(record: &csv::StringRecord) -> bool {
    let field = |index: usize| {
        record
            .get(index)
            .unwrap_or("")
            .to_ascii_lowercase()
    };
    field(0) == "type" && field(1) == "date" && field(2) == "amount"
}

/// Everything after the third field is note text; extra commas in a
/// note show up as extra fields, so fold them back together.
fn join_note_fields(record: &csv::StringRecord) -> Option<String> {
    let fields: Vec<&str> = record
        .iter()
        .skip(3)
        .filter(|field| !field.is_empty())
        .collect();
    if fields.is_empty() {
        None
    } else {
        Some(fields.join(", "))
    }
}
