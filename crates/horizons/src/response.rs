//! Parsing of Horizons API vector-table responses.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::{EphemerisError, EphemerisSample, EphemerisTable};

const START_OF_EPHEMERIS: &str = "$$SOE";
const END_OF_EPHEMERIS: &str = "$$EOE";
const CALENDAR_FORMAT: &str = "%Y-%b-%d %H:%M:%S%.f";
const MAX_MESSAGE_CHARS: usize = 400;
const MAX_STATUS_BODY_CHARS: usize = 200;

/// JSON envelope returned by `horizons.api?format=json`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse a full JSON response body for `target` into an ephemeris table.
pub fn parse_vectors_response(target: &str, body: &str) -> Result<EphemerisTable, EphemerisError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;
    if let Some(message) = envelope.error {
        return Err(EphemerisError::Service {
            target: target.to_string(),
            message: message.trim().to_string(),
        });
    }
    let result = envelope.result.unwrap_or_default();
    parse_vector_table(target, &result)
}

/// Error for a non-success HTTP reply: the service message when the body carries one,
/// otherwise the status with the start of the body.
pub fn rejected_reply(target: &str, status: u16, body: &str) -> EphemerisError {
    match service_error_message(body) {
        Some(message) => EphemerisError::Service {
            target: target.to_string(),
            message,
        },
        None => EphemerisError::Status {
            status,
            body: body.chars().take(MAX_STATUS_BODY_CHARS).collect(),
        },
    }
}

fn service_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|message| message.trim().to_string())
}

/// Parse the plain-text `result` of a CSV vector table (`VEC_TABLE='1'`, `CSV_FORMAT='YES'`).
///
/// Rows between `$$SOE` and `$$EOE` have the shape `JDUT, Calendar Date, X, Y, Z,`.
pub fn parse_vector_table(target: &str, result: &str) -> Result<EphemerisTable, EphemerisError> {
    let block = ephemeris_block(result).ok_or_else(|| EphemerisError::NoEphemeris {
        target: target.to_string(),
        message: summarize(result),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(block.as_bytes());

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        samples.push(parse_row(&record, samples.len())?);
    }

    if samples.is_empty() {
        return Err(EphemerisError::NoEphemeris {
            target: target.to_string(),
            message: "ephemeris block contains no rows".to_string(),
        });
    }

    Ok(EphemerisTable {
        target: target.to_string(),
        samples,
    })
}

fn ephemeris_block(result: &str) -> Option<&str> {
    let start = result.find(START_OF_EPHEMERIS)? + START_OF_EPHEMERIS.len();
    let end = start + result[start..].find(END_OF_EPHEMERIS)?;
    Some(&result[start..end])
}

fn parse_row(record: &StringRecord, row: usize) -> Result<EphemerisSample, EphemerisError> {
    let julian_day_ut = number(record, 0, "JDUT", row)?;
    let calendar = field(record, 1, "calendar date", row)?;
    let epoch = parse_calendar(calendar).ok_or_else(|| EphemerisError::MalformedRow {
        row,
        reason: format!("unrecognised calendar date `{calendar}`"),
    })?;
    let position_km = [
        number(record, 2, "X", row)?,
        number(record, 3, "Y", row)?,
        number(record, 4, "Z", row)?,
    ];

    Ok(EphemerisSample {
        epoch,
        julian_day_ut,
        position_km,
    })
}

fn field<'r>(
    record: &'r StringRecord,
    idx: usize,
    name: &str,
    row: usize,
) -> Result<&'r str, EphemerisError> {
    record
        .get(idx)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| EphemerisError::MalformedRow {
            row,
            reason: format!("missing {name} column"),
        })
}

fn number(record: &StringRecord, idx: usize, name: &str, row: usize) -> Result<f64, EphemerisError> {
    let raw = field(record, idx, name, row)?;
    raw.parse::<f64>().map_err(|_| EphemerisError::MalformedRow {
        row,
        reason: format!("{name} `{raw}` is not a number"),
    })
}

fn parse_calendar(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("A.D.")
        .map(str::trim_start)
        .unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(trimmed, CALENDAR_FORMAT).ok()
}

fn summarize(result: &str) -> String {
    let text = result.trim();
    if text.is_empty() {
        return "empty response".to_string();
    }
    let mut summary: String = text.chars().take(MAX_MESSAGE_CHARS).collect();
    if text.chars().count() > MAX_MESSAGE_CHARS {
        summary.push('…');
    }
    summary
}
