//! CSV decoding of the resolver list.
//!
//! The feed is header-first CSV. Columns are matched by name, so their order
//! does not matter and extra columns are ignored. Coercions happen here and
//! nowhere else:
//! - `dnssec` accepts `true`/`false`/`1`/`0`/`t`/`f` (any case); empty is `false`
//! - `reliability` that is empty or not a finite number becomes [`MIN_RELIABILITY`]
//! - timestamps are RFC 3339, or `YYYY-MM-DD HH:MM:SS` read as UTC

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::config::MIN_RELIABILITY;
use crate::error_handling::LoadError;
use crate::models::Nameserver;

const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One CSV row with the column names used by public-dns.info.
#[derive(Debug, Deserialize)]
struct NameserverRow {
    #[serde(rename = "ip", alias = "ip_address")]
    ip_address: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "country_id", alias = "country_code", default)]
    country: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    error: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    dnssec: bool,
    #[serde(default)]
    reliability: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    checked_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    created_at: DateTime<Utc>,
}

impl From<NameserverRow> for Nameserver {
    fn from(row: NameserverRow) -> Self {
        Nameserver {
            reliability: coerce_reliability(&row.reliability),
            ip_address: row.ip_address,
            name: row.name,
            country: row.country,
            city: row.city,
            version: row.version,
            error: row.error,
            dnssec: row.dnssec,
            checked_at: row.checked_at,
            created_at: row.created_at,
        }
    }
}

fn coerce_reliability(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => MIN_RELIABILITY,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "f" | "false" => Some(false),
        "1" | "t" | "true" => Some(true),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid boolean {raw:?}")))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp {raw:?}")))
}

/// Decodes a CSV stream into nameserver records, in file order.
///
/// An input with no data rows yields an empty vector. Any malformed row fails
/// the whole decode; partial results are never returned.
pub fn decode<R: Read>(reader: R) -> Result<Vec<Nameserver>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let servers = csv_reader
        .deserialize::<NameserverRow>()
        .map(|row| row.map(Nameserver::from))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Decoded {} nameservers", servers.len());
    Ok(servers)
}

/// Opens a CSV file and decodes it with [`decode`].
///
/// # Errors
///
/// Returns `LoadError::NotFound` if the file cannot be opened and
/// `LoadError::Decode` if its content is malformed.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<Nameserver>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    decode(file)
}
