use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One financial entry as stored by the profile form.
///
/// The profile form posts raw text inputs, so numeric fields may arrive as
/// JSON strings ("125000") as well as numbers. A cleared input arrives as
/// `""` and reads as 0, like `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(deserialize_with = "lenient_f64")]
    pub annual_revenue: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub monthly_budget: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub recurring_expenses: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub savings: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl FinancialRecord {
    /// `timestamp` interpreted as Unix seconds.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// An element of the `/userData` sequence.
///
/// Financial entries and profile metadata share one list; an object is
/// financial exactly when it carries an `annual_revenue` key, whatever its
/// value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserRecord {
    Financial(FinancialRecord),
    Metadata(MetadataRecord),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn as_financial(&self) -> Option<&FinancialRecord> {
        match self {
            UserRecord::Financial(record) => Some(record),
            UserRecord::Metadata(_) => None,
        }
    }

    pub fn industry(&self) -> Option<&str> {
        let industry = match self {
            UserRecord::Financial(record) => record.industry.as_deref(),
            UserRecord::Metadata(meta) => meta.industry.as_deref(),
        };
        industry.map(str::trim).filter(|s| !s.is_empty())
    }
}

impl<'de> Deserialize<'de> for UserRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        if object.contains_key("annual_revenue") {
            serde_json::from_value(Value::Object(object))
                .map(UserRecord::Financial)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(Value::Object(object))
                .map(UserRecord::Metadata)
                .map_err(de::Error::custom)
        }
    }
}

/// The derived snapshot the dashboard, profile and advisor views share.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialSnapshot {
    pub latest: Option<FinancialRecord>,
    /// Older entries, most recent first.
    pub history: Vec<FinancialRecord>,
}

impl FinancialSnapshot {
    pub fn has_data(&self) -> bool {
        self.latest.is_some()
    }
}

/// Picks the last financial entry as `latest`; the remaining financial
/// entries become `history`, newest first.
pub fn select_snapshot(records: &[UserRecord]) -> FinancialSnapshot {
    let mut financial: Vec<FinancialRecord> = records
        .iter()
        .filter_map(UserRecord::as_financial)
        .cloned()
        .collect();

    let latest = financial.pop();
    financial.reverse();

    FinancialSnapshot {
        latest,
        history: financial,
    }
}

/// First industry mentioned anywhere in the sequence.
pub fn industry_of(records: &[UserRecord]) -> Option<&str> {
    records.iter().find_map(UserRecord::industry)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("number out of range: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a numeric string, got {s:?}"))),
        Value::Null => Ok(0.0),
        other => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))),
        Value::String(s) => Ok(s.trim().parse::<f64>().ok().map(|f| f as i64)),
        other => Err(de::Error::custom(format!(
            "expected a timestamp, got {other}"
        ))),
    }
}
