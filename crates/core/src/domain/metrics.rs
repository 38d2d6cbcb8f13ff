use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub year: i32,
    pub revenue: f64,
}

/// Turns the `{ "2024": 1.0, "2025": 2.0 }` prediction map into a series
/// ordered by year. Keys that are not integer years are dropped.
pub fn revenue_series(revenue: &BTreeMap<String, f64>) -> Vec<RevenuePoint> {
    let mut series: Vec<RevenuePoint> = revenue
        .iter()
        .filter_map(|(year, &revenue)| {
            let year = year.trim().parse::<i32>().ok()?;
            Some(RevenuePoint { year, revenue })
        })
        .collect();
    series.sort_by_key(|p| p.year);
    series
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Growth {
    Percent(f64),
    /// The first point has zero revenue, so no ratio exists.
    Indeterminate,
}

impl Growth {
    pub fn percent(self) -> Option<f64> {
        match self {
            Growth::Percent(p) => Some(p),
            Growth::Indeterminate => None,
        }
    }

    pub fn trend(self) -> Option<Trend> {
        self.percent().map(|p| {
            if p >= 0.0 {
                Trend::Positive
            } else {
                Trend::Negative
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Positive,
    Negative,
}

/// Growth between the first and last point of the series, in percent.
pub fn growth(series: &[RevenuePoint]) -> Growth {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Growth::Percent(0.0);
    };
    if series.len() < 2 {
        return Growth::Percent(0.0);
    }
    if first.revenue == 0.0 {
        return Growth::Indeterminate;
    }
    Growth::Percent((last.revenue - first.revenue) / first.revenue * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginClass {
    HighlyProfitable,
    ModeratelyProfitable,
    ThinMargins,
    NotAvailable,
}

impl MarginClass {
    pub fn label(self) -> &'static str {
        match self {
            MarginClass::HighlyProfitable => "highly profitable",
            MarginClass::ModeratelyProfitable => "moderately profitable",
            MarginClass::ThinMargins => "thin margins",
            MarginClass::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for MarginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_margin(margin: Option<f64>) -> MarginClass {
    match margin {
        None => MarginClass::NotAvailable,
        Some(m) if m.is_nan() => MarginClass::NotAvailable,
        Some(m) if m > 20.0 => MarginClass::HighlyProfitable,
        Some(m) if m > 10.0 => MarginClass::ModeratelyProfitable,
        Some(_) => MarginClass::ThinMargins,
    }
}

/// Profit and expense shares of revenue, each rounded to two decimals.
pub fn margin_split(margin: f64) -> (f64, f64) {
    (round2(margin), round2(100.0 - margin))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
