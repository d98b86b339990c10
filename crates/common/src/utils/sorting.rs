//! Table sorting shared by the admin list endpoints.
//!
//! Every admin table sorts by a caller-chosen column in either direction.
//! Rows expose their column values through [`Sortable`]; the sort compares
//! them with a three-way comparator and breaks ties by the row's original
//! position, so equal rows never shuffle between requests.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(SortError::InvalidOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("unknown sort field: {0}")]
    UnknownField(String),
    #[error("invalid sort order: {0} (expected asc or desc)")]
    InvalidOrder(String),
}

/// A single comparable cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Stored lowercased so text compares case-insensitively.
    Text(String),
    Time(DateTime<Utc>),
}

impl SortValue {
    pub fn text(s: &str) -> Self {
        SortValue::Text(s.to_lowercase())
    }

    pub fn opt_text(s: Option<&str>) -> Self {
        s.map(Self::text).unwrap_or(SortValue::Null)
    }

    pub fn time<Tz: TimeZone>(t: &DateTime<Tz>) -> Self {
        SortValue::Time(t.with_timezone(&Utc))
    }

    pub fn opt_time<Tz: TimeZone>(t: Option<&DateTime<Tz>>) -> Self {
        t.map(Self::time).unwrap_or(SortValue::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Null => 0,
            SortValue::Bool(_) => 1,
            SortValue::Int(_) => 2,
            SortValue::Text(_) => 3,
            SortValue::Time(_) => 4,
        }
    }
}

/// Rows that can be sorted by named column.
pub trait Sortable {
    /// Column names accepted by [`Sortable::sort_value`].
    const SORT_FIELDS: &'static [&'static str];

    fn sort_value(&self, field: &str) -> SortValue;
}

/// Three-way comparison of two cells. `Null` sorts first ascending.
pub fn compare_values(a: &SortValue, b: &SortValue, order: SortOrder) -> Ordering {
    let ord = match (a, b) {
        (SortValue::Bool(x), SortValue::Bool(y)) => x.cmp(y),
        (SortValue::Int(x), SortValue::Int(y)) => x.cmp(y),
        (SortValue::Text(x), SortValue::Text(y)) => x.cmp(y),
        (SortValue::Time(x), SortValue::Time(y)) => x.cmp(y),
        _ => a.rank().cmp(&b.rank()),
    };
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Sort rows by `field`. Ties keep their original relative order in both
/// directions.
pub fn stable_sort<T: Sortable>(items: Vec<T>, field: &str, order: SortOrder) -> Result<Vec<T>, SortError> {
    if !T::SORT_FIELDS.contains(&field) {
        return Err(SortError::UnknownField(field.to_string()));
    }
    let mut keyed: Vec<(usize, SortValue, T)> = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| (idx, item.sort_value(field), item))
        .collect();
    keyed.sort_by(|a, b| compare_values(&a.1, &b.1, order).then_with(|| a.0.cmp(&b.0)));
    Ok(keyed.into_iter().map(|(_, _, item)| item).collect())
}
