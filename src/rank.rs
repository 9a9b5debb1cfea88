// Merging repeated rank rows, ordering groups, and ranking groups by their latest value

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::parser::compare_group_labels;

/// One field of a rank row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Array(Vec<Option<f64>>),
    Text(String),
    Missing,
}

/// A row keyed by a positive rank; several rows may share a rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRow {
    pub rank: u32,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl RankRow {
    pub fn new(rank: u32) -> Self {
        Self {
            rank,
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: FieldValue) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(FieldValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn array(&self, key: &str) -> Option<&[Option<f64>]> {
        match self.fields.get(key) {
            Some(FieldValue::Array(a)) => Some(a),
            _ => None,
        }
    }
}

enum FieldAccum {
    Scalar { sum: f64, count: usize },
    Array { sums: Vec<f64>, counts: Vec<usize> },
    Text(String),
}

impl FieldAccum {
    fn start(value: &FieldValue) -> Option<Self> {
        let mut acc = match value {
            FieldValue::Number(_) => FieldAccum::Scalar { sum: 0.0, count: 0 },
            FieldValue::Array(_) => FieldAccum::Array {
                sums: Vec::new(),
                counts: Vec::new(),
            },
            FieldValue::Text(s) => return Some(FieldAccum::Text(s.clone())),
            FieldValue::Missing => return None,
        };
        acc.add(value);
        Some(acc)
    }

    // Returns false when the value's kind differs from the accumulated kind
    fn add(&mut self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldAccum::Scalar { sum, count }, FieldValue::Number(v)) => {
                if v.is_finite() {
                    *sum += v;
                    *count += 1;
                }
                true
            }
            (FieldAccum::Array { sums, counts }, FieldValue::Array(values)) => {
                if values.len() > sums.len() {
                    sums.resize(values.len(), 0.0);
                    counts.resize(values.len(), 0);
                }
                for (i, v) in values.iter().enumerate() {
                    if let Some(v) = v.filter(|v| v.is_finite()) {
                        sums[i] += v;
                        counts[i] += 1;
                    }
                }
                true
            }
            (FieldAccum::Text(_), FieldValue::Text(_)) | (_, FieldValue::Missing) => true,
            _ => false,
        }
    }

    fn finish(self) -> Option<FieldValue> {
        match self {
            FieldAccum::Scalar { sum, count } if count > 0 => {
                Some(FieldValue::Number(sum / count as f64))
            }
            FieldAccum::Scalar { .. } => None,
            FieldAccum::Array { sums, counts } => Some(FieldValue::Array(
                sums.into_iter()
                    .zip(counts)
                    .map(|(s, c)| (c > 0).then(|| s / c as f64))
                    .collect(),
            )),
            FieldAccum::Text(s) => Some(FieldValue::Text(s)),
        }
    }
}

// Text fields identify what a row measures; rows only merge when these agree
fn identity(row: &RankRow) -> Vec<(String, String)> {
    row.fields
        .iter()
        .filter_map(|(k, v)| match v {
            FieldValue::Text(s) => Some((k.clone(), s.clone())),
            _ => None,
        })
        .collect()
}

/// Merge rows sharing a rank and identifying text fields by averaging their
/// numeric fields.
///
/// Rows at the same rank that name different things (say two features tied
/// at rank 1) stay separate. Scalars average over the rows that carry a
/// finite value. Arrays average element-wise; each index averages only the
/// rows that have a value there, and indices nobody filled stay empty.
/// Output is sorted by rank, then by the identifying text.
pub fn merge_by_rank(rows: &[RankRow]) -> Vec<RankRow> {
    let mut by_key: BTreeMap<(u32, Vec<(String, String)>), BTreeMap<String, FieldAccum>> =
        BTreeMap::new();

    for row in rows {
        let fields = by_key.entry((row.rank, identity(row))).or_default();
        for (key, value) in &row.fields {
            match fields.get_mut(key) {
                Some(acc) => {
                    if !acc.add(value) {
                        tracing::warn!(rank = row.rank, field = %key, "field kind differs between repeated rows, skipping");
                    }
                }
                None => {
                    if let Some(acc) = FieldAccum::start(value) {
                        fields.insert(key.clone(), acc);
                    }
                }
            }
        }
    }

    by_key
        .into_iter()
        .map(|((rank, _), fields)| RankRow {
            rank,
            fields: fields
                .into_iter()
                .filter_map(|(k, acc)| acc.finish().map(|v| (k, v)))
                .collect(),
        })
        .collect()
}

/// Distinct group labels in numeric-aware order ("group2" before "group10")
pub fn order_groups<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: BTreeSet<&str> = labels.into_iter().collect();
    let mut ordered: Vec<String> = distinct.into_iter().map(String::from).collect();
    ordered.sort_by(|a, b| compare_group_labels(a, b));
    ordered
}

/// Which qualitative label table a ranking is displayed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskScale {
    #[default]
    Risk,
    Progression,
}

impl FromStr for RiskScale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "risk" => Ok(RiskScale::Risk),
            "progression" => Ok(RiskScale::Progression),
            other => Err(anyhow!("unknown label scale '{}' (expected risk or progression)", other)),
        }
    }
}

/// Qualitative label for a 0-based risk rank among `group_count` groups
pub fn risk_label(rank: usize, group_count: usize, scale: RiskScale) -> String {
    let table: &[&str] = match (scale, group_count) {
        (RiskScale::Risk, 2) => &["Low Risk", "High Risk"],
        (RiskScale::Risk, 3) => &["Low Risk", "Mid Risk", "High Risk"],
        (RiskScale::Progression, 2) => &["Slow", "Rapid"],
        (RiskScale::Progression, 3) => &["Slow", "Moderate", "Rapid"],
        _ => &[],
    };
    match table.get(rank) {
        Some(label) => label.to_string(),
        None => format!("Group {}", rank + 1),
    }
}

/// Groups ordered by the value of their latest observation, lowest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskRanking {
    order: Vec<String>,
}

impl RiskRanking {
    /// Group names from rank 0 upward
    pub fn groups(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn rank_of(&self, group: &str) -> Option<usize> {
        self.order.iter().position(|g| g == group)
    }

    /// Group name to its 0-based rank
    pub fn ranks(&self) -> BTreeMap<String, usize> {
        self.order
            .iter()
            .enumerate()
            .map(|(i, g)| (g.clone(), i))
            .collect()
    }

    /// Display label for a group; unranked groups keep their own name
    pub fn label(&self, group: &str, scale: RiskScale) -> String {
        match self.rank_of(group) {
            Some(rank) => risk_label(rank, self.len(), scale),
            None => group.to_string(),
        }
    }
}

/// Rank groups by the value at their latest time coordinate.
///
/// Rows are `(group, time, value)`. When several rows share a group's
/// maximum time, the last one wins. Rows with a non-finite time or value
/// are ignored. Equal values fall back to numeric-aware label order.
pub fn rank_by_latest_value<'a, I>(rows: I) -> RiskRanking
where
    I: IntoIterator<Item = (&'a str, f64, f64)>,
{
    let mut latest: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for (group, time, value) in rows {
        if !(time.is_finite() && value.is_finite()) {
            tracing::warn!(group, time, value, "skipping row with non-finite time or value");
            continue;
        }
        match latest.get(group) {
            Some(&(t, _)) if time < t => {}
            _ => {
                latest.insert(group, (time, value));
            }
        }
    }

    let mut entries: Vec<(&str, f64)> = latest.into_iter().map(|(g, (_, v))| (g, v)).collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| compare_group_labels(a.0, b.0)));

    RiskRanking {
        order: entries.into_iter().map(|(g, _)| g.to_string()).collect(),
    }
}
