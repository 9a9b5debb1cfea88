// Inbound analysis rows and their JSON/CSV loading

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};

use crate::geometry::FeatureValues;
use crate::histogram::HistogramSpec;
use crate::rank::{FieldValue, RankRow};
use crate::regression::Regression;

// =============================================================================
// Lenient numeric fields
// =============================================================================

pub(crate) fn nan() -> f64 {
    f64::NAN
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Numbers load as-is, numeric strings are parsed, anything else becomes NaN
pub fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(v) => v,
        RawNumber::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        RawNumber::Other(_) => f64::NAN,
    })
}

/// A number read with [`lenient_f64`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lenient(pub f64);

impl<'de> Deserialize<'de> for Lenient {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_f64(deserializer).map(Lenient)
    }
}

/// Array of lenient numbers; `null` reads as an empty array
pub fn lenient_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Lenient>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().map(|v| v.0).collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Number(f64),
    Other(IgnoredAny),
}

/// Labels may arrive as numbers (`"group": 2`); integral values print without a fraction
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawLabel::deserialize(deserializer)? {
        RawLabel::Text(s) => s,
        RawLabel::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        RawLabel::Number(v) => v.to_string(),
        RawLabel::Other(_) => String::new(),
    })
}

// =============================================================================
// Row types
// =============================================================================

/// One group's statistic at one month for a stratification feature
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StratificationRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub feature: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: String,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub month: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub mean: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub ci_low: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub ci_high: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub n: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub cutoff: f64,
}

impl StratificationRow {
    /// Half-width of the confidence interval; NaN when either bound is missing
    pub fn error(&self) -> f64 {
        (self.ci_high - self.ci_low).abs() / 2.0
    }
}

/// One group's interval for one metric of one outcome
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskResponseRow {
    #[serde(rename = "type", alias = "metric", default, deserialize_with = "lenient_string")]
    pub metric: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub outcome: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: String,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub mean: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub ci_low: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub ci_high: f64,
}

/// Per-sample attribution values of one feature at one importance rank
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShapRow {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub rank: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub feature_name: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub shap_value: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub color_value: Vec<f64>,
}

fn optional_array(values: &[f64]) -> FieldValue {
    FieldValue::Array(values.iter().map(|&v| v.is_finite().then_some(v)).collect())
}

impl ShapRow {
    /// The rank when it is a positive whole number
    pub fn whole_rank(&self) -> Option<u32> {
        let rank = self.rank;
        (rank.fract() == 0.0 && rank >= 1.0 && rank <= f64::from(u32::MAX)).then_some(rank as u32)
    }

    pub fn to_rank_row(&self) -> Option<RankRow> {
        let rank = self.whole_rank()?;
        Some(
            RankRow::new(rank)
                .with("feature_name", FieldValue::Text(self.feature_name.clone()))
                .with("shap_value", optional_array(&self.shap_value))
                .with("color_value", optional_array(&self.color_value)),
        )
    }
}

/// Rank rows for every SHAP row with a usable rank; the rest are skipped
pub fn rank_rows_from_shap(rows: &[ShapRow]) -> Vec<RankRow> {
    rows.iter()
        .filter_map(|row| {
            let converted = row.to_rank_row();
            if converted.is_none() {
                tracing::warn!(rank = row.rank, feature = %row.feature_name, "row without a positive whole rank, skipping");
            }
            converted
        })
        .collect()
}

/// Features from merged rank rows; rows without a feature name are skipped
pub fn features_from_rank_rows(rows: &[RankRow]) -> Vec<FeatureValues> {
    let channel = |row: &RankRow, key: &str| -> Vec<f64> {
        row.array(key)
            .map(|a| a.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .unwrap_or_default()
    };
    rows.iter()
        .filter_map(|row| {
            let Some(name) = row.text("feature_name").filter(|n| !n.is_empty()) else {
                tracing::warn!(rank = row.rank, "rank row without feature name, skipping");
                return None;
            };
            Some(FeatureValues {
                name: name.to_string(),
                values: channel(row, "shap_value"),
                colors: channel(row, "color_value"),
            })
        })
        .collect()
}

/// Pre-binned counts per group, optionally keyed by feature
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistogramRow {
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub bins: Vec<f64>,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<Lenient>>,
}

impl From<&HistogramRow> for HistogramSpec {
    fn from(row: &HistogramRow) -> Self {
        HistogramSpec {
            edges: row.bins.clone(),
            groups: row
                .groups
                .iter()
                .map(|(k, v)| (k.clone(), v.iter().map(|c| c.0).collect()))
                .collect(),
        }
    }
}

/// A scatter point given either as `[x, y]` or `{"x": .., "y": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointRow {
    Pair(Lenient, Lenient),
    Object { x: Lenient, y: Lenient },
}

impl PointRow {
    pub fn xy(&self) -> (f64, f64) {
        match *self {
            PointRow::Pair(x, y) | PointRow::Object { x, y } => (x.0, y.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScatterRow {
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default)]
    pub points: Vec<PointRow>,
    #[serde(default)]
    pub regression: Option<Regression>,
}

impl ScatterRow {
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(PointRow::xy).collect()
    }
}

/// Named sample sets for density charts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSets {
    pub sets: BTreeMap<String, Vec<f64>>,
}

// =============================================================================
// Loading
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    JsonArray,
    JsonObject,
    Csv,
    Empty,
}

fn sniff(text: &str) -> Format {
    match text.trim_start().chars().next() {
        Some('[') => Format::JsonArray,
        Some('{') => Format::JsonObject,
        Some(_) => Format::Csv,
        None => Format::Empty,
    }
}

/// Load rows from a JSON array, a single JSON object, or CSV with a header line
pub fn read_rows<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    match sniff(text) {
        Format::JsonArray => serde_json::from_str(text).context("Failed to parse JSON rows"),
        Format::JsonObject => {
            let row = serde_json::from_str(text).context("Failed to parse JSON row")?;
            Ok(vec![row])
        }
        Format::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(text.as_bytes());
            let mut rows = Vec::new();
            for (i, record) in reader.deserialize().enumerate() {
                let row: T = record.with_context(|| format!("Failed to parse CSV row {}", i + 1))?;
                rows.push(row);
            }
            Ok(rows)
        }
        Format::Empty => Ok(Vec::new()),
    }
}

/// Load sample sets from a JSON object (`{"name": [..]}`) or from CSV where
/// each column is one set; empty cells are skipped.
pub fn read_sample_sets(text: &str) -> Result<SampleSets> {
    match sniff(text) {
        Format::JsonObject => {
            let raw: BTreeMap<String, Vec<Lenient>> =
                serde_json::from_str(text).context("Failed to parse sample sets")?;
            Ok(SampleSets {
                sets: raw
                    .into_iter()
                    .map(|(k, v)| (k, v.into_iter().map(|s| s.0).collect()))
                    .collect(),
            })
        }
        Format::JsonArray => Err(anyhow!(
            "Sample sets must be a JSON object mapping set names to arrays"
        )),
        Format::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(text.as_bytes());
            let headers: Vec<String> = reader
                .headers()
                .context("Failed to read CSV header")?
                .iter()
                .map(String::from)
                .collect();
            let mut sets: BTreeMap<String, Vec<f64>> =
                headers.iter().map(|h| (h.clone(), Vec::new())).collect();
            for (i, record) in reader.records().enumerate() {
                let record = record.with_context(|| format!("Failed to read CSV row {}", i + 1))?;
                for (header, cell) in headers.iter().zip(record.iter()) {
                    if cell.is_empty() {
                        continue;
                    }
                    let value = cell.parse().unwrap_or(f64::NAN);
                    if let Some(set) = sets.get_mut(header) {
                        set.push(value);
                    }
                }
            }
            Ok(SampleSets { sets })
        }
        Format::Empty => Ok(SampleSets::default()),
    }
}
