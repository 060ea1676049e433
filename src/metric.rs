use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label names every descriptor carries, in serialization order.
pub const LABEL_NAMES: [&str; 4] = ["metric", "period", "scale", "group"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub metric: String,
    pub period: String,
    pub scale: String,
    pub group: String,
}

impl SeriesDescriptor {
    pub fn new(metric: &str, period: &str, scale: &str, group: &str) -> Self {
        Self {
            metric: metric.to_string(),
            period: period.to_string(),
            scale: scale.to_string(),
            group: group.to_string(),
        }
    }

    /// Value of the label called `name`, or `None` when the descriptor
    /// has no such label.
    pub fn label(&self, name: &str) -> Option<&str> {
        match name {
            "metric" => Some(&self.metric),
            "period" => Some(&self.period),
            "scale" => Some(&self.scale),
            "group" => Some(&self.group),
            _ => None,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> {
        LABEL_NAMES
            .into_iter()
            .zip([&self.metric, &self.period, &self.scale, &self.group])
            .map(|(name, value)| (name, value.as_str()))
    }
}

// Label name -> expected value. Duplicate keys in a query collapse to the last one.
pub type LabelFilter = BTreeMap<String, String>;

// Label name -> label value -> number of series carrying it.
pub type LabelSummary = BTreeMap<String, BTreeMap<String, usize>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub series: SeriesDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataResult {
    pub series: SeriesDescriptor,
    pub values: Vec<f64>,
}
