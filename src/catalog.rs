use crate::metric::{LabelFilter, LabelSummary, SeriesDescriptor};
use std::collections::HashSet;
use thiserror::Error;

// (period, scale) of each predefined sine series. All share metric=sin, group=all.
const PREDEFINED: [(&str, &str); 10] = [
    ("10", "small"),
    ("20", "small"),
    ("30", "small"),
    ("40", "medium"),
    ("50", "medium"),
    ("60", "medium"),
    ("70", "medium"),
    ("80", "large"),
    ("90", "large"),
    ("100", "large"),
];

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("period {0:?} is not a positive number")]
    InvalidPeriod(String),
    #[error("series with period {0:?} is defined more than once")]
    DuplicateSeries(String),
}

/// Immutable list of the series this server knows about.
#[derive(Debug, Clone)]
pub struct Catalog {
    series: Vec<SeriesDescriptor>,
}

impl Catalog {
    pub fn new(series: Vec<SeriesDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for s in &series {
            match s.period.parse::<f64>() {
                Ok(p) if p.is_finite() && p > 0.0 => {}
                _ => return Err(CatalogError::InvalidPeriod(s.period.clone())),
            }
            if !seen.insert(s.period.as_str()) {
                return Err(CatalogError::DuplicateSeries(s.period.clone()));
            }
        }
        Ok(Self { series })
    }

    /// The ten sine waves served by default.
    pub fn predefined() -> Result<Self, CatalogError> {
        Self::new(
            PREDEFINED
                .iter()
                .map(|(period, scale)| SeriesDescriptor::new("sin", period, scale, "all"))
                .collect(),
        )
    }

    pub fn series(&self) -> &[SeriesDescriptor] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series whose labels agree with every entry of the filter, in catalog order.
    /// A filter key the series doesn't carry is ignored rather than treated as a mismatch.
    pub fn select(&self, filter: &LabelFilter) -> Vec<&SeriesDescriptor> {
        self.series
            .iter()
            .filter(|s| {
                filter
                    .iter()
                    .all(|(key, value)| s.label(key).map_or(true, |v| v == value))
            })
            .collect()
    }

    /// Number of series carrying each value, grouped by label name.
    pub fn label_summary(&self) -> LabelSummary {
        let mut summary = LabelSummary::new();
        for s in &self.series {
            for (name, value) in s.labels() {
                *summary
                    .entry(name.to_string())
                    .or_default()
                    .entry(value.to_string())
                    .or_default() += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
pub mod tests {
    use crate::metric::{LabelFilter, SeriesDescriptor};

    use super::{Catalog, CatalogError};

    fn filter(pairs: &[(&str, &str)]) -> LabelFilter {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_predefined_is_valid() {
        let catalog = Catalog::predefined().unwrap();
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn test_select_empty_filter() {
        let catalog = Catalog::predefined().unwrap();
        let result = catalog.select(&LabelFilter::new());
        assert_eq!(result.len(), 10);
        let periods: Vec<_> = result.iter().map(|s| s.period.as_str()).collect();
        assert_eq!(
            periods,
            vec!["10", "20", "30", "40", "50", "60", "70", "80", "90", "100"]
        );
    }

    #[test]
    fn test_select_by_period() {
        let catalog = Catalog::predefined().unwrap();
        let result = catalog.select(&filter(&[("period", "20")]));
        assert_eq!(result, vec![&SeriesDescriptor::new("sin", "20", "small", "all")]);
    }

    #[test]
    fn test_select_by_scale() {
        let catalog = Catalog::predefined().unwrap();
        let result = catalog.select(&filter(&[("metric", "sin"), ("scale", "medium")]));
        let periods: Vec<_> = result.iter().map(|s| s.period.as_str()).collect();
        assert_eq!(periods, vec!["40", "50", "60", "70"]);
    }

    #[test]
    fn test_select_no_match() {
        let catalog = Catalog::predefined().unwrap();
        assert!(catalog.select(&filter(&[("period", "999")])).is_empty());
        assert!(catalog.select(&filter(&[("metric", "cos")])).is_empty());
    }

    #[test]
    fn test_select_ignores_unknown_label() {
        let catalog = Catalog::predefined().unwrap();
        assert_eq!(catalog.select(&filter(&[("host", "a")])).len(), 10);
        assert_eq!(
            catalog
                .select(&filter(&[("host", "a"), ("period", "30")]))
                .len(),
            1
        );
    }

    #[test]
    fn test_label_summary() {
        let summary = Catalog::predefined().unwrap().label_summary();
        assert_eq!(summary.len(), 4);
        assert_eq!(summary["metric"]["sin"], 10);
        assert_eq!(summary["group"]["all"], 10);
        assert_eq!(summary["scale"]["small"], 3);
        assert_eq!(summary["scale"]["medium"], 4);
        assert_eq!(summary["scale"]["large"], 3);
        assert_eq!(summary["period"].len(), 10);
        assert!(summary["period"].values().all(|&n| n == 1));
        for values in summary.values() {
            assert_eq!(values.values().sum::<usize>(), 10);
        }
    }

    #[test]
    fn test_label_summary_stable() {
        let catalog = Catalog::predefined().unwrap();
        let first = catalog.label_summary();
        catalog.select(&filter(&[("period", "10")]));
        assert_eq!(catalog.label_summary(), first);
    }

    #[test]
    fn test_invalid_period() {
        let series = vec![SeriesDescriptor::new("sin", "ten", "small", "all")];
        assert_eq!(
            Catalog::new(series).err(),
            Some(CatalogError::InvalidPeriod("ten".to_string()))
        );
        let series = vec![SeriesDescriptor::new("sin", "0", "small", "all")];
        assert!(matches!(
            Catalog::new(series),
            Err(CatalogError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_duplicate_series() {
        let series = vec![
            SeriesDescriptor::new("sin", "10", "small", "all"),
            SeriesDescriptor::new("sin", "10", "large", "all"),
        ];
        assert_eq!(
            Catalog::new(series).err(),
            Some(CatalogError::DuplicateSeries("10".to_string()))
        );
    }
}
