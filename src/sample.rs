use crate::metric::{DataResult, SeriesDescriptor};
use std::f64::consts::PI;
use thiserror::Error;

// Periods are given in seconds, timestamps in milliseconds.
const PERIOD_SCALE: f64 = 1000.0;

#[derive(Error, Debug, PartialEq)]
pub enum SampleError {
    #[error("expected exactly one matching series, found {0}")]
    NotUnique(usize),
    #[error("step must not be zero")]
    InvalidStep,
    #[error("range {start}..{stop} can't be walked with step {step}")]
    InvalidRange { start: i64, stop: i64, step: i64 },
    #[error("range would produce {requested} points, limit is {limit}")]
    TooManyPoints { requested: u64, limit: usize },
    #[error("period {0:?} is not a number")]
    InvalidPeriod(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl TimeRange {
    /// Number of samples in the range. `stop` is included only when the
    /// step lands on it exactly; otherwise the partial last step is dropped.
    pub fn point_count(&self) -> Result<u64, SampleError> {
        if self.step == 0 {
            return Err(SampleError::InvalidStep);
        }
        let invalid = || SampleError::InvalidRange {
            start: self.start,
            stop: self.stop,
            step: self.step,
        };
        let span = self.stop.checked_sub(self.start).ok_or_else(invalid)?;
        let mut n = span.checked_div(self.step).ok_or_else(invalid)?;
        if span.checked_rem(self.step).ok_or_else(invalid)? == 0 {
            n += 1;
        }
        u64::try_from(n).map_err(|_| invalid())
    }

    pub fn timestamp(&self, i: u64) -> i64 {
        // i < point_count(), so this lies between start and stop.
        self.start + i as i64 * self.step
    }
}

/// Generates sine samples for a single series.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    max_points: usize,
}

impl Sampler {
    pub fn new(max_points: usize) -> Self {
        Self { max_points }
    }

    pub fn generate(
        &self,
        matches: &[&SeriesDescriptor],
        range: TimeRange,
    ) -> Result<Vec<DataResult>, SampleError> {
        let series = match matches {
            [series] => *series,
            _ => return Err(SampleError::NotUnique(matches.len())),
        };

        let n = range.point_count()?;
        if n > self.max_points as u64 {
            return Err(SampleError::TooManyPoints {
                requested: n,
                limit: self.max_points,
            });
        }

        let period: f64 = series
            .period
            .parse()
            .map_err(|_| SampleError::InvalidPeriod(series.period.clone()))?;

        let values = (0..n)
            .map(|i| (2.0 * PI * range.timestamp(i) as f64 / (period * PERIOD_SCALE)).sin())
            .collect();

        Ok(vec![DataResult {
            series: series.clone(),
            values,
        }])
    }
}
