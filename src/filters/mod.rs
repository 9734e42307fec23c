//! Signal filtering algorithms for smoothing joint angles.
//!
//! Landmark jitter makes rep-channel angles flicker around the phase
//! thresholds. Smoothing is optional (`none` by default); when enabled every
//! rep channel gets its own filter instance.

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

/// Exponential filter for responsive smoothing
pub mod exponential;

/// Hampel filter for robust outlier detection and smoothing
pub mod hampel;

use crate::constants::{
    DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_HAMPEL_THRESHOLD, DEFAULT_HAMPEL_WINDOW, DEFAULT_MEDIAN_WINDOW,
    DEFAULT_MOVING_AVERAGE_WINDOW, MAX_FILTER_WINDOW,
};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Trait for all angle filters
pub trait SignalFilter: Send + Sync {
    /// Apply filter to one input sample
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn apply(&mut self, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Median of a non-empty slice, sorting it in place
pub(crate) fn median_of(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let len = values.len();
    if len % 2 == 0 {
        Some((values[len / 2 - 1] + values[len / 2]) / 2.0)
    } else {
        Some(values[len / 2])
    }
}

/// Validated filter selection, `kind[:param[:param]]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterSpec {
    #[default]
    None,
    MovingAverage { window: usize },
    Median { window: usize },
    Exponential { alpha: f64 },
    Hampel { window: usize, threshold: f64 },
}

impl FilterSpec {
    /// Build a fresh filter instance
    #[must_use]
    pub fn build(&self) -> Box<dyn SignalFilter> {
        match *self {
            FilterSpec::None => Box::new(NoFilter),
            FilterSpec::MovingAverage { window } => Box::new(moving_average::MovingAverageFilter::new(window)),
            FilterSpec::Median { window } => Box::new(median::MedianFilter::new(window)),
            FilterSpec::Exponential { alpha } => Box::new(exponential::ExponentialFilter::new(alpha)),
            FilterSpec::Hampel { window, threshold } => Box::new(hampel::HampelFilter::new(window, threshold)),
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, FilterSpec::None)
    }
}

fn parse_param<T: FromStr>(filter: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(text) => text
            .trim()
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid parameter '{text}' for filter {filter}"))),
    }
}

fn check_window(filter: &str, window: usize) -> Result<usize> {
    if window == 0 {
        return Err(Error::FilterError(format!("Window size for {filter} must be greater than 0")));
    }
    if window > MAX_FILTER_WINDOW {
        return Err(Error::FilterError(format!(
            "Window size for {filter} must be at most {MAX_FILTER_WINDOW}, got {window}"
        )));
    }
    Ok(window)
}

impl FromStr for FilterSpec {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        let mut parts = spec.split(':');
        let kind = parts.next().unwrap_or_default().trim().to_lowercase();
        let first = parts.next();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(Error::FilterError(format!("Too many parameters in filter spec: {spec}")));
        }

        let parsed = match kind.as_str() {
            "none" | "nofilter" => FilterSpec::None,
            "moving_average" | "movingaverage" => FilterSpec::MovingAverage {
                window: check_window(&kind, parse_param(&kind, first, DEFAULT_MOVING_AVERAGE_WINDOW)?)?,
            },
            "median" => FilterSpec::Median {
                window: check_window(&kind, parse_param(&kind, first, DEFAULT_MEDIAN_WINDOW)?)?,
            },
            "exponential" => {
                let alpha = parse_param(&kind, first, DEFAULT_EXPONENTIAL_ALPHA)?;
                if !(alpha > 0.0 && alpha <= 1.0) {
                    return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
                }
                FilterSpec::Exponential { alpha }
            }
            "hampel" => {
                let window = check_window(&kind, parse_param(&kind, first, DEFAULT_HAMPEL_WINDOW)?)?;
                if window % 2 == 0 {
                    return Err(Error::FilterError(format!("Window size must be odd, got {window}")));
                }
                let threshold = parse_param(&kind, second, DEFAULT_HAMPEL_THRESHOLD)?;
                if threshold.is_nan() || threshold < 0.0 {
                    return Err(Error::FilterError(format!("Threshold must be non-negative, got {threshold}")));
                }
                FilterSpec::Hampel { window, threshold }
            }
            _ => return Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
        };

        let takes_second = matches!(parsed, FilterSpec::Hampel { .. });
        if (matches!(parsed, FilterSpec::None) && first.is_some()) || (!takes_second && second.is_some()) {
            return Err(Error::FilterError(format!("Too many parameters in filter spec: {spec}")));
        }
        Ok(parsed)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::None => write!(f, "none"),
            FilterSpec::MovingAverage { window } => write!(f, "moving_average:{window}"),
            FilterSpec::Median { window } => write!(f, "median:{window}"),
            FilterSpec::Exponential { alpha } => write!(f, "exponential:{alpha}"),
            FilterSpec::Hampel { window, threshold } => write!(f, "hampel:{window}:{threshold}"),
        }
    }
}

/// Create an angle filter from a spec such as `median:5`
pub fn create_filter(spec: &str) -> Result<Box<dyn SignalFilter>> {
    Ok(spec.parse::<FilterSpec>()?.build())
}

/// One filter per rep channel
pub struct ChannelSmoother {
    spec: FilterSpec,
    filters: Vec<Box<dyn SignalFilter>>,
}

impl ChannelSmoother {
    #[must_use]
    pub fn new(spec: FilterSpec, channels: usize) -> Self {
        Self {
            spec,
            filters: (0..channels).map(|_| spec.build()).collect(),
        }
    }

    #[must_use]
    pub fn spec(&self) -> FilterSpec {
        self.spec
    }

    /// Smooth channel values in place; undefined values are skipped and do
    /// not enter the filter history
    pub fn apply(&mut self, values: &mut [Option<f64>]) {
        if self.spec.is_none() {
            return;
        }
        for (filter, value) in self.filters.iter_mut().zip(values.iter_mut()) {
            if let Some(v) = value {
                *v = filter.apply(*v);
            }
        }
    }

    pub fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}
