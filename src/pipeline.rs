/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::buffer::SampleBuffer;
use crate::error::{DspError, Result};
use crate::kalman::KalmanFilter;
use crate::median::median_filter;
use crate::moving_average::moving_average;
use crate::noise::NoiseInjector;
use crate::params::{KalmanParams, NoiseSpec, WindowParams};

/// Filter selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum FilterKind {
    Kalman,
    MovingAverage,
    Median,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Kalman => "Kalman",
            FilterKind::MovingAverage => "MovingAverage",
            FilterKind::Median => "Median",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FilterKind {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "kalman" => Ok(FilterKind::Kalman),
            "movingaverage" | "average" | "boxcar" => Ok(FilterKind::MovingAverage),
            "median" => Ok(FilterKind::Median),
            _ => Err(DspError::invalid(format!("unknown filter kind '{}'", s))),
        }
    }
}

/// Loose parameter record, checked against a [`FilterKind`] by [`Filter::from_parts`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterParams {
    Kalman(KalmanParams),
    Window(WindowParams),
}

/// A filter together with the only parameters that make sense for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Filter {
    Kalman(KalmanParams),
    MovingAverage(WindowParams),
    Median(WindowParams),
}

impl Filter {
    /// Pairs a kind with a parameter record. A record of the wrong shape
    /// (e.g. window params for Kalman) is rejected.
    pub fn from_parts(kind: FilterKind, params: FilterParams) -> Result<Self> {
        match (kind, params) {
            (FilterKind::Kalman, FilterParams::Kalman(p)) => Ok(Filter::Kalman(p)),
            (FilterKind::MovingAverage, FilterParams::Window(p)) => Ok(Filter::MovingAverage(p)),
            (FilterKind::Median, FilterParams::Window(p)) => Ok(Filter::Median(p)),
            (kind, params) => Err(DspError::invalid(format!(
                "{} filter cannot take {:?}",
                kind, params
            ))),
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Kalman(_) => FilterKind::Kalman,
            Filter::MovingAverage(_) => FilterKind::MovingAverage,
            Filter::Median(_) => FilterKind::Median,
        }
    }

    /// Runs the filter. Output length always equals input length.
    pub fn apply(&self, buffer: &SampleBuffer) -> SampleBuffer {
        let out = match *self {
            Filter::Kalman(p) => KalmanFilter::new(p).apply(buffer),
            Filter::MovingAverage(p) => moving_average(buffer, p),
            Filter::Median(p) => median_filter(buffer, p),
        };
        debug_assert_eq!(out.len(), buffer.len());
        out
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Kalman(p) => write!(
                f,
                "Kalman(Q={}, R={})",
                p.process_variance(),
                p.measurement_variance()
            ),
            Filter::MovingAverage(p) => write!(f, "MovingAverage(w={})", p.window_size()),
            Filter::Median(p) => write!(f, "Median(w={})", p.window_size()),
        }
    }
}

/// Filters `buffer` with the filter named by `kind`, configured by `params`.
pub fn apply(buffer: &SampleBuffer, kind: FilterKind, params: FilterParams) -> Result<SampleBuffer> {
    let filter = Filter::from_parts(kind, params)?;
    Ok(filter.apply(buffer))
}

/// Buffers of one denoising session: the decoded input, the input with noise
/// added, and the filter output.
#[derive(Clone, Debug)]
pub struct PipelineContext {
    original: SampleBuffer,
    noisy: Option<SampleBuffer>,
    filtered: Option<SampleBuffer>,
}

impl PipelineContext {
    pub fn new(original: SampleBuffer) -> Self {
        PipelineContext {
            original,
            noisy: None,
            filtered: None,
        }
    }

    /// Adds noise to the original buffer. Replaces any earlier noisy buffer and
    /// drops a filter result computed from it.
    pub fn inject_noise(&mut self, injector: &mut NoiseInjector, spec: NoiseSpec) -> Result<&SampleBuffer> {
        let noisy = injector.apply(&self.original, spec)?;
        self.filtered = None;
        Ok(self.noisy.insert(noisy))
    }

    /// Filters the noisy buffer, or the original one when no noise was injected.
    pub fn filter(&mut self, filter: Filter) -> &SampleBuffer {
        log::debug!("pipeline: applying {}", filter);
        let filtered = filter.apply(self.input_to_filter());
        self.filtered.insert(filtered)
    }

    pub fn original(&self) -> &SampleBuffer {
        &self.original
    }

    pub fn noisy(&self) -> Option<&SampleBuffer> {
        self.noisy.as_ref()
    }

    pub fn filtered(&self) -> Option<&SampleBuffer> {
        self.filtered.as_ref()
    }

    /// The buffer a filter would read next.
    pub fn input_to_filter(&self) -> &SampleBuffer {
        self.noisy.as_ref().unwrap_or(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal() -> SampleBuffer {
        let samples = (0..400)
            .map(|i| (3000.0 * (i as f64 * 0.05).sin()) as i16)
            .collect();
        SampleBuffer::new(samples, 8000).unwrap()
    }

    fn all_filters() -> Vec<(FilterKind, FilterParams)> {
        vec![
            (FilterKind::Kalman, FilterParams::Kalman(KalmanParams::new(0.01, 0.1).unwrap())),
            (FilterKind::MovingAverage, FilterParams::Window(WindowParams::new(5).unwrap())),
            (FilterKind::Median, FilterParams::Window(WindowParams::new(5).unwrap())),
        ]
    }

    #[test]
    fn test_length_preserved_for_every_kind() {
        let buf = test_signal();
        for (kind, params) in all_filters() {
            for len in [0, 1, 2, 7, 400] {
                let part = SampleBuffer::new(buf.samples()[..len].to_vec(), 8000).unwrap();
                let out = apply(&part, kind, params).unwrap();
                assert_eq!(out.len(), len, "kind={}", kind);
                assert_eq!(out.sample_rate(), 8000);
            }
        }
    }

    #[test]
    fn test_mismatched_params_rejected() {
        let window = FilterParams::Window(WindowParams::new(3).unwrap());
        let kalman = FilterParams::Kalman(KalmanParams::new(1.0, 1.0).unwrap());
        let buf = test_signal();
        assert!(matches!(apply(&buf, FilterKind::Kalman, window), Err(DspError::InvalidParameter(_))));
        assert!(matches!(apply(&buf, FilterKind::MovingAverage, kalman), Err(DspError::InvalidParameter(_))));
        assert!(matches!(apply(&buf, FilterKind::Median, kalman), Err(DspError::InvalidParameter(_))));
    }

    #[test]
    fn test_dispatch_matches_direct_calls() {
        let buf = test_signal();
        let w = WindowParams::new(4).unwrap();
        let k = KalmanParams::new(0.2, 0.7).unwrap();
        assert_eq!(apply(&buf, FilterKind::MovingAverage, FilterParams::Window(w)).unwrap(), moving_average(&buf, w));
        assert_eq!(apply(&buf, FilterKind::Median, FilterParams::Window(w)).unwrap(), median_filter(&buf, w));
        assert_eq!(
            apply(&buf, FilterKind::Kalman, FilterParams::Kalman(k)).unwrap(),
            crate::kalman::kalman_filter(&buf, k)
        );
    }

    #[test]
    fn test_filters_are_deterministic() {
        let buf = test_signal();
        for (kind, params) in all_filters() {
            assert_eq!(apply(&buf, kind, params).unwrap(), apply(&buf, kind, params).unwrap());
        }
    }

    #[test]
    fn test_filter_kind_from_str() {
        assert_eq!("Kalman".parse::<FilterKind>().unwrap(), FilterKind::Kalman);
        assert_eq!("moving-average".parse::<FilterKind>().unwrap(), FilterKind::MovingAverage);
        assert_eq!("MovingAverage".parse::<FilterKind>().unwrap(), FilterKind::MovingAverage);
        assert_eq!("MEDIAN".parse::<FilterKind>().unwrap(), FilterKind::Median);
        assert!("wiener".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_context_threads_buffers() {
        let mut ctx = PipelineContext::new(test_signal());
        let filter = Filter::Median(WindowParams::new(3).unwrap());

        // without noise the original is filtered
        let direct = ctx.filter(filter).clone();
        assert_eq!(direct, filter.apply(ctx.original()));

        let mut injector = NoiseInjector::with_seed(9);
        let noisy = ctx.inject_noise(&mut injector, NoiseSpec::new(5).unwrap()).unwrap().clone();
        assert!(ctx.filtered().is_none());
        assert_ne!(&noisy, ctx.original());

        let filtered = ctx.filter(filter).clone();
        assert_eq!(filtered, filter.apply(&noisy));
        assert_eq!(ctx.noisy(), Some(&noisy));
        assert_eq!(filtered.len(), ctx.original().len());
    }
}
