/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use crate::buffer::{quantize, SampleBuffer};
use crate::params::WindowParams;

/// Half-open window `[lo, hi)` used for sample `i`.
///
/// With `h = window_size / 2` the window is `[max(i - h, 0), min(i + h, len))`:
/// at most `2h` samples, sample `i` sits right of centre and near the end the
/// window shrinks down to a single sample. For `h = 0` the window would be
/// empty and is widened to `[i, i + 1)`.
fn window_bounds(i: usize, window_size: usize, len: usize) -> (usize, usize) {
    let h = window_size / 2;
    let lo = i.saturating_sub(h);
    let hi = i.saturating_add(h).min(len).max(lo + 1);
    (lo, hi)
}

/// Median of a non-empty slice, reordering it in place.
/// Even counts return the mean of the two middle values.
fn median_of(values: &mut [i16]) -> f64 {
    let len = values.len();
    let (left, upper, _) = values.select_nth_unstable(len / 2);
    let upper = *upper as f64;
    if len % 2 == 1 {
        return upper;
    }
    // left is non-empty here since len >= 2
    let lower = left.iter().copied().max().unwrap_or_default() as f64;
    (lower + upper) / 2.0
}

/// Sliding median filter, robust to isolated spikes.
///
/// # Arguments
/// * `buffer` - Input samples
/// * `params` - Window length; see [`window_bounds`] for how it maps to the realized window
///
/// # Returns
/// A new buffer of the same length. Medians of even-sized windows are
/// rounded half up.
pub fn median_filter(buffer: &SampleBuffer, params: WindowParams) -> SampleBuffer {
    let w = params.window_size();
    let samples = buffer.samples();
    let n = samples.len();
    let mut scratch: Vec<i16> = Vec::with_capacity(w.min(n).max(1));

    let out: Vec<i16> = (0..n)
        .map(|i| {
            let (lo, hi) = window_bounds(i, w, n);
            scratch.clear();
            scratch.extend_from_slice(&samples[lo..hi]);
            quantize(median_of(&mut scratch))
        })
        .collect();

    log::debug!("median: window {} over {} samples", w, n);
    buffer.with_samples(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_EPSILON;
    use float_cmp::approx_eq;

    fn buf(samples: Vec<i16>) -> SampleBuffer {
        SampleBuffer::new(samples, 44100).unwrap()
    }

    #[test]
    fn test_window_bounds_truncated_rule() {
        // len 7, window 3 -> h = 1
        assert_eq!(window_bounds(0, 3, 7), (0, 1));
        assert_eq!(window_bounds(3, 3, 7), (2, 4));
        assert_eq!(window_bounds(6, 3, 7), (5, 7));
        // window 5 -> h = 2, four samples in the interior
        assert_eq!(window_bounds(4, 5, 10), (2, 6));
        assert_eq!(window_bounds(9, 5, 10), (7, 10));
        // window 1 -> widened to the sample itself
        assert_eq!(window_bounds(4, 1, 10), (4, 5));
    }

    #[test]
    fn test_median_of() {
        assert!(approx_eq!(f64, median_of(&mut [5]), 5.0, epsilon = _EPSILON));
        assert!(approx_eq!(f64, median_of(&mut [40, 5]), 22.5, epsilon = _EPSILON));
        assert!(approx_eq!(f64, median_of(&mut [9, -3, 4]), 4.0, epsilon = _EPSILON));
        assert!(approx_eq!(f64, median_of(&mut [7, 1, 3, 100]), 5.0, epsilon = _EPSILON));
    }

    #[test]
    fn test_spike_case() {
        let input = buf(vec![5, 5, 5, 40, 5, 5, 5]);
        let out = median_filter(&input, WindowParams::new(3).unwrap());
        // i = 3 and i = 4 see [5, 40] -> 22.5 -> 23
        assert_eq!(out.samples(), &[5, 5, 5, 23, 23, 5, 5]);
    }

    #[test]
    fn test_wider_window_removes_spike() {
        let input = buf(vec![5, 5, 5, 40, 5, 5, 5]);
        let out = median_filter(&input, WindowParams::new(5).unwrap());
        assert!(out.samples().iter().all(|&s| s == 5), "{:?}", out.samples());
    }

    #[test]
    fn test_negative_half_rounds_up() {
        let input = buf(vec![-40, -5, -5]);
        let out = median_filter(&input, WindowParams::new(2).unwrap());
        // h = 1: [0,1) -> -40, [0,2) -> -22.5 -> -22, [1,3) -> -5
        assert_eq!(out.samples(), &[-40, -22, -5]);
    }

    #[test]
    fn test_window_one_is_identity() {
        let input = buf(vec![1, -2, 3, i16::MAX, i16::MIN]);
        assert_eq!(median_filter(&input, WindowParams::new(1).unwrap()), input);
    }

    #[test]
    fn test_large_window_and_extremes() {
        let input = buf(vec![i16::MAX, i16::MAX, i16::MIN, i16::MAX]);
        let out = median_filter(&input, WindowParams::new(100).unwrap());
        assert_eq!(out.len(), 4);
        // every window is the whole signal: median of [MIN, MAX, MAX, MAX] is MAX
        assert!(out.samples().iter().all(|&s| s == i16::MAX));
    }

    #[test]
    fn test_huge_window_keeps_length() {
        let input = buf(vec![1, 2, 3, 4]);
        for w in [usize::MAX, usize::MAX / 4, 1 << 40] {
            let out = median_filter(&input, WindowParams::new(w).unwrap());
            // every window covers the whole signal: (2 + 3) / 2 = 2.5 -> 3
            assert_eq!(out.samples(), &[3, 3, 3, 3], "w={}", w);
        }
        assert_eq!(window_bounds(3, usize::MAX, 4), (0, 4));
    }

    #[test]
    fn test_empty_and_deterministic() {
        assert!(median_filter(&buf(vec![]), WindowParams::new(3).unwrap()).is_empty());
        let input = buf((0..500).map(|i| ((i * 97) % 1000 - 500) as i16).collect());
        let p = WindowParams::new(7).unwrap();
        let a = median_filter(&input, p);
        assert_eq!(a.len(), input.len());
        assert_eq!(a, median_filter(&input, p));
    }
}
