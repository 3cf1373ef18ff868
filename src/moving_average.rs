/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use crate::buffer::{quantize, SampleBuffer};
use crate::params::WindowParams;

/// Returns the half-open window `[lo, hi)` around `i`, clipped to a signal of `len` samples.
///
/// For a window of size `w` the centre sits at offset `(w - 1) / 2`, so even
/// windows take one more sample from the left than from the right.
fn window_bounds(i: usize, window_size: usize, len: usize) -> (usize, usize) {
    let right = (window_size - 1) / 2;
    let left = window_size - 1 - right;
    let lo = i.saturating_sub(left);
    let hi = i.saturating_add(right).min(len - 1) + 1;
    (lo, hi)
}

/// Boxcar smoothing: each output sample is the sum of the window divided by `window_size`.
///
/// Positions outside the signal count as zeros, so the first and last few
/// samples are pulled toward zero. The output always has the input length.
///
/// # Arguments
/// * `buffer` - Input samples
/// * `params` - Window length; 1 returns the input unchanged
///
/// # Returns
/// A new buffer with the smoothed samples.
pub fn moving_average(buffer: &SampleBuffer, params: WindowParams) -> SampleBuffer {
    let w = params.window_size();
    let samples = buffer.samples();
    let n = samples.len();

    // prefix[k] = sum of samples[..k]
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0i64);
    for &s in samples {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + s as i64);
    }

    let out: Vec<i16> = (0..n)
        .map(|i| {
            let (lo, hi) = window_bounds(i, w, n);
            let sum = prefix[hi] - prefix[lo];
            quantize(sum as f64 / w as f64)
        })
        .collect();

    log::debug!("moving average: window {} over {} samples", w, n);
    buffer.with_samples(out)
}
