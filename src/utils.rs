/* ==================================================================================================
 *                           This file is part of the bachelor thesis project
 *                  Implementation and Analysis of Selected Noise Reduction Methods
 *                                Weronika Tarnawska (Index No. 331171)
 *                                  Supervisor:  dr hab. Paweł Woźny
 *                                  University of Wrocław, June 2025
 * ================================================================================================== */
use crate::buffer::SampleBuffer;

/// Pairs of samples up to the length of the shorter buffer.
fn paired<'a>(a: &'a SampleBuffer, b: &'a SampleBuffer) -> impl Iterator<Item = (f64, f64)> + 'a {
    a.samples()
        .iter()
        .zip(b.samples().iter())
        .map(|(&x, &y)| (x as f64, y as f64))
}

/// Computes the mean squared error (MSE) between two buffers.
/// Buffers of different length are compared over the shorter one; two empty buffers give 0.
pub fn mean_square_error(a: &SampleBuffer, b: &SampleBuffer) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    paired(a, b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>() / len as f64
}

/// Compute the linear signal-to-noise ratio between a clean reference and a processed signal.
/// SNR = P_clean / P_noise, where noise = clean - processed.
///
/// If the buffers have different lengths, only the common prefix is compared.
///
/// # Returns
/// * Linear SNR, or infinity when the processed signal matches the reference exactly.
pub fn sig_to_noise_ratio(clean: &SampleBuffer, processed: &SampleBuffer) -> f64 {
    let (pow_signal, pow_error) = paired(clean, processed)
        .fold((0.0, 0.0), |(ps, pe), (c, p)| (ps + c * c, pe + (c - p).powi(2)));
    if pow_error == 0.0 {
        return f64::INFINITY;
    }
    pow_signal / pow_error
}

/// Compute the SNR in decibels: 10 * log10(linear SNR).
fn sig_to_noise_ratio_db(clean: &SampleBuffer, processed: &SampleBuffer) -> f64 {
    10.0 * sig_to_noise_ratio(clean, processed).log10()
}

/// Improvement in SNR (dB) from a noisy input to a processed output, relative to a clean reference.
///
/// improvement_dB = SNR_db(clean, processed) - SNR_db(clean, noisy)
pub fn snr_improvement_db(clean: &SampleBuffer, noisy: &SampleBuffer, processed: &SampleBuffer) -> f64 {
    sig_to_noise_ratio_db(clean, processed) - sig_to_noise_ratio_db(clean, noisy)
}

/// Linear improvement in SNR: SNR(clean, processed) / SNR(clean, noisy).
pub fn snr_improvement(clean: &SampleBuffer, noisy: &SampleBuffer, processed: &SampleBuffer) -> f64 {
    let snr_in = sig_to_noise_ratio(clean, noisy);
    let snr_out = sig_to_noise_ratio(clean, processed);
    if snr_in == 0.0 {
        return f64::INFINITY;
    }
    snr_out / snr_in
}
