/* ==================================================================================================
 *                           This file is part of the bachelor thesis project
 *                  Implementation and Analysis of Selected Noise Reduction Methods
 *                                Weronika Tarnawska (Index No. 331171)
 *                                  Supervisor:  dr hab. Paweł Woźny
 *                                  University of Wrocław, June 2025
 * ================================================================================================== */
use kalman_denoise::utils::{mean_square_error, snr_improvement, snr_improvement_db};
use kalman_denoise::wav::save_wav;
use kalman_denoise::{Filter, KalmanParams, NoiseInjector, NoiseSpec, SampleBuffer, WindowParams};

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use csv::Writer;

/// Kalman (Q, R) pairs
const KALMAN_GRID: [(f64, f64); 4] = [(0.001, 0.001), (0.001, 0.01), (0.01, 0.1), (0.001, 0.1)];
const WINDOW_GRID: [usize; 4] = [3, 5, 9, 17];

fn filter_grid() -> Result<Vec<Filter>> {
    let mut filters = Vec::new();
    for (q, r) in KALMAN_GRID {
        filters.push(Filter::Kalman(KalmanParams::new(q, r)?));
    }
    for w in WINDOW_GRID {
        filters.push(Filter::MovingAverage(WindowParams::new(w)?));
    }
    for w in WINDOW_GRID {
        filters.push(Filter::Median(WindowParams::new(w)?));
    }
    Ok(filters)
}

fn param_columns(filter: &Filter) -> (String, String, String) {
    match filter {
        Filter::Kalman(p) => (String::new(), p.process_variance().to_string(), p.measurement_variance().to_string()),
        Filter::MovingAverage(p) | Filter::Median(p) => (p.window_size().to_string(), String::new(), String::new()),
    }
}

fn file_stem(filter: &Filter) -> String {
    match filter {
        Filter::Kalman(p) => format!("kalman_q{}_r{}", p.process_variance(), p.measurement_variance()),
        Filter::MovingAverage(p) => format!("moving_average_w{}", p.window_size()),
        Filter::Median(p) => format!("median_w{}", p.window_size()),
    }
}

/// Adds noise to `clean`, runs every filter of the grid on the noisy copy and
/// records SNR improvement, MSE and timing per run in `<workdir>/results.csv`.
/// Each filtered signal is also written to `workdir`.
pub fn run(clean: &SampleBuffer, spec: NoiseSpec, seed: u64, workdir: &Path) -> Result<()> {
    fs::create_dir_all(workdir).with_context(|| format!("creating {}", workdir.display()))?;

    let noisy = NoiseInjector::with_seed(seed).apply(clean, spec)?;
    let noisy_path = workdir.join("noisy.wav");
    save_wav(&noisy, &noisy_path.to_string_lossy())?;

    let results_path = workdir.join("results.csv");
    let mut csv_writer = Writer::from_path(&results_path)
        .with_context(|| format!("creating {}", results_path.display()))?;
    csv_writer.write_record([
        "algorithm",
        "window",
        "process_variance",
        "measurement_variance",
        "snr_linear",
        "snr_db",
        "mse",
        "time_sec",
    ])?;

    for filter in filter_grid()? {
        let start = Instant::now();
        let denoised = filter.apply(&noisy);
        let duration_sec = start.elapsed().as_secs_f64();

        let snr_lin = snr_improvement(clean, &noisy, &denoised);
        let snr_db = snr_improvement_db(clean, &noisy, &denoised);
        let mse = mean_square_error(clean, &denoised);

        let out_path = workdir.join(format!("{}.wav", file_stem(&filter)));
        save_wav(&denoised, &out_path.to_string_lossy())?;

        let (window, q, r) = param_columns(&filter);
        csv_writer.write_record([
            filter.kind().to_string(),
            window,
            q,
            r,
            snr_lin.to_string(),
            snr_db.to_string(),
            mse.to_string(),
            duration_sec.to_string(),
        ])?;
        log::info!("{}: snr improvement {:.2} dB", filter, snr_db);
    }

    csv_writer.flush()?;
    log::info!(
        "Sweep completed. Outputs in '{}', results in '{}'",
        workdir.display(),
        results_path.display()
    );
    Ok(())
}
