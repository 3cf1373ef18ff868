/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{arg, ArgMatches, Command};

use kalman_denoise::config::DenoiseConfig;
use kalman_denoise::plot::write_waveform_csv;
use kalman_denoise::wav::{read_wav, save_wav};
use kalman_denoise::{Filter, KalmanParams, NoiseInjector, NoiseSpec, PipelineContext, WindowParams};

mod sweep;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("Audio Denoising CLI")
        .version("1.0")
        .author("Weronika")
        .about("CLI for noise injection and Kalman / moving-average / median denoising")
        .subcommand_required(true)
        .subcommand(
            Command::new("noise")
                .about("Add white Gaussian noise to a WAV file")
                .arg(arg!(-i --"in-file" <FILE> "Input WAV").required(true))
                .arg(arg!(-l --"intensity" <PERCENT> "Noise intensity, 0-100").default_value("10"))
                .arg(arg!(-s --"seed" <SEED> "Seed for reproducible noise"))
                .arg(arg!(-o --"out-file" <FILE> "Output WAV path").default_value("noisy.wav")),
        )
        .subcommand(
            Command::new("kalman")
                .about("Scalar Kalman filter")
                .arg(arg!(-i --"in-file" <FILE> "Input WAV").required(true))
                .arg(arg!(-q --"process-var" <Q> "Process variance").default_value("0.01"))
                .arg(arg!(-r --"measurement-var" <R> "Measurement variance").default_value("0.05"))
                .arg(arg!(-o --"out-file" <FILE> "Output WAV path").default_value("kalman.wav")),
        )
        .subcommand(
            Command::new("moving-average")
                .about("Boxcar moving-average filter")
                .arg(arg!(-i --"in-file" <FILE> "Input WAV").required(true))
                .arg(arg!(-w --"window" <N> "Window size").default_value("5"))
                .arg(arg!(-o --"out-file" <FILE> "Output WAV path").default_value("moving_average.wav")),
        )
        .subcommand(
            Command::new("median")
                .about("Sliding median filter")
                .arg(arg!(-i --"in-file" <FILE> "Input WAV").required(true))
                .arg(arg!(-w --"window" <N> "Window size").default_value("5"))
                .arg(arg!(-o --"out-file" <FILE> "Output WAV path").default_value("median.wav")),
        )
        .subcommand(
            Command::new("run")
                .about("Add noise and filter as described by a TOML config")
                .arg(arg!(-c --"config" <FILE> "TOML config").required(true))
                .arg(arg!(-i --"in-file" <FILE> "Input WAV").required(true))
                .arg(arg!(-n --"noisy-out" <FILE> "Save the noisy signal here"))
                .arg(arg!(-p --"plot" <CSV> "Export original/noisy/filtered waveforms as CSV"))
                .arg(arg!(-o --"out-file" <FILE> "Output WAV path").default_value("filtered.wav")),
        )
        .subcommand(
            Command::new("sweep")
                .about("Compare all filters over a parameter grid")
                .arg(arg!(-i --"in-file" <FILE> "Clean input WAV").required(true))
                .arg(arg!(-l --"intensity" <PERCENT> "Noise intensity, 0-100").default_value("10"))
                .arg(arg!(-s --"seed" <SEED> "Noise seed").default_value("0"))
                .arg(arg!(-d --"workdir" <DIR> "Output directory").default_value("workdir")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("noise", m)) => handle_noise(m),
        Some(("kalman", m)) => handle_kalman(m),
        Some(("moving-average", m)) => handle_moving_average(m),
        Some(("median", m)) => handle_median(m),
        Some(("run", m)) => handle_run(m),
        Some(("sweep", m)) => handle_sweep(m),
        _ => Err(anyhow!("Unknown command. Use --help.")),
    }
}

/// Required or defaulted string argument.
fn arg_str<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing --{}", name))
}

fn parse_arg<T>(m: &ArgMatches, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = arg_str(m, name)?;
    raw.parse().with_context(|| format!("invalid --{} '{}'", name, raw))
}

fn noise_injector(m: &ArgMatches) -> Result<NoiseInjector> {
    Ok(match m.get_one::<String>("seed") {
        Some(_) => NoiseInjector::with_seed(parse_arg(m, "seed")?),
        None => NoiseInjector::new(),
    })
}

fn handle_noise(m: &ArgMatches) -> Result<()> {
    let input = read_wav(arg_str(m, "in-file")?)?;
    let spec = NoiseSpec::new(parse_arg(m, "intensity")?)?;
    let out_path = arg_str(m, "out-file")?;
    let noisy = noise_injector(m)?.apply(&input, spec)?;
    save_wav(&noisy, out_path)?;
    log::info!("Added {}% noise -> {}", spec.intensity(), out_path);
    Ok(())
}

fn run_filter(m: &ArgMatches, filter: Filter) -> Result<()> {
    let input = read_wav(arg_str(m, "in-file")?)?;
    let out_path = arg_str(m, "out-file")?;
    let out = filter.apply(&input);
    save_wav(&out, out_path)?;
    log::info!("{} done -> {}", filter, out_path);
    Ok(())
}

fn handle_kalman(m: &ArgMatches) -> Result<()> {
    let params = KalmanParams::new(parse_arg(m, "process-var")?, parse_arg(m, "measurement-var")?)?;
    run_filter(m, Filter::Kalman(params))
}

fn handle_moving_average(m: &ArgMatches) -> Result<()> {
    run_filter(m, Filter::MovingAverage(WindowParams::new(parse_arg(m, "window")?)?))
}

fn handle_median(m: &ArgMatches) -> Result<()> {
    run_filter(m, Filter::Median(WindowParams::new(parse_arg(m, "window")?)?))
}

fn handle_run(m: &ArgMatches) -> Result<()> {
    let config_path = arg_str(m, "config")?;
    let config = DenoiseConfig::load(Path::new(config_path))?;
    let filter = config.filter()?;
    let spec = config.noise()?;

    let mut injector = match config.seed {
        Some(seed) => NoiseInjector::with_seed(seed),
        None => NoiseInjector::new(),
    };
    let input = read_wav(arg_str(m, "in-file")?)?;
    log::info!("Loaded {:.2} s of audio at {} Hz", input.duration_secs(), input.sample_rate());
    let mut ctx = PipelineContext::new(input);
    ctx.inject_noise(&mut injector, spec)?;
    ctx.filter(filter);

    let noisy = ctx.input_to_filter();
    let filtered = ctx
        .filtered()
        .ok_or_else(|| anyhow!("pipeline produced no filtered signal"))?;

    let out_path = arg_str(m, "out-file")?;
    save_wav(filtered, out_path)?;
    if let Some(noisy_out) = m.get_one::<String>("noisy-out") {
        save_wav(noisy, noisy_out)?;
    }
    if let Some(plot) = m.get_one::<String>("plot") {
        write_waveform_csv(
            plot,
            &[("original", ctx.original()), ("noisy", noisy), ("filtered", filtered)],
        )?;
        log::info!("Waveforms -> {}", plot);
    }
    log::info!("{}% noise + {} -> {}", spec.intensity(), filter, out_path);
    Ok(())
}

fn handle_sweep(m: &ArgMatches) -> Result<()> {
    let clean = read_wav(arg_str(m, "in-file")?)?;
    let spec = NoiseSpec::new(parse_arg(m, "intensity")?)?;
    let seed: u64 = parse_arg(m, "seed")?;
    sweep::run(&clean, spec, seed, Path::new(arg_str(m, "workdir")?))
}
