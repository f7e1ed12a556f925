mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use voicegender::analysis::render::{self, AnalysisReport};
use voicegender::audio::wav;
use voicegender::config::{self, AppConfig};
use voicegender::dsp::synth;
use voicegender::{Analysis, AnalysisPipeline, PipelineConfig, Waveform};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    if let Some(level) = &cli.log_level {
        app_config.logging.level = level.clone();
    }
    init_tracing(&app_config.logging.level)?;

    match cli.command {
        Command::Analyze {
            files,
            band,
            algorithm,
            snr_floor_db,
            energy_floor,
            threshold_hz,
            json,
        } => {
            // Command-line flags override the config file
            if let Some(band) = band {
                app_config.pitch.band = band;
            }
            if let Some(algorithm) = algorithm {
                app_config.pitch.algorithm = algorithm;
            }
            if let Some(v) = snr_floor_db {
                app_config.clarity.snr_floor_db = v;
            }
            if let Some(v) = energy_floor {
                app_config.clarity.energy_floor = v;
            }
            if let Some(v) = threshold_hz {
                app_config.classifier.threshold_hz = v;
            }
            analyze_files(&files, &app_config, json)
        }

        Command::Tone {
            out,
            freq,
            amplitude,
            duration,
            lead_in,
            noise,
            seed,
            sample_rate,
        } => {
            let tone = synth::sine(freq, sample_rate, duration, amplitude);
            let mut samples = synth::with_lead_in(&tone, sample_rate, lead_in);
            synth::add_gaussian_noise(&mut samples, noise, seed);

            let waveform = Waveform::new(samples, sample_rate)?;
            wav::write_waveform(&out, &waveform)?;
            println!(
                "Wrote {:.1}s {freq} Hz tone to {}",
                waveform.duration_secs(),
                style(out.display()).green()
            );
            Ok(())
        }

        Command::Config => {
            let text = toml::to_string_pretty(&app_config).context("Failed to render config")?;
            print!("{text}");
            Ok(())
        }

        Command::Paths => {
            let path = cli.config.unwrap_or_else(voicegender::paths::config_file);
            let status = if path.exists() { "" } else { " (not found, using defaults)" };
            println!("Config: {}{status}", path.display());
            Ok(())
        }
    }
}

/// Analyze every file, reporting decode failures per file and carrying on.
fn analyze_files(files: &[PathBuf], app_config: &AppConfig, json: bool) -> Result<()> {
    let pipeline = AnalysisPipeline::new(PipelineConfig::from(app_config));

    let mut results: Vec<(String, f32, u32, Analysis)> = Vec::new();
    let mut failed = 0;

    if !json {
        println!("Analyzing {} file(s)...", files.len());
        println!();
    }

    for path in files {
        let name = path.display().to_string();
        match wav::load_waveform(path) {
            Ok(waveform) => {
                let analysis = pipeline.analyze_detailed(&waveform);
                results.push((name, waveform.duration_secs(), waveform.sample_rate(), analysis));
            }
            Err(err) => {
                failed += 1;
                eprintln!("  {} {name}: {err:#}", style("FAIL").red());
            }
        }
    }

    let reports: Vec<AnalysisReport<'_>> = results
        .iter()
        .map(|(name, duration_secs, sample_rate, analysis)| AnalysisReport {
            file: name,
            duration_secs: *duration_secs,
            sample_rate: *sample_rate,
            analysis,
        })
        .collect();

    if json {
        println!("{}", render::to_json(&reports)?);
    } else {
        reports.iter().for_each(render::print_analysis);
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} file(s) could not be analyzed", files.len());
    }
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid log level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
