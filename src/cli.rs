use std::path::PathBuf;

use clap::{Parser, Subcommand};

use voicegender::dsp::pitch::{PitchAlgorithm, PitchBand};

#[derive(Parser)]
#[command(name = "voicegender")]
#[command(about = "Estimate perceived vocal gender from a recorded utterance")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "voicegender=trace")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one or more WAV files
    Analyze {
        /// WAV files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Pitch search band
        #[arg(long, value_enum)]
        band: Option<PitchBand>,

        /// Pitch tracking algorithm
        #[arg(long, value_enum)]
        algorithm: Option<PitchAlgorithm>,

        /// Minimum acceptable SNR in dB
        #[arg(long, allow_hyphen_values = true)]
        snr_floor_db: Option<f32>,

        /// Minimum acceptable mean power
        #[arg(long)]
        energy_floor: Option<f32>,

        /// Mean pitch (Hz) above which a voice is classified female
        #[arg(long)]
        threshold_hz: Option<f32>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a synthetic test tone as a WAV file
    Tone {
        /// Output path
        out: PathBuf,

        /// Tone frequency in Hz
        #[arg(long, default_value_t = 120.0)]
        freq: f32,

        /// Peak amplitude (0.0-1.0)
        #[arg(long, default_value_t = 0.5)]
        amplitude: f32,

        /// Tone duration in seconds
        #[arg(long, default_value_t = 1.0)]
        duration: f32,

        /// Silence before the tone starts, in seconds
        #[arg(long, default_value_t = 0.75)]
        lead_in: f32,

        /// Standard deviation of added Gaussian noise
        #[arg(long, default_value_t = 0.0)]
        noise: f32,

        /// Noise seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Sample rate of the written file
        #[arg(long, default_value_t = 22050)]
        sample_rate: u32,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Show where the config file is read from
    Paths,
}
