use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use super::clarity::Verdict;
use super::classifier::Category;
use super::pipeline::Analysis;

/// One analyzed file, in the shape written by `--json`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub file: &'a str,
    pub duration_secs: f32,
    pub sample_rate: u32,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
}

pub fn to_json(reports: &[AnalysisReport<'_>]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("Failed to serialize analysis report")
}

/// Print one analysis as indented, coloured text.
pub fn print_analysis(report: &AnalysisReport<'_>) {
    let a = report.analysis;
    let prediction = &a.prediction;

    println!("  {} {}", style(">>").cyan(), report.file);
    println!(
        "     Loaded:   {:.1}s, {} Hz",
        report.duration_secs, report.sample_rate
    );

    let category = match prediction.category() {
        Category::Male | Category::Female => style(prediction.category().to_string()).green().bold(),
        Category::Indeterminate => style(prediction.category().to_string()).yellow().bold(),
    };
    println!("     Voice:    {category}");

    match prediction.pitch_hz() {
        Some(hz) => println!("     Mean F0:  {hz:.1} Hz"),
        None => println!("     Mean F0:  -"),
    }
    if let Some(reason) = prediction.reason() {
        println!("     Reason:   {reason}");
    }

    println!(
        "     Voiced:   {}/{} frames",
        a.pitch.voiced_frames(),
        a.pitch.total_frames()
    );
    println!("     Noise:    {:.5}", a.clarity.noise_floor);
    println!("     Signal:   {:.5}", a.clarity.signal_level);
    println!(
        "     SNR:      {} {}",
        format_snr(a.clarity.snr_db),
        verdict_label(a.clarity.verdict)
    );
    println!("     Energy:   {:.5}", a.clarity.total_energy);
    println!();
}

/// SNR in dB with one decimal, or "inf" for a silent noise window.
pub fn format_snr(snr_db: f32) -> String {
    if snr_db.is_infinite() && snr_db > 0.0 {
        "inf dB".into()
    } else {
        format!("{snr_db:.1} dB")
    }
}

fn verdict_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::Clear => format!("{}", style("(clear)").green()),
        Verdict::NoisyBackground => format!("{}", style("(noisy)").red()),
        Verdict::TooQuiet => format!("{}", style("(quiet)").yellow()),
    }
}
