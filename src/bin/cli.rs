//! CLI for scoring landmark files exported by a face-mesh detector.
//!
//! Usage:
//!   facial-harmony <landmarks.json>...                 # Human-readable output
//!   facial-harmony <landmarks.json> --json             # JSON output
//!   facial-harmony <landmarks.json> -o report.json     # Save to file
//!   facial-harmony <landmarks.json> --scheme dlib68 --weights weights.json

use std::path::PathBuf;

use clap::Parser;
use facial_harmony::{
    AnalysisSession, FaceMeasurements, HarmonyAnalyzer, JsonLandmarkFile, OverallResult, Scheme,
    Weights,
};
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "facial-harmony")]
#[command(author, version, about = "Facial harmony scoring from landmark files", long_about = None)]
struct Args {
    /// Landmark JSON files
    #[arg(required = true)]
    landmarks: Vec<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Landmark index scheme of the input (mediapipe, dlib68)
    #[arg(long, default_value = "mediapipe")]
    scheme: Scheme,

    /// JSON weight file with keys symmetry, proportion, fifths, eyeGap
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    scheme: String,
    weights: Weights,
    files: Vec<FileOutput>,
}

#[derive(Serialize)]
struct FileOutput {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<OverallResult>,
    /// Pixel distances behind the ratios
    #[serde(skip_serializing_if = "Option::is_none")]
    measurements: Option<FaceMeasurements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(false)` if any file failed to analyze.
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let weights = match &args.weights {
        Some(path) => {
            info!(path = %path.display(), "loading weights");
            Weights::load(path)?
        }
        None => Weights::DEFAULT,
    };
    debug!(?weights, "weights in effect");

    let analyzer = HarmonyAnalyzer::builder()
        .scheme(args.scheme)
        .weights(weights)
        .build()?;
    let session = AnalysisSession::new(JsonLandmarkFile, analyzer);

    let mut files = Vec::with_capacity(args.landmarks.len());
    let mut all_ok = true;

    for path in &args.landmarks {
        info!(path = %path.display(), "analyzing");
        let file = path.display().to_string();

        let outcome = session
            .analyze_with_landmarks(path)
            .and_then(|(landmarks, result)| {
                let measurements =
                    FaceMeasurements::from_landmarks(&landmarks, session.analyzer().registry())?;
                Ok((result, measurements))
            });

        match outcome {
            Ok((result, measurements)) => files.push(FileOutput {
                file,
                result: Some(result),
                measurements: Some(measurements),
                error: None,
            }),
            Err(e) => {
                error!(file = %file, error = %e, "analysis failed");
                all_ok = false;
                files.push(FileOutput {
                    file,
                    result: None,
                    measurements: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let output = Output {
        scheme: args.scheme.to_string(),
        weights,
        files,
    };

    // Generate output
    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    // Write output
    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        info!(path = %path.display(), "output written");
    } else {
        println!("{}", output_str);
    }

    Ok(all_ok)
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!("Scheme: {}\n", output.scheme));
    s.push_str(&format!(
        "Weights: symmetry {} / proportion {} / fifths {} / eye gap {}\n",
        output.weights.symmetry,
        output.weights.proportion,
        output.weights.fifths,
        output.weights.eye_gap
    ));

    for file in &output.files {
        s.push_str(&format!("\n--- {} ---\n", file.file));

        if let Some(err) = &file.error {
            s.push_str(&format!("Error: {}\n", err));
            continue;
        }

        if let Some(m) = &file.measurements {
            s.push_str("\nMeasurements (px):\n");
            s.push_str(&format!("  Face width:   {:.1}\n", m.face_width));
            s.push_str(&format!("  Face length:  {:.1}\n", m.face_length));
            s.push_str(&format!(
                "  Eye width:    {:.1} (L: {:.1}, R: {:.1})\n",
                m.average_eye_width(),
                m.left_eye_width,
                m.right_eye_width
            ));
            s.push_str(&format!("  Inner gap:    {:.1}\n", m.inner_eye_gap));
        }

        if let Some(r) = &file.result {
            s.push_str("\nScores:\n");
            s.push_str(&format!(
                "  Symmetry:   {:>5.1}  (error {:.4})\n",
                r.symmetry.score, r.symmetry.raw
            ));
            s.push_str(&format!(
                "  Proportion: {:>5.1}  (ratio {:.3}, ideal 1.618)\n",
                r.proportion.score, r.proportion.raw
            ));
            s.push_str(&format!(
                "  Fifths:     {:>5.1}  (ratio {:.2}, ideal 5)\n",
                r.fifths.score, r.fifths.raw
            ));
            s.push_str(&format!(
                "  Eye gap:    {:>5.1}  (ratio {:.2}, ideal 1)\n",
                r.eye_gap.score, r.eye_gap.raw
            ));
            s.push_str(&format!("\nOverall: {:.1}\n", r.overall));
        }
    }

    s
}
