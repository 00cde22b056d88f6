//! Lumen CLI entrypoint.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mimalloc::MiMalloc;

use lumen::{
    BackendConfig, Config, ScoreEngine, Summary, available_backends, create_backend, parse_device,
    write_csv,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(
    name = "lumen",
    version,
    about = "Aesthetic image scoring for directories of photos"
)]
struct Args {
    /// Directory of images to score.
    path: Option<PathBuf>,

    /// Scan subdirectories recursively.
    #[arg(short, long)]
    recursive: bool,

    /// Output CSV file.
    #[arg(short, long, default_value = "lumen_scores.csv")]
    output: PathBuf,

    /// Scoring backend (see --list-backends).
    #[arg(short = 'm', long)]
    backend: Option<String>,

    /// Images per batch.
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Device to run on (auto, cpu, cuda[:n], metal[:n]).
    #[arg(short, long)]
    device: Option<String>,

    /// Directory holding model weights.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// List available backends and exit.
    #[arg(long)]
    list_backends: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.list_backends {
        for name in available_backends() {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(root) = args.path else {
        anyhow::bail!("missing image directory (or pass --list-backends)");
    };

    let mut config = Config::from_env()?;
    if let Some(model_dir) = args.model_dir {
        config.model_dir = model_dir;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(device) = args.device.as_deref() {
        config.device = parse_device(device)?;
    }
    config.validate()?;

    let started = Instant::now();

    println!("Initializing {} backend...", config.backend);
    let backend_config = BackendConfig {
        model_dir: config.model_dir.clone(),
        device: config.device,
    };
    let backend = create_backend(&config.backend, &backend_config).with_context(|| {
        format!(
            "failed to initialize backend '{}' (weights are expected under {})",
            config.backend,
            config.model_dir.display()
        )
    })?;

    let engine = ScoreEngine::new(backend, config.batch_size)?;

    if args.recursive {
        println!("Scanning recursively in {}...", root.display());
    } else {
        println!("Scanning {}...", root.display());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(progress_style());
    let mut on_progress = |processed: usize, total: usize| {
        bar.set_length(total as u64);
        bar.set_position(processed as u64);
    };

    let results = engine.score_directory(&root, args.recursive, &mut on_progress)?;
    bar.finish_and_clear();

    if results.is_empty() {
        println!("No images found to process.");
        return Ok(());
    }

    write_csv(&results, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Results saved to {}", args.output.display());

    let summary = Summary::from_results(&results);
    println!(
        "Processed {} images in {:.2}s",
        summary.total,
        started.elapsed().as_secs_f64()
    );
    if summary.failures > 0 {
        println!("{} images could not be scored", summary.failures);
    }
    println!("Average aesthetic score: {:.2}", summary.average);

    println!("\nTop {} most aesthetic images:", summary.top.len());
    for entry in &summary.top {
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.path.display().to_string());
        println!("  {}: {:.2}", name, entry.score);
    }

    Ok(())
}

fn progress_style() -> ProgressStyle {
    match ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        Ok(style) => style.progress_chars("##-"),
        Err(_) => ProgressStyle::default_bar(),
    }
}
