use clap::{Parser, Subcommand};
use cli::SessionConfig;
use color_eyre::eyre::Result;
use contours::{ImageSequenceSource, Session};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track blobs through a directory of frames, one JSON report per line
    Track {
        /// Directory holding the frames, processed in file-name order
        #[arg(short, long)]
        input_dir: PathBuf,
        /// Session configuration (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write reports here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract the contours of one image to GeoJSON
    Extract {
        #[arg(short, long)]
        image: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        geojson: PathBuf,
    },
    /// Print the fitted quadrilateral of every contour in one image
    Quads {
        #[arg(short, long)]
        image: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the JSON schema of the session configuration
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Track { input_dir, config, output } => {
            track(input_dir, config.as_deref(), output.as_deref())?;
        }
        Commands::Extract { image, config, geojson } => {
            extract(image, config.as_deref(), geojson)?;
        }
        Commands::Quads { image, config } => {
            quads(image, config.as_deref())?;
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(SessionConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn track(input_dir: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let config = SessionConfig::from_optional_file(config)?;
    let source = ImageSequenceSource::open(input_dir)?;
    info!("Tracking {} files from {}", source.paths().len(), input_dir.display());

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut session = Session::new(config.pipeline(), source);
    let mut frames = 0usize;
    while let Some(report) = session.step()? {
        if report.blobs.is_empty() {
            warn!("Frame {} has no blobs", report.index);
        }
        serde_json::to_writer(&mut writer, &report)?;
        writeln!(writer)?;
        frames += 1;
    }
    writer.flush()?;

    info!("Processed {} frames", frames);
    Ok(())
}

fn extract(image: &Path, config: Option<&Path>, geojson: &Path) -> Result<()> {
    let config = SessionConfig::from_optional_file(config)?;
    let frame = image::open(image)?.to_luma8();

    let pipeline = config.pipeline();
    let found = pipeline.process(&frame)?;
    found.save_geojson(geojson)?;

    info!("Wrote {} contours to {}", found.len(), geojson.display());
    Ok(())
}

fn quads(image: &Path, config: Option<&Path>) -> Result<()> {
    let config = SessionConfig::from_optional_file(config)?;
    let frame = image::open(image)?.to_luma8();

    let pipeline = config.pipeline();
    let found = pipeline.process(&frame)?;
    for i in 0..found.len() {
        let fit = found.fit_quad_with_trace(i)?;
        if !fit.converged {
            warn!("Contour {} did not reduce to four corners", i);
        }
        println!("{}", serde_json::to_string(&fit.points)?);
    }

    info!("Fitted {} quads", found.len());
    Ok(())
}
