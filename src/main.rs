use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use disease_map::{
    export, Config, FixedLocation, MapView, MarkerStore, Position, RestStore, SubmissionStatus,
};

/// Disease markers stored in a user-locs collection
#[derive(Parser)]
struct Cli {
    /// Settings file (defaults to ./disease-map.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Origin of the marker backend, overriding the settings file
    #[arg(long)]
    store_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every marker
    List,
    /// Submit a disease label at a position
    Add {
        /// Latitude of the report
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the report
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Disease label
        label: String,
    },
    /// Write all markers as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disease_map=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    if let Some(url) = args.store_url {
        config.store_url = url;
    }
    let store = RestStore::new(&config.store_url);

    match args.command {
        Command::List => {
            for marker in store.list_markers().await {
                println!(
                    "{}\t{},{}\t{}",
                    marker.id,
                    marker.position.latitude,
                    marker.position.longitude,
                    marker.popup_label()
                );
            }
        }
        Command::Add { lat, lon, label } => {
            let mut view = MapView::new();
            view.mount(&store, &FixedLocation::new(lat, lon)).await;
            view.set_label(label);

            let id = view.submit(&store).await.context("label is empty")?;
            let submission = view.submission(id).context("submission was not recorded")?;
            match &submission.status {
                SubmissionStatus::Failed(reason) => anyhow::bail!("submission failed: {}", reason),
                _ => {
                    let position = Position::new(lat, lon);
                    let marker = view
                        .markers()
                        .iter()
                        .find(|m| m.is_at(&position))
                        .context("marker missing after submission")?;
                    println!("{}\t{}", marker.id, marker.popup_label());
                }
            }
        }
        Command::Export { output } => {
            let markers = store.fetch_markers().await?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    export::write_csv(&markers, file)?;
                    eprintln!("wrote {} markers to {}", markers.len(), path.display());
                }
                None => export::write_csv(&markers, io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
