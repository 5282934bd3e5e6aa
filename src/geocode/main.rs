//! Batch geocoder for ward spending reports.
//!
//! Reads the extracted `ward,item,location,cost` CSV, cleans up the records,
//! resolves every location through the configured geocoder chain and writes
//! a GeoJSON FeatureCollection.

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geojson::Feature;
use hashbrown::HashMap;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ward_geocode::config::Config;
use ward_geocode::geometry::{combine, ResolvedPiece};
use ward_geocode::models::record::year_from_file_name;
use ward_geocode::models::{LocationFormat, ProcessedRecord, SpendingRecord};
use ward_geocode::parse::classify_pieces;
use ward_geocode::{GeocoderChain, LocationGeocoder};

use crate::output::{record_feature, write_collection};

#[derive(Parser, Debug)]
#[command(name = "ward-geocode")]
#[command(about = "Geocode ward menu-money spending locations")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve every record's location and write GeoJSON
    Geocode {
        /// Spending CSV (ward,item,location,cost)
        #[arg(short, long)]
        input: PathBuf,

        /// GeoJSON file to write
        #[arg(short, long)]
        output: PathBuf,

        /// TOML config; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report year; taken from the input file name when omitted
        #[arg(long)]
        year: Option<u16>,

        /// Worker threads (0 = one per core)
        #[arg(long, default_value = "0")]
        threads: usize,
    },

    /// Print the format of every location piece, without geocoding
    Classify {
        /// Spending CSV (ward,item,location,cost)
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// How much of a record's location resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Outcome {
    Resolved,
    Partial,
    Unresolved,
    NoLocation,
}

impl Outcome {
    fn of(resolved: usize, total: usize) -> Self {
        match (resolved, total) {
            (_, 0) => Outcome::NoLocation,
            (0, _) => Outcome::Unresolved,
            (r, t) if r == t => Outcome::Resolved,
            _ => Outcome::Partial,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    match args.command {
        Command::Geocode {
            input,
            output,
            config,
            year,
            threads,
        } => geocode(&input, &output, config.as_deref(), year, threads),
        Command::Classify { input } => classify(&input),
    }
}

fn read_records(path: &Path) -> Result<Vec<SpendingRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<SpendingRecord>, _>>()
        .with_context(|| format!("Failed to read records from {}", path.display()))?;
    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

fn geocode(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    year: Option<u16>,
    threads: usize,
) -> Result<()> {
    let config = match config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let year = year.or_else(|| {
        input
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(year_from_file_name)
    });
    match year {
        Some(year) => info!("Report year: {}", year),
        None => warn!("No report year given or found in the file name"),
    }

    let records: Vec<ProcessedRecord> = read_records(input)?
        .into_iter()
        .map(|record| record.process(year))
        .collect();

    let chain = GeocoderChain::from_config(&config)?;
    if chain.is_empty() {
        anyhow::bail!("No geocoder backends configured");
    }
    let geocoder = LocationGeocoder::new(chain);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build worker pool")?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let results: Vec<(Outcome, Feature)> = pool.install(|| {
        records
            .par_iter()
            .map(|record| {
                let result = geocode_record(&geocoder, record);
                pb.inc(1);
                result
            })
            .collect::<Result<Vec<_>>>()
    })?;
    pb.finish_and_clear();

    let mut summary: HashMap<Outcome, usize> = HashMap::new();
    let features = results
        .into_iter()
        .map(|(outcome, feature)| {
            *summary.entry(outcome).or_insert(0) += 1;
            feature
        })
        .collect();

    write_collection(output, features)?;

    let count = |outcome: Outcome| summary.get(&outcome).copied().unwrap_or(0);
    info!(
        "Wrote {} features to {}: {} resolved, {} partial, {} unresolved, {} without location",
        records.len(),
        output.display(),
        count(Outcome::Resolved),
        count(Outcome::Partial),
        count(Outcome::Unresolved),
        count(Outcome::NoLocation)
    );
    Ok(())
}

fn geocode_record(
    geocoder: &LocationGeocoder<GeocoderChain>,
    record: &ProcessedRecord,
) -> Result<(Outcome, Feature)> {
    let pieces = geocoder.resolve_pieces(&record.location);
    let total = pieces.len();
    let formats: Vec<LocationFormat> = pieces.iter().map(|piece| piece.format).collect();
    let geometries: Vec<_> = pieces
        .into_iter()
        .filter_map(ResolvedPiece::into_geometry)
        .collect();

    let outcome = Outcome::of(geometries.len(), total);
    let geometry = combine(geometries);
    let feature = record_feature(record, &formats, geometry.as_ref())?;
    Ok((outcome, feature))
}

fn classify(input: &Path) -> Result<()> {
    let records = read_records(input)?;

    let mut counts: HashMap<LocationFormat, usize> = HashMap::new();
    for record in &records {
        for (piece, format) in classify_pieces(&record.location) {
            println!("{}\t{}\t{}", record.ward.trim(), format, piece);
            *counts.entry(format).or_insert(0) += 1;
        }
    }

    println!();
    for format in LocationFormat::PRIORITY
        .iter()
        .chain(std::iter::once(&LocationFormat::Unidentified))
    {
        println!(
            "{:<40}{}",
            format.as_str(),
            counts.get(format).copied().unwrap_or(0)
        );
    }
    Ok(())
}
