use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fisco_data::{CnaeLoader, ScheduleLoader};

/// Validate rate schedule and CNAE directory CSV files.
///
/// The schedules CSV should have the columns: year, table
/// (anexo-i..anexo-v, inss, irrf), lower, upper (empty for unbounded),
/// rate, deduction, cap (empty except on capped tables).
///
/// The CNAE CSV should have the columns: codigo, descricao, anexo (I..V),
/// fator_r (true/false).
#[derive(Parser, Debug)]
#[command(name = "fisco-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the rate schedules CSV file
    #[arg(short, long)]
    schedules: PathBuf,

    /// Path to the CNAE directory CSV file
    #[arg(short, long)]
    cnae: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading schedules from: {}", args.schedules.display());

    let file = File::open(&args.schedules)
        .with_context(|| format!("Failed to open: {}", args.schedules.display()))?;
    let records = ScheduleLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.schedules.display()))?;

    println!("Parsed {} bracket records", records.len());

    let schedules = ScheduleLoader::build(&records).context("Failed to build schedules")?;

    let years: BTreeSet<i32> = schedules.keys().map(|(year, _)| *year).collect();
    for year in years {
        let mut tables: Vec<&str> = schedules
            .iter()
            .filter(|((y, _), _)| *y == year)
            .map(|((_, table), _)| table.as_str())
            .collect();
        tables.sort_unstable();
        println!("  {year}: {} tables ({})", tables.len(), tables.join(", "));
    }

    if let Some(cnae_path) = &args.cnae {
        println!("Loading CNAE directory from: {}", cnae_path.display());

        let file = File::open(cnae_path)
            .with_context(|| format!("Failed to open: {}", cnae_path.display()))?;
        let records = CnaeLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", cnae_path.display()))?;
        let directory = CnaeLoader::directory(&records).context("Failed to build directory")?;

        println!("Loaded {} CNAE entries", directory.len());
    }

    println!("All files are valid.");

    Ok(())
}
