use std::collections::HashMap;
use std::io::Read;

use fisco_core::StaticCnaeDirectory;
use fisco_core::models::{
    Anexo, CnaeEntry, RateBracket, RateSchedule, ScheduleError, ScheduleKind,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading rate schedule data.
#[derive(Debug, Error)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown table code '{0}' (expected anexo-i..anexo-v, inss or irrf)")]
    UnknownTable(String),

    #[error("table '{table}' for {year} is malformed: {source}")]
    InvalidSchedule {
        year: i32,
        table: String,
        source: ScheduleError,
    },
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// Maps a CSV table code to the algorithm its schedule expects.
fn table_kind(table: &str) -> Result<ScheduleKind, ScheduleLoaderError> {
    match table {
        "anexo-i" | "anexo-ii" | "anexo-iii" | "anexo-iv" | "anexo-v" => Ok(ScheduleKind::Smoothed),
        "inss" => Ok(ScheduleKind::Cumulative),
        "irrf" => Ok(ScheduleKind::SingleBand),
        _ => Err(ScheduleLoaderError::UnknownTable(table.to_string())),
    }
}

/// A single record from a rate schedule CSV file.
///
/// Columns:
/// - `year`: fiscal year the bracket belongs to
/// - `table`: table code (anexo-i..anexo-v, inss, irrf)
/// - `lower`: bracket lower bound
/// - `upper`: bracket upper bound (empty for an unbounded final bracket)
/// - `rate`: nominal rate as a decimal (e.g. 0.073 for 7.3%)
/// - `deduction`: fixed deduction for the bracket
/// - `cap`: schedule-wide clamp, set on at most one row per table (the
///   INSS contribution cap); empty elsewhere
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    pub year: i32,
    pub table: String,
    pub lower: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub cap: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for rate schedule data from CSV files.
///
/// Parsing and building are separate steps so a caller can inspect or
/// filter the raw records (e.g. keep only one year) before materializing
/// validated schedules.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse schedule records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScheduleRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            // Fail fast on table codes the build step would reject anyway.
            table_kind(&record.table)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by `(year, table)` and builds validated schedules.
    ///
    /// Brackets are sorted by lower bound before validation, so record
    /// order in the file does not matter. Any invariant violation (gap,
    /// overlap, misordered bounds) is reported with the offending table's
    /// name and year.
    pub fn build(
        records: &[ScheduleRecord]
    ) -> Result<HashMap<(i32, String), RateSchedule>, ScheduleLoaderError> {
        let mut groups: HashMap<(i32, String), Vec<&ScheduleRecord>> = HashMap::new();
        for record in records {
            groups
                .entry((record.year, record.table.clone()))
                .or_default()
                .push(record);
        }

        let mut schedules = HashMap::new();
        for ((year, table), group) in groups {
            let kind = table_kind(&table)?;
            let cap = group.iter().find_map(|record| record.cap);

            let mut brackets: Vec<RateBracket> = group
                .iter()
                .map(|record| RateBracket {
                    lower: record.lower,
                    upper: record.upper,
                    rate: record.rate,
                    deduction: record.deduction,
                })
                .collect();
            brackets.sort_by(|a, b| a.lower.cmp(&b.lower));

            let schedule = RateSchedule {
                year,
                kind,
                brackets,
                cap,
            };
            schedule
                .validate()
                .map_err(|source| ScheduleLoaderError::InvalidSchedule {
                    year,
                    table: table.clone(),
                    source,
                })?;

            schedules.insert((year, table), schedule);
        }

        Ok(schedules)
    }
}

/// Errors that can occur when loading CNAE directory data.
#[derive(Debug, Error)]
pub enum CnaeLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown annex '{anexo}' for CNAE {codigo}")]
    UnknownAnnex { codigo: String, anexo: String },
}

impl From<csv::Error> for CnaeLoaderError {
    fn from(err: csv::Error) -> Self {
        CnaeLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a CNAE directory CSV file.
///
/// Columns: `codigo`, `descricao`, `anexo` (I..V), `fator_r` (true/false).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CnaeRecord {
    pub codigo: String,
    pub descricao: String,
    pub anexo: String,
    pub fator_r: bool,
}

/// Loader for CNAE directory data from CSV files.
pub struct CnaeLoader;

impl CnaeLoader {
    /// Parse CNAE records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CnaeRecord>, CnaeLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: CnaeRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Converts parsed records into directory entries.
    pub fn entries(records: &[CnaeRecord]) -> Result<Vec<CnaeEntry>, CnaeLoaderError> {
        records
            .iter()
            .map(|record| {
                let anexo = Anexo::parse(&record.anexo).ok_or_else(|| {
                    CnaeLoaderError::UnknownAnnex {
                        codigo: record.codigo.clone(),
                        anexo: record.anexo.clone(),
                    }
                })?;
                Ok(CnaeEntry {
                    codigo: record.codigo.clone(),
                    descricao: record.descricao.clone(),
                    anexo,
                    fator_r: record.fator_r,
                })
            })
            .collect()
    }

    /// Builds an in-memory directory straight from parsed records.
    pub fn directory(records: &[CnaeRecord]) -> Result<StaticCnaeDirectory, CnaeLoaderError> {
        Ok(StaticCnaeDirectory::new(Self::entries(records)?))
    }
}
