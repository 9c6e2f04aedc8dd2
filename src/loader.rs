use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, params_from_iter};
use tracing::{error, info, warn};

use crate::config::SourceFiles;
use crate::schema::{self, Table};

/// A parsed source record; empty fields become NULL.
pub type SourceRow = Vec<Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Loaded { rows: usize },
    /// Rows already present; nothing inserted.
    Skipped { existing: i64 },
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct TableLoad {
    pub table: Table,
    pub source: PathBuf,
    pub status: TableStatus,
}

#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub db_path: PathBuf,
    pub tables: Vec<TableLoad>,
}

impl LoadSummary {
    pub fn rows_inserted(&self) -> usize {
        self.tables
            .iter()
            .map(|t| match t.status {
                TableStatus::Loaded { rows } => rows,
                _ => 0,
            })
            .sum()
    }

    pub fn errors(&self) -> Vec<String> {
        self.tables
            .iter()
            .filter_map(|t| match &t.status {
                TableStatus::Failed { error } => Some(format!("{}: {error}", t.table.name())),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// The database file existed; population was not attempted.
    AlreadyPresent,
    Loaded(LoadSummary),
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create database dir {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    schema::ensure_schema(&conn)?;
    Ok(conn)
}

/// {absent -> create+load -> ready}. Only a failure to open or create the
/// database file is returned as an error; table failures land in the summary.
pub fn bootstrap(db_path: &Path, sources: &SourceFiles) -> Result<BootstrapOutcome> {
    if db_path.exists() {
        open_db(db_path)?;
        info!(db = %db_path.display(), "database present, skipping load");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    info!(db = %db_path.display(), "setting up database");
    let mut conn = open_db(db_path)?;
    let summary = populate_all(&mut conn, db_path.to_path_buf(), sources);
    info!(
        rows = summary.rows_inserted(),
        failed_tables = summary.errors().len(),
        "database setup complete"
    );
    Ok(BootstrapOutcome::Loaded(summary))
}

/// Loads each table independently. A table that already holds rows is left
/// untouched so a second run never duplicates data.
pub fn populate_all(conn: &mut Connection, db_path: PathBuf, sources: &SourceFiles) -> LoadSummary {
    let mut tables = Vec::with_capacity(Table::ALL.len());
    for table in Table::ALL {
        let source = source_for(sources, table).to_path_buf();
        let status = match populate_table(conn, table, &source) {
            Ok(status) => status,
            Err(err) => {
                error!(table = table.name(), source = %source.display(), "table load failed: {err:#}");
                TableStatus::Failed {
                    error: format!("{err:#}"),
                }
            }
        };
        tables.push(TableLoad {
            table,
            source,
            status,
        });
    }
    LoadSummary { db_path, tables }
}

fn populate_table(conn: &mut Connection, table: Table, source: &Path) -> Result<TableStatus> {
    let existing = schema::row_count(conn, table)?;
    if existing > 0 {
        warn!(table = table.name(), existing, "table already populated, skipping");
        return Ok(TableStatus::Skipped { existing });
    }
    let rows = load_from_source(conn, table, source)?;
    info!(table = table.name(), rows, "table loaded");
    Ok(TableStatus::Loaded { rows })
}

fn source_for(sources: &SourceFiles, table: Table) -> &Path {
    match table {
        Table::Matches => &sources.matches,
        Table::Appearances => &sources.appearances,
        Table::Standings => &sources.standings,
    }
}

/// Reads `csv_path` and inserts every record positionally in one transaction.
/// Nothing is written unless the whole file parses and inserts cleanly.
pub fn load_from_source(conn: &mut Connection, table: Table, csv_path: &Path) -> Result<usize> {
    let rows = read_source(table, csv_path)?;
    insert_rows(conn, table, &rows)
}

pub fn read_source(table: Table, csv_path: &Path) -> Result<Vec<SourceRow>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("open source file {}", csv_path.display()))?;
    read_rows(table, file).with_context(|| format!("read {}", csv_path.display()))
}

pub fn read_rows<R: std::io::Read>(table: Table, input: R) -> Result<Vec<SourceRow>> {
    let expected = table.source_columns().len();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let header_len = reader.headers().context("read header row")?.len();
    if header_len != expected {
        bail!(
            "header has {header_len} columns, {} expects {expected}",
            table.name()
        );
    }

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // +2: one-based, plus the header line.
        let line = idx + 2;
        let record = record.with_context(|| format!("malformed record at line {line}"))?;
        if record.len() != expected {
            return Err(anyhow!(
                "record at line {line} has {} fields, expected {expected}",
                record.len()
            ));
        }
        out.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(out)
}

pub fn insert_rows(conn: &mut Connection, table: Table, rows: &[SourceRow]) -> Result<usize> {
    let tx = conn.transaction().context("begin load transaction")?;
    {
        let mut stmt = tx
            .prepare(&table.insert_sql())
            .with_context(|| format!("prepare insert into {}", table.name()))?;
        for (idx, row) in rows.iter().enumerate() {
            stmt.execute(params_from_iter(row.iter()))
                .with_context(|| format!("insert row {} into {}", idx + 1, table.name()))?;
        }
    }
    tx.commit().context("commit load transaction")?;
    Ok(rows.len())
}
