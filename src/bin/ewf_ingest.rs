use anyhow::Result;

use ewf_terminal::audit;
use ewf_terminal::config::{AppConfig, has_flag};
use ewf_terminal::loader::{self, BootstrapOutcome, LoadSummary, TableStatus};
use ewf_terminal::logging;

fn main() -> Result<()> {
    logging::init_stderr();
    let config = AppConfig::load();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let sources = config.sources();

    let summary = if has_flag(&args, "--force") {
        let mut conn = loader::open_db(&config.db_path)?;
        Some(loader::populate_all(
            &mut conn,
            config.db_path.clone(),
            &sources,
        ))
    } else {
        match loader::bootstrap(&config.db_path, &sources)? {
            BootstrapOutcome::Loaded(summary) => Some(summary),
            BootstrapOutcome::AlreadyPresent => None,
        }
    };

    match &summary {
        Some(summary) => print_summary(summary),
        None => {
            println!("DB: {}", config.db_path.display());
            println!("Database already present; nothing loaded (use --force to fill empty tables)");
        }
    }

    if has_flag(&args, "--audit") {
        let conn = loader::open_db(&config.db_path)?;
        let report = audit::appearance_pairs(&conn)?;
        println!(
            "Audit: {} matches checked, {} problems",
            report.matches_checked,
            report.problems.len()
        );
        for problem in report.problems.iter().take(10) {
            println!(" - {problem:?}");
        }
    }

    Ok(())
}

fn print_summary(summary: &LoadSummary) {
    println!("EWF load complete");
    println!("DB: {}", summary.db_path.display());
    for item in &summary.tables {
        let status = match &item.status {
            TableStatus::Loaded { rows } => format!("loaded {rows} rows"),
            TableStatus::Skipped { existing } => format!("skipped ({existing} rows present)"),
            TableStatus::Failed { error } => format!("FAILED: {error}"),
        };
        println!(
            "{:<12} {} <- {}",
            item.table.name(),
            status,
            item.source.display()
        );
    }
    println!("Rows inserted: {}", summary.rows_inserted());
}
