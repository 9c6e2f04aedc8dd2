use anyhow::{Context, Result, anyhow};
use serde_json::json;

use ewf_terminal::config::{AppConfig, arg_value};
use ewf_terminal::format::{format_metric, format_season};
use ewf_terminal::loader;
use ewf_terminal::metric::Metric;
use ewf_terminal::queries::{Dataset, Fetch};

/// Prints query results as JSON.
///
/// ewf_query seasons
/// ewf_query totals --season S-2019-2020-1 --metric points
/// ewf_query series --season S-2019-2020-1 --metric goal_difference
fn main() -> Result<()> {
    ewf_terminal::logging::init_stderr();
    let config = AppConfig::load();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .unwrap_or("seasons");

    loader::bootstrap(&config.db_path, &config.sources())?;
    let dataset = Dataset::open(&config.db_path)?;

    let value = match command {
        "seasons" => {
            let mut ids = fetch_or_empty(dataset.list_season_ids());
            ids.sort();
            let seasons = ids
                .iter()
                .map(|id| json!({ "season_id": id, "label": format_season(id) }))
                .collect::<Vec<_>>();
            json!({ "seasons": seasons })
        }
        "teams" => json!({ "teams": fetch_or_empty(dataset.list_team_names()) }),
        "totals" | "series" => {
            let season_id = arg_value(&args, "--season").context("--season is required")?;
            let metric = match arg_value(&args, "--metric") {
                Some(raw) => Metric::parse(&raw)?,
                None => Metric::default(),
            };
            let rows = if command == "totals" {
                serde_json::to_value(fetch_or_empty(
                    dataset.team_totals_by_season(&season_id, metric),
                ))?
            } else {
                serde_json::to_value(fetch_or_empty(
                    dataset.match_series_by_season(&season_id, metric),
                ))?
            };
            json!({
                "season_id": season_id,
                "season": format_season(&season_id),
                "metric": metric,
                "metric_label": format_metric(metric.key()),
                "rows": rows,
            })
        }
        other => return Err(anyhow!("unknown command `{other}`")),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn fetch_or_empty<T>(fetch: Fetch<T>) -> Vec<T> {
    if let Some(err) = fetch.error() {
        eprintln!("query failed: {err}");
    }
    fetch.into_rows()
}
