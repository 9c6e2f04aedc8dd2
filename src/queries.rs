use std::path::Path;

use rusqlite::{Connection, params};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::loader;
use crate::metric::Metric;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),
    #[error("sqlite query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Outcome of a read. `NoData` and `Failed` both render as an empty chart;
/// callers that care can tell them apart.
#[derive(Debug)]
pub enum Fetch<T> {
    Rows(Vec<T>),
    NoData,
    Failed(QueryError),
}

impl<T> Fetch<T> {
    pub fn rows(&self) -> &[T] {
        match self {
            Fetch::Rows(rows) => rows,
            Fetch::NoData | Fetch::Failed(_) => &[],
        }
    }

    pub fn into_rows(self) -> Vec<T> {
        match self {
            Fetch::Rows(rows) => rows,
            Fetch::NoData | Fetch::Failed(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            Fetch::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn settle(result: Result<Vec<T>, QueryError>, query: &'static str, season_id: &str) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => {
                warn!(query, season_id, "no data found");
                Fetch::NoData
            }
            Ok(rows) => {
                debug!(query, season_id, rows = rows.len(), "query ok");
                Fetch::Rows(rows)
            }
            Err(err) => {
                error!(query, season_id, "query failed: {err}");
                Fetch::Failed(err)
            }
        }
    }
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Fetch::NoData
    }
}

/// One bar: a team's summed standings metric for a season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTotal {
    pub team_name: String,
    pub total: f64,
}

/// One scatter point: a team's summed appearance metric on a match date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPoint {
    pub date: String,
    pub team_name: String,
    pub opponent_name: String,
    pub total: f64,
}

/// The long-lived read handle shared by every consumer.
pub struct Dataset {
    conn: Connection,
}

impl Dataset {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(loader::open_db(path)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn list_season_ids(&self) -> Fetch<String> {
        Fetch::settle(self.try_list_season_ids(), "list_season_ids", "*")
    }

    pub fn list_team_names(&self) -> Fetch<String> {
        Fetch::settle(self.try_list_team_names(), "list_team_names", "*")
    }

    pub fn team_totals_by_season(&self, season_id: &str, metric: Metric) -> Fetch<TeamTotal> {
        Fetch::settle(
            self.try_team_totals_by_season(season_id, metric),
            "team_totals_by_season",
            season_id,
        )
    }

    pub fn match_series_by_season(&self, season_id: &str, metric: Metric) -> Fetch<MatchPoint> {
        Fetch::settle(
            self.try_match_series_by_season(season_id, metric),
            "match_series_by_season",
            season_id,
        )
    }

    pub fn try_list_season_ids(&self) -> Result<Vec<String>, QueryError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT season_id FROM standings WHERE season_id IS NOT NULL",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn try_list_team_names(&self) -> Result<Vec<String>, QueryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT team_name
            FROM standings
            WHERE team_name IS NOT NULL
            GROUP BY team_name
            ORDER BY MAX(team_id) DESC
            "#,
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn try_team_totals_by_season(
        &self,
        season_id: &str,
        metric: Metric,
    ) -> Result<Vec<TeamTotal>, QueryError> {
        // Column comes from the closed `Metric` mapping, never from input.
        let sql = format!(
            r#"
            SELECT
                team_name,
                SUM({column}) AS total
            FROM standings
            WHERE season_id = ?1
              AND team_name IS NOT NULL
            GROUP BY team_name
            ORDER BY total DESC, team_name ASC
            "#,
            column = metric.standings_column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![season_id], |row| {
            Ok(TeamTotal {
                team_name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                total: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn try_match_series_by_season(
        &self,
        season_id: &str,
        metric: Metric,
    ) -> Result<Vec<MatchPoint>, QueryError> {
        let sql = format!(
            r#"
            SELECT
                date,
                team_name,
                opponent_name,
                SUM({column}) AS total
            FROM appearances
            WHERE season_id = ?1
              AND team_name IS NOT NULL
            GROUP BY date, team_name
            ORDER BY date, team_name
            "#,
            column = metric.appearances_column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![season_id], |row| {
            Ok(MatchPoint {
                date: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                team_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                opponent_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                total: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
