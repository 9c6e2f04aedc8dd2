use anyhow::{Context, Result};
use rusqlite::Connection;

/// One of the three tables populated from a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Matches,
    Appearances,
    Standings,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Matches, Table::Appearances, Table::Standings];

    pub fn name(self) -> &'static str {
        match self {
            Table::Matches => "matches",
            Table::Appearances => "appearances",
            Table::Standings => "standings",
        }
    }

    /// Column order of the source file, which is also the insert order.
    pub fn source_columns(self) -> &'static [&'static str] {
        match self {
            Table::Matches => MATCH_COLUMNS,
            Table::Appearances => APPEARANCE_COLUMNS,
            Table::Standings => STANDING_COLUMNS,
        }
    }

    pub fn insert_sql(self) -> String {
        let columns = self.source_columns();
        let placeholders = (1..=columns.len())
            .map(|idx| format!("?{idx}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name(),
            columns.join(", "),
            placeholders
        )
    }
}

// The matches file leads with the season columns; match_id is fifth.
const MATCH_COLUMNS: &[&str] = &[
    "season_id",
    "season",
    "tier",
    "division",
    "match_id",
    "match_name",
    "date",
    "attendance",
    "home_team_id",
    "home_team_name",
    "away_team_id",
    "away_team_name",
    "score",
    "home_team_score",
    "away_team_score",
    "home_team_score_margin",
    "away_team_score_margin",
    "home_team_win",
    "away_team_win",
    "draw",
    "result",
    "note",
];

const APPEARANCE_COLUMNS: &[&str] = &[
    "season_id",
    "season",
    "tier",
    "division",
    "match_id",
    "match_name",
    "date",
    "attendance",
    "team_id",
    "team_name",
    "opponent_id",
    "opponent_name",
    "home_team",
    "away_team",
    "goals_for",
    "goals_against",
    "goal_difference",
    "result",
    "win",
    "loss",
    "draw",
    "note",
    "points",
];

const STANDING_COLUMNS: &[&str] = &[
    "season_id",
    "season",
    "tier",
    "division",
    "position",
    "team_id",
    "team_name",
    "played",
    "wins",
    "draws",
    "losses",
    "goals_for",
    "goals_against",
    "goal_difference",
    "points",
    "point_adjustment",
    "season_outcome",
];

/// Creates the three tables when absent. Safe to call on a populated file.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS matches (
            match_id TEXT PRIMARY KEY NOT NULL,
            season_id TEXT,
            season TEXT,
            tier INTEGER,
            division TEXT,
            match_name TEXT,
            date TEXT,
            attendance INTEGER,
            home_team_id TEXT,
            home_team_name TEXT,
            away_team_id TEXT,
            away_team_name TEXT,
            score TEXT,
            home_team_score INTEGER,
            away_team_score INTEGER,
            home_team_score_margin INTEGER,
            away_team_score_margin INTEGER,
            home_team_win INTEGER,
            away_team_win INTEGER,
            draw INTEGER,
            result TEXT,
            note TEXT
        );

        CREATE TABLE IF NOT EXISTS appearances (
            season_id TEXT,
            season TEXT,
            tier INTEGER,
            division TEXT,
            match_id TEXT,
            match_name TEXT,
            date TEXT,
            attendance INTEGER,
            team_id TEXT,
            team_name TEXT,
            opponent_id TEXT,
            opponent_name TEXT,
            home_team TEXT,
            away_team TEXT,
            goals_for INTEGER,
            goals_against INTEGER,
            goal_difference INTEGER,
            result TEXT,
            win INTEGER,
            loss INTEGER,
            draw INTEGER,
            note TEXT,
            points INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_appearances_season ON appearances(season_id);
        CREATE INDEX IF NOT EXISTS idx_appearances_match ON appearances(match_id);

        CREATE TABLE IF NOT EXISTS standings (
            season_id TEXT,
            season TEXT,
            tier INTEGER,
            division TEXT,
            position TEXT,
            team_id TEXT,
            team_name TEXT,
            played INTEGER,
            wins INTEGER,
            draws INTEGER,
            losses INTEGER,
            goals_for INTEGER,
            goals_against INTEGER,
            goal_difference INTEGER,
            points INTEGER,
            point_adjustment INTEGER,
            season_outcome TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_standings_season ON standings(season_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn row_count(conn: &Connection, table: Table) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    conn.query_row(&sql, [], |row| row.get::<_, i64>(0))
        .with_context(|| format!("count rows in {}", table.name()))
}
