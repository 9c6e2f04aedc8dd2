use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::queries::QueryError;

/// The fixed set of statistics a user can chart. Column names used in SQL
/// come only from the mappings below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Points,
    Wins,
    Draws,
    Losses,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Points,
        Metric::Wins,
        Metric::Draws,
        Metric::Losses,
        Metric::GoalsFor,
        Metric::GoalsAgainst,
        Metric::GoalDifference,
    ];

    pub fn key(self) -> &'static str {
        self.standings_column()
    }

    pub fn standings_column(self) -> &'static str {
        match self {
            Metric::Points => "points",
            Metric::Wins => "wins",
            Metric::Draws => "draws",
            Metric::Losses => "losses",
            Metric::GoalsFor => "goals_for",
            Metric::GoalsAgainst => "goals_against",
            Metric::GoalDifference => "goal_difference",
        }
    }

    /// Appearance rows carry per-match flags (`win`, `draw`, `loss`) rather
    /// than season counts.
    pub fn appearances_column(self) -> &'static str {
        match self {
            Metric::Points => "points",
            Metric::Wins => "win",
            Metric::Draws => "draw",
            Metric::Losses => "loss",
            Metric::GoalsFor => "goals_for",
            Metric::GoalsAgainst => "goals_against",
            Metric::GoalDifference => "goal_difference",
        }
    }

    /// Accepts either the standings key or the appearance column name.
    pub fn parse(raw: &str) -> Result<Metric, QueryError> {
        let key = raw.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.standings_column() == key || m.appearances_column() == key)
            .ok_or_else(|| QueryError::UnknownMetric(raw.to_string()))
    }

    pub fn index(self) -> usize {
        Metric::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    pub fn next(self) -> Metric {
        Metric::ALL[(self.index() + 1) % Metric::ALL.len()]
    }

    pub fn prev(self) -> Metric {
        let len = Metric::ALL.len();
        Metric::ALL[(self.index() + len - 1) % len]
    }
}

impl FromStr for Metric {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::parse(s)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
