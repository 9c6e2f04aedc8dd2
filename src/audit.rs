use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairProblem {
    /// A match without exactly one home and one away appearance.
    WrongCount { match_id: String, found: usize },
    /// Goals for one side differ from goals against the other.
    NotMirrored { match_id: String },
    /// An appearance whose match_id is missing from matches.
    Orphan { match_id: String },
}

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub matches_checked: usize,
    pub problems: Vec<PairProblem>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

type Goals = (Option<i64>, Option<i64>);

/// Read-only check that every match has two appearances with mirrored goals.
pub fn appearance_pairs(conn: &Connection) -> Result<AuditReport> {
    let match_ids = {
        let mut stmt = conn
            .prepare("SELECT match_id FROM matches WHERE match_id IS NOT NULL ORDER BY match_id")
            .context("prepare match id query")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query match ids")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode match id")?);
        }
        out
    };

    let mut by_match: BTreeMap<String, Vec<Goals>> = BTreeMap::new();
    {
        let mut stmt = conn
            .prepare(
                "SELECT match_id, goals_for, goals_against FROM appearances WHERE match_id IS NOT NULL",
            )
            .context("prepare appearance query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    (row.get::<_, Option<i64>>(1)?, row.get::<_, Option<i64>>(2)?),
                ))
            })
            .context("query appearances")?;
        for row in rows {
            let (match_id, goals) = row.context("decode appearance row")?;
            by_match.entry(match_id).or_default().push(goals);
        }
    }

    let known = match_ids.iter().map(String::as_str).collect::<HashSet<_>>();
    let mut problems = Vec::new();
    for match_id in &match_ids {
        let sides = by_match.get(match_id).map(Vec::as_slice).unwrap_or(&[]);
        if sides.len() != 2 {
            problems.push(PairProblem::WrongCount {
                match_id: match_id.clone(),
                found: sides.len(),
            });
            continue;
        }
        let ((a_for, a_against), (b_for, b_against)) = (sides[0], sides[1]);
        if a_for != b_against || a_against != b_for {
            problems.push(PairProblem::NotMirrored {
                match_id: match_id.clone(),
            });
        }
    }
    for match_id in by_match.keys() {
        if !known.contains(match_id.as_str()) {
            problems.push(PairProblem::Orphan {
                match_id: match_id.clone(),
            });
        }
    }

    Ok(AuditReport {
        matches_checked: match_ids.len(),
        problems,
    })
}
