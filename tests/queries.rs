mod common;

use rusqlite::Connection;

use ewf_terminal::metric::Metric;
use ewf_terminal::queries::{Dataset, Fetch, QueryError};
use ewf_terminal::schema;

use common::{SEASON_CHAMPIONSHIP, SEASON_WSL, loaded_dataset};

#[test]
fn totals_are_sorted_descending_for_every_metric() {
    let loaded = loaded_dataset();
    for season in [SEASON_WSL, SEASON_CHAMPIONSHIP] {
        for metric in Metric::ALL {
            let fetch = loaded.dataset.team_totals_by_season(season, metric);
            let rows = fetch.rows();
            assert!(!rows.is_empty(), "{season} {metric} should have rows");
            for pair in rows.windows(2) {
                assert!(
                    pair[0].total >= pair[1].total,
                    "{season} {metric}: {:?} before {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }
}

#[test]
fn totals_sum_standings_per_team() {
    let loaded = loaded_dataset();
    let rows = loaded
        .dataset
        .team_totals_by_season(SEASON_WSL, Metric::Points)
        .into_rows();
    let pairs = rows
        .iter()
        .map(|r| (r.team_name.as_str(), r.total))
        .collect::<Vec<_>>();
    assert_eq!(pairs, vec![("Arsenal", 4.0), ("Chelsea", 3.0), ("Everton", 1.0)]);

    let gd = loaded
        .dataset
        .team_totals_by_season(SEASON_WSL, Metric::GoalDifference)
        .into_rows();
    assert_eq!(gd.last().map(|r| r.total), Some(-3.0));
    assert_eq!(gd[0].team_name, "Chelsea");
}

#[test]
fn unknown_season_is_no_data_not_an_error() {
    let loaded = loaded_dataset();
    for metric in Metric::ALL {
        assert!(matches!(
            loaded.dataset.team_totals_by_season("S-1900-1901-1", metric),
            Fetch::NoData
        ));
        assert!(matches!(
            loaded.dataset.match_series_by_season("S-1900-1901-1", metric),
            Fetch::NoData
        ));
    }
}

#[test]
fn series_is_ordered_by_date_then_team() {
    let loaded = loaded_dataset();
    let rows = loaded
        .dataset
        .match_series_by_season(SEASON_WSL, Metric::Wins)
        .into_rows();
    assert_eq!(rows.len(), 6);
    let keys = rows
        .iter()
        .map(|r| (r.date.clone(), r.team_name.clone()))
        .collect::<Vec<_>>();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let first = &rows[0];
    assert_eq!(first.date, "2019-09-07");
    assert_eq!(first.team_name, "Arsenal");
    assert_eq!(first.opponent_name, "Chelsea");
    assert_eq!(first.total, 1.0);
}

#[test]
fn series_uses_appearance_columns() {
    let loaded = loaded_dataset();
    let losses = loaded
        .dataset
        .match_series_by_season(SEASON_CHAMPIONSHIP, Metric::Losses)
        .into_rows();
    let durham = losses.iter().find(|r| r.team_name == "Durham").unwrap();
    assert_eq!(durham.total, 1.0);

    let gd = loaded
        .dataset
        .match_series_by_season(SEASON_CHAMPIONSHIP, Metric::GoalDifference)
        .into_rows();
    let totals = gd.iter().map(|r| r.total).collect::<Vec<_>>();
    assert_eq!(totals, vec![-2.0, 2.0]);
}

#[test]
fn same_day_fixtures_are_summed() {
    let conn = Connection::open_in_memory().unwrap();
    schema::ensure_schema(&conn).unwrap();
    for (match_id, opponent, goals) in [("M-a", "Bristol", 2), ("M-b", "Reading", 3)] {
        conn.execute(
            "INSERT INTO appearances (season_id, match_id, date, team_name, opponent_name, goals_for)
             VALUES ('S-2020-2021-1', ?1, '2020-10-04', 'Arsenal', ?2, ?3)",
            rusqlite::params![match_id, opponent, goals],
        )
        .unwrap();
    }
    let dataset = Dataset::new(conn);
    let rows = dataset
        .match_series_by_season("S-2020-2021-1", Metric::GoalsFor)
        .into_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total, 5.0);
}

#[test]
fn nameless_standings_rows_are_left_out() {
    let conn = Connection::open_in_memory().unwrap();
    schema::ensure_schema(&conn).unwrap();
    for (team, points) in [(Some("Arsenal"), 20), (None, 7), (None, 4)] {
        conn.execute(
            "INSERT INTO standings (season_id, team_name, points) VALUES ('S-2020-2021-1', ?1, ?2)",
            rusqlite::params![team, points],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO appearances (season_id, date, team_name, points) VALUES ('S-2020-2021-1', '2020-10-04', ?1, ?2)",
            rusqlite::params![team, points],
        )
        .unwrap();
    }
    let dataset = Dataset::new(conn);
    let totals = dataset
        .team_totals_by_season("S-2020-2021-1", Metric::Points)
        .into_rows();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].team_name, "Arsenal");
    assert_eq!(totals[0].total, 20.0);

    let series = dataset
        .match_series_by_season("S-2020-2021-1", Metric::Points)
        .into_rows();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].team_name, "Arsenal");
}

#[test]
fn missing_tables_fail_without_propagating() {
    let dataset = Dataset::new(Connection::open_in_memory().unwrap());
    let fetch = dataset.team_totals_by_season(SEASON_WSL, Metric::Points);
    assert!(matches!(fetch.error(), Some(QueryError::Sqlite(_))));
    assert!(fetch.rows().is_empty());
    assert!(dataset.list_season_ids().is_empty());
}

#[test]
fn team_names_follow_team_id_descending() {
    let loaded = loaded_dataset();
    let names = loaded.dataset.list_team_names().into_rows();
    assert_eq!(names, vec!["Lewes", "Durham", "Everton", "Chelsea", "Arsenal"]);
}

#[test]
fn metric_strings_outside_the_set_never_reach_sql() {
    assert!(matches!(
        Metric::parse("points) FROM standings; --"),
        Err(QueryError::UnknownMetric(_))
    ));
}
