use criterion::{Criterion, criterion_group, criterion_main};
use rusqlite::{Connection, params};
use std::hint::black_box;

use ewf_terminal::format::{format_metric, format_season};
use ewf_terminal::metric::Metric;
use ewf_terminal::queries::Dataset;
use ewf_terminal::schema;

const SEASONS: usize = 12;
const TEAMS: usize = 12;

fn synthetic_dataset() -> Dataset {
    let mut conn = Connection::open_in_memory().expect("in-memory sqlite");
    schema::ensure_schema(&conn).expect("schema");
    let tx = conn.transaction().expect("tx");
    for season in 0..SEASONS {
        let season_id = format!("S-{}-{}-1", 2011 + season, 2012 + season);
        for team in 0..TEAMS {
            tx.execute(
                "INSERT INTO standings (season_id, team_id, team_name, wins, draws, losses, goals_for, goals_against, goal_difference, points)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    season_id,
                    format!("T-{team}"),
                    format!("Team {team}"),
                    (team % 7) as i64,
                    (team % 3) as i64,
                    (team % 5) as i64,
                    (team * 2) as i64,
                    (team + 3) as i64,
                    team as i64 - 3,
                    (team * 3) as i64,
                ],
            )
            .expect("insert standing");
        }
        for round in 0..(TEAMS * 2) {
            let date = format!("{}-{:02}-{:02}", 2011 + season, 1 + round % 12, 1 + round % 28);
            for team in 0..TEAMS {
                let gf = ((team + round) % 4) as i64;
                let ga = ((team * round) % 3) as i64;
                tx.execute(
                    "INSERT INTO appearances (season_id, match_id, date, team_name, opponent_name, goals_for, goals_against, goal_difference, win, draw, loss, points)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    params![
                        season_id,
                        format!("M-{season}-{round}-{}", team / 2),
                        date,
                        format!("Team {team}"),
                        format!("Team {}", (team + 1) % TEAMS),
                        gf,
                        ga,
                        gf - ga,
                        (gf > ga) as i64,
                        (gf == ga) as i64,
                        (gf < ga) as i64,
                        if gf > ga { 3 } else if gf == ga { 1 } else { 0 },
                    ],
                )
                .expect("insert appearance");
            }
        }
    }
    tx.commit().expect("commit");
    Dataset::new(conn)
}

fn bench_team_totals(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    c.bench_function("team_totals_by_season", |b| {
        b.iter(|| {
            for metric in Metric::ALL {
                let fetch = dataset.team_totals_by_season(black_box("S-2015-2016-1"), metric);
                black_box(fetch.rows().len());
            }
        })
    });
}

fn bench_match_series(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    c.bench_function("match_series_by_season", |b| {
        b.iter(|| {
            let fetch =
                dataset.match_series_by_season(black_box("S-2015-2016-1"), Metric::GoalsFor);
            black_box(fetch.rows().len());
        })
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("format_labels", |b| {
        b.iter(|| {
            black_box(format_season(black_box("S-2019-2020-2-N")));
            black_box(format_metric(black_box("goal_difference")));
        })
    });
}

criterion_group!(
    benches,
    bench_team_totals,
    bench_match_series,
    bench_formatting
);
criterion_main!(benches);
