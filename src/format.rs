//! Human-readable labels for season ids and metric keys.

/// `"league-2019-2020"` -> `"2019-2020 Season"`,
/// `"league-2019-2020-B"` -> `"2019-2020 Season B"`.
///
/// Ids with fewer than three parts are returned unchanged; an empty fourth
/// part counts as no qualifier.
pub fn format_season(season_id: &str) -> String {
    let parts = season_id.split('-').collect::<Vec<_>>();
    if parts.len() < 3 {
        return season_id.to_string();
    }
    let (start_year, end_year) = (parts[1], parts[2]);
    match parts.get(3).filter(|q| !q.is_empty()) {
        Some(qualifier) => format!("{start_year}-{end_year} Season {qualifier}"),
        None => format!("{start_year}-{end_year} Season"),
    }
}

/// `"goal_difference"` -> `"Goal Difference"`.
pub fn format_metric(metric: &str) -> String {
    title_case(&metric.replace('_', " "))
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
