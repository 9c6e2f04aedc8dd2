use std::collections::HashMap;

use crate::format::{format_metric, format_season};
use crate::metric::Metric;
use crate::palette::{self, Rgb};
use crate::queries::{Dataset, Fetch, MatchPoint, TeamTotal};

pub const TITLE: &str = "England Women's Football League Stats (2011-2023)";
pub const SEASON_PLACEHOLDER: &str = "Select Season";
pub const SELECT_SEASON_MESSAGE: &str = "Select a season to view team stats.";
pub const NO_TOTALS_MESSAGE: &str = "No data found for the selected metric and season";
pub const NO_SERIES_MESSAGE: &str = "No data found for the selected season and metric.";
pub const DATA_SOURCE: &str = "Data Source: The English Women's Football (EWF) Database, May 2024, https://github.com/probjects/ewf-database";

/// Headroom added above the tallest value on both charts.
pub const Y_HEADROOM: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug)]
pub struct AppState {
    pub seasons: Vec<SeasonOption>,
    pub season_cursor: usize,
    pub selected_season: Option<String>,
    pub metric: Metric,
    pub totals: Fetch<TeamTotal>,
    pub series: Fetch<MatchPoint>,
    pub team_colors: HashMap<String, Rgb>,
    pub help_overlay: bool,
    needs_refresh: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            seasons: Vec::new(),
            season_cursor: 0,
            selected_season: None,
            metric: Metric::default(),
            totals: Fetch::NoData,
            series: Fetch::NoData,
            team_colors: HashMap::new(),
            help_overlay: false,
            needs_refresh: false,
        }
    }

    /// Fills the season selector and the per-team colour map.
    pub fn load_options(&mut self, dataset: &Dataset) {
        self.set_season_ids(dataset.list_season_ids().into_rows());
        self.set_team_names(dataset.list_team_names().into_rows());
    }

    pub fn set_season_ids(&mut self, mut ids: Vec<String>) {
        ids.sort();
        ids.dedup();
        self.seasons = ids
            .into_iter()
            .map(|id| SeasonOption {
                label: format_season(&id),
                id,
            })
            .collect();
        self.season_cursor = self.season_cursor.min(self.seasons.len().saturating_sub(1));
        if let Some(selected) = &self.selected_season
            && !self.seasons.iter().any(|s| &s.id == selected)
        {
            self.selected_season = None;
            self.needs_refresh = true;
        }
    }

    pub fn set_team_names(&mut self, names: Vec<String>) {
        let colors = palette::generate(names.len());
        self.team_colors = names.into_iter().zip(colors).collect();
    }

    pub fn team_color(&self, team_name: &str) -> Rgb {
        self.team_colors
            .get(team_name)
            .copied()
            .unwrap_or(Rgb(0xB0, 0xC4, 0xDE))
    }

    pub fn cursor_next(&mut self) {
        if self.seasons.is_empty() {
            return;
        }
        self.season_cursor = (self.season_cursor + 1).min(self.seasons.len() - 1);
    }

    pub fn cursor_prev(&mut self) {
        self.season_cursor = self.season_cursor.saturating_sub(1);
    }

    /// Selects the season under the cursor. Returns true when it changed.
    pub fn select_cursor(&mut self) -> bool {
        let Some(option) = self.seasons.get(self.season_cursor) else {
            return false;
        };
        if self.selected_season.as_deref() == Some(option.id.as_str()) {
            return false;
        }
        self.selected_season = Some(option.id.clone());
        self.needs_refresh = true;
        true
    }

    pub fn next_metric(&mut self) {
        self.set_metric(self.metric.next());
    }

    pub fn prev_metric(&mut self) {
        self.set_metric(self.metric.prev());
    }

    pub fn set_metric(&mut self, metric: Metric) {
        if self.metric != metric {
            self.metric = metric;
            self.needs_refresh = true;
        }
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Re-runs both chart queries for the current selection.
    pub fn refresh(&mut self, dataset: &Dataset) {
        self.needs_refresh = false;
        match &self.selected_season {
            Some(season_id) => {
                self.totals = dataset.team_totals_by_season(season_id, self.metric);
                self.series = dataset.match_series_by_season(season_id, self.metric);
            }
            None => {
                self.totals = Fetch::NoData;
                self.series = Fetch::NoData;
            }
        }
    }

    pub fn selected_label(&self) -> Option<String> {
        self.selected_season.as_deref().map(format_season)
    }

    pub fn metric_label(&self) -> String {
        format_metric(self.metric.key())
    }

    pub fn bar_title(&self) -> String {
        match self.selected_label() {
            Some(season) => format!("Total {} by Team in {season}", self.metric_label()),
            None => self.metric_label(),
        }
    }

    pub fn scatter_title(&self) -> String {
        match self.selected_label() {
            Some(season) => format!("{} Over Matches for {season}", self.metric_label()),
            None => self.metric_label(),
        }
    }

    /// Placeholder text for the bar chart, or None when there are rows to draw.
    pub fn totals_message(&self) -> Option<&'static str> {
        if self.selected_season.is_none() {
            Some(SELECT_SEASON_MESSAGE)
        } else if self.totals.is_empty() {
            Some(NO_TOTALS_MESSAGE)
        } else {
            None
        }
    }

    pub fn series_message(&self) -> Option<&'static str> {
        if self.selected_season.is_none() {
            Some(SELECT_SEASON_MESSAGE)
        } else if self.series.is_empty() {
            Some(NO_SERIES_MESSAGE)
        } else {
            None
        }
    }

    /// Upper y bound shared by both charts' layout rules.
    pub fn totals_y_max(&self) -> f64 {
        y_max(self.totals.rows().iter().map(|r| r.total))
    }

    pub fn series_y_max(&self) -> f64 {
        y_max(self.series.rows().iter().map(|r| r.total))
    }

    /// Zero unless some match total is negative (goal difference).
    pub fn series_y_min(&self) -> f64 {
        self.series.rows().iter().map(|r| r.total).fold(0.0, f64::min)
    }
}

fn y_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0_f64, f64::max) + Y_HEADROOM
}
