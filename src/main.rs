use std::collections::BTreeMap;
use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset as ChartDataset,
    GraphType, Paragraph, Tabs,
};
use tracing::{info, warn};

use ewf_terminal::config::AppConfig;
use ewf_terminal::format::format_metric;
use ewf_terminal::loader::{self, BootstrapOutcome};
use ewf_terminal::logging;
use ewf_terminal::metric::Metric;
use ewf_terminal::queries::{Dataset, MatchPoint};
use ewf_terminal::state::{
    AppState, DATA_SOURCE, NO_SERIES_MESSAGE, SEASON_PLACEHOLDER, TITLE,
};

struct App {
    state: AppState,
    dataset: Dataset,
    should_quit: bool,
}

impl App {
    fn new(dataset: Dataset) -> Self {
        let mut state = AppState::new();
        state.load_options(&dataset);
        Self {
            state,
            dataset,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.cursor_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.cursor_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.state.select_cursor();
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => self.state.next_metric(),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => self.state.prev_metric(),
            KeyCode::Char(c @ '1'..='7') => {
                let idx = (c as usize) - ('1' as usize);
                self.state.set_metric(Metric::ALL[idx]);
            }
            KeyCode::Char('r') => self.state.load_options(&self.dataset),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load();
    logging::init_file(&config.log_path)?;

    if let BootstrapOutcome::Loaded(summary) =
        loader::bootstrap(&config.db_path, &config.sources())?
    {
        info!(
            rows = summary.rows_inserted(),
            failed_tables = summary.errors().len(),
            "first run load finished"
        );
    }
    let dataset = Dataset::open(&config.db_path)?;
    let mut app = App::new(dataset);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        if app.state.needs_refresh() {
            app.state.refresh(&app.dataset);
        }

        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(chunks[1]);

    render_season_select(frame, body[0], state);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(1),
        ])
        .split(body[1]);

    render_metric_tabs(frame, charts[0], state);
    render_bar_chart(frame, charts[1], state);
    render_scatter_chart(frame, charts[2], state);

    let footer = Paragraph::new(footer_text())
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let season = state
        .selected_label()
        .unwrap_or_else(|| SEASON_PLACEHOLDER.to_string());
    let line1 = format!("  {}", TITLE);
    let line2 = format!("  {season} | {}", state.metric_label());
    format!("{line1}\n{line2}")
}

fn footer_text() -> String {
    let keys = "j/k/↑/↓ Season | Enter Select | h/l/Tab Metric | 1-7 Metric | r Reload | ? Help | q Quit";
    format!("{keys}\n{}", DATA_SOURCE)
}

fn render_season_select(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Season").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }
    if state.seasons.is_empty() {
        let empty = Paragraph::new("No seasons loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.season_cursor, state.seasons.len(), visible);
    let lines = state.seasons[start..end]
        .iter()
        .enumerate()
        .map(|(offset, option)| {
            let idx = start + offset;
            let cursor = if idx == state.season_cursor { ">" } else { " " };
            let active = state.selected_season.as_deref() == Some(option.id.as_str());
            let marker = if active { "*" } else { " " };
            let mut style = Style::default();
            if idx == state.season_cursor {
                style = style.fg(Color::White).bg(Color::DarkGray);
            }
            if active {
                style = style.add_modifier(Modifier::BOLD);
            }
            Line::styled(format!("{cursor}{marker} {}", option.label), style)
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_metric_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let titles = Metric::ALL
        .iter()
        .map(|m| format_metric(m.key()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(state.metric.index())
        .block(Block::default().title("Metric").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, area);
}

fn render_bar_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(state.bar_title())
        .borders(Borders::ALL);

    if let Some(message) = state.totals_message() {
        render_placeholder(frame, area, block, message);
        return;
    }

    let rows = state.totals.rows();
    let inner_width = block.inner(area).width as usize;
    let bar_gap = 1usize;
    let bar_width = (inner_width / rows.len().max(1))
        .saturating_sub(bar_gap)
        .clamp(1, 12);

    // Bars cannot go below zero; the text keeps the signed value.
    let bars = rows
        .iter()
        .map(|row| {
            Bar::default()
                .value(row.total.max(0.0).round() as u64)
                .text_value(format_total(row.total))
                .label(Line::from(row.team_name.clone()))
                .style(Style::default().fg(state.team_color(&row.team_name).into()))
        })
        .collect::<Vec<_>>();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width as u16)
        .bar_gap(bar_gap as u16)
        .max(state.totals_y_max().ceil() as u64);
    frame.render_widget(chart, area);
}

fn render_scatter_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(state.scatter_title())
        .borders(Borders::ALL);

    if let Some(message) = state.series_message() {
        render_placeholder(frame, area, block, message);
        return;
    }

    let by_team = scatter_points(state.series.rows());
    if by_team.is_empty() {
        render_placeholder(frame, area, block, NO_SERIES_MESSAGE);
        return;
    }
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    for &(x, _) in by_team.values().flatten() {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
    }
    if x_max - x_min < 1.0 {
        x_min -= 1.0;
        x_max += 1.0;
    }

    let datasets = by_team
        .iter()
        .map(|(team, points)| {
            ChartDataset::default()
                .name(team.to_string())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(state.team_color(team).into()))
                .data(points)
        })
        .collect::<Vec<_>>();

    let y_min = state.series_y_min();
    let y_max = state.series_y_max();
    let x_labels = [x_min, (x_min + x_max) / 2.0, x_max]
        .into_iter()
        .map(|x| Span::raw(x_to_date_label(x)))
        .collect::<Vec<_>>();
    let y_labels = [y_min, (y_min + y_max) / 2.0, y_max]
        .into_iter()
        .map(|y| Span::raw(format_total(y)))
        .collect::<Vec<_>>();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(state.metric_label())
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn render_placeholder(frame: &mut Frame, area: Rect, block: Block, message: &str) {
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn format_total(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Match dates map to day numbers so they can sit on a numeric axis.
/// Groups series rows into per-team `(day, total)` points. Rows whose date
/// does not parse are logged and left out.
fn scatter_points(rows: &[MatchPoint]) -> BTreeMap<&str, Vec<(f64, f64)>> {
    let mut by_team: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for point in rows {
        let Some(x) = date_to_x(&point.date) else {
            warn!(
                date = %point.date,
                team = %point.team_name,
                "skipping scatter point with unparsable date"
            );
            continue;
        };
        by_team
            .entry(point.team_name.as_str())
            .or_default()
            .push((x, point.total));
    }
    by_team
}

fn date_to_x(raw: &str) -> Option<f64> {
    let date = NaiveDate::parse_from_str(raw.trim().get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.num_days_from_ce() as f64)
}

fn x_to_date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "EWF Terminal - Help",
        "",
        "Season:",
        "  j/k or ↑/↓   Move cursor",
        "  Enter/Space  Select season",
        "",
        "Metric:",
        "  h/l or ←/→   Previous/next metric",
        "  Tab          Next metric",
        "  1-7          Jump to metric",
        "",
        "  r            Reload season list",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_round_trip_through_axis() {
        let x = date_to_x("2019-09-07").unwrap();
        assert_eq!(x_to_date_label(x), "2019-09-07");
        assert_eq!(date_to_x("2019-09-07 15:00"), Some(x));
        assert_eq!(date_to_x("n/a"), None);
    }

    #[test]
    fn scatter_points_leave_out_bad_dates() {
        let point = |date: &str, team: &str, total: f64| MatchPoint {
            date: date.to_string(),
            team_name: team.to_string(),
            opponent_name: "Chelsea".to_string(),
            total,
        };
        let rows = vec![
            point("2019-09-07", "Arsenal", 2.0),
            point("", "Arsenal", 9.0),
            point("not a date", "Everton", 1.0),
            point("2019-09-14", "Arsenal", 3.0),
        ];
        let by_team = scatter_points(&rows);
        assert_eq!(by_team.keys().copied().collect::<Vec<_>>(), vec!["Arsenal"]);
        let totals = by_team["Arsenal"].iter().map(|&(_, y)| y).collect::<Vec<_>>();
        assert_eq!(totals, vec![2.0, 3.0]);
        assert!(scatter_points(&rows[1..3]).is_empty());
    }

    #[test]
    fn totals_drop_trailing_zero() {
        assert_eq!(format_total(12.0), "12");
        assert_eq!(format_total(-3.0), "-3");
        assert_eq!(format_total(2.5), "2.5");
    }

    #[test]
    fn visible_range_keeps_cursor_in_view() {
        assert_eq!(visible_range(0, 3, 10), (0, 3));
        assert_eq!(visible_range(9, 10, 4), (6, 10));
        assert_eq!(visible_range(5, 10, 4), (3, 7));
    }
}
