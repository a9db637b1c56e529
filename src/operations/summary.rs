use std::collections::HashMap;
use std::io;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Points},
    },
};

use crate::db::ledger::Ledger;
use crate::operations::InputError;
use crate::operations::history::format_amount;

/// Parses the optional date filter typed at the summary prompt. An empty
/// line means "all dates".
pub fn parse_date_filter(input: &str) -> Result<Option<NaiveDate>, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| InputError::BadDate(trimmed.to_string()))
}

/// Full-screen spending summary: total headline, per-category bars, share
/// pie and a sorted category table. `q` or `Esc` returns to the prompt.
pub fn run_summary(ledger: &Ledger, filter: Option<NaiveDate>) -> io::Result<()> {
    let data = SummaryData::gather(ledger, filter);
    render_summary(&data)
}

struct SummaryData {
    scope: String,
    total: f64,
    categories: Vec<(String, f64)>,
    colors: HashMap<String, Color>,
}

impl SummaryData {
    fn gather(ledger: &Ledger, filter: Option<NaiveDate>) -> Self {
        let scope = match filter {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "all dates".to_string(),
        };
        let total = ledger.total_spent(filter);
        let categories = sorted_totals(ledger.spent_by_category(filter));
        let colors = assign_colors(&categories);

        SummaryData {
            scope,
            total,
            categories,
            colors,
        }
    }
}

/// Largest spend first; ties fall back to the label so the display order is
/// stable across runs.
fn sorted_totals(totals: HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = totals.into_iter().collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    entries
}

fn assign_colors(categories: &[(String, f64)]) -> HashMap<String, Color> {
    let palette = [
        Color::Cyan,
        Color::Yellow,
        Color::Magenta,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightCyan,
        Color::LightYellow,
        Color::LightMagenta,
        Color::LightGreen,
    ];

    let mut map = HashMap::new();
    for (idx, (category, _)) in categories.iter().enumerate() {
        map.insert(category.clone(), palette[idx % palette.len()]);
    }
    map
}

fn bar_length(amount: f64, max_amount: f64, width: usize) -> usize {
    if max_amount <= 0.0 || amount <= 0.0 || width == 0 {
        return 0;
    }
    let ratio = (amount / max_amount).clamp(0.0, 1.0);
    ((ratio * width as f64).round() as usize).clamp(1, width)
}

/// Pie slice angles in radians, one `(start, end)` pair per category in
/// input order. The last slice ends at a full circle when the amounts cover
/// the whole total.
fn build_slices(categories: &[(String, f64)], total: f64) -> Vec<(f64, f64)> {
    if total <= 0.0 {
        return Vec::new();
    }
    let mut slices = Vec::with_capacity(categories.len());
    let mut start = 0.0_f64;
    for (_, amount) in categories {
        let sweep = (amount / total).max(0.0) * std::f64::consts::TAU;
        slices.push((start, start + sweep));
        start += sweep;
    }
    slices
}

fn render_summary(data: &SummaryData) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = (|| -> io::Result<()> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        loop {
            terminal.draw(|frame| {
                let size = frame.area();
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Percentage(55),
                        Constraint::Percentage(45),
                    ])
                    .split(size);

                render_headline(frame, layout[0], data);
                render_category_bars(frame, layout[1], data);

                let bottom = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(layout[2]);

                render_share_pie(frame, bottom[0], data);
                render_category_table(frame, bottom[1], data);
            })?;

            if event::poll(std::time::Duration::from_millis(250))? {
                match event::read()? {
                    Event::Key(key) if key.code == KeyCode::Char('q') => break,
                    Event::Key(key) if key.code == KeyCode::Esc => break,
                    Event::Resize(_, _) => continue,
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

fn render_headline(frame: &mut ratatui::Frame, area: Rect, data: &SummaryData) {
    let block = Block::default()
        .title(format!("Spending summary, {}  (press q to exit)", data.scope))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let headline = Line::from(vec![
        Span::raw("Total spent: "),
        Span::styled(
            format_amount(data.total),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(headline).alignment(Alignment::Left), inner);
}

fn render_category_bars(frame: &mut ratatui::Frame, area: Rect, data: &SummaryData) {
    let block = Block::default().title("By category").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.categories.is_empty() {
        let empty = Paragraph::new("No expenses recorded for this scope")
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let name_width = 15usize;
    let amount_width = 12usize;
    let bar_budget = (inner.width as usize).saturating_sub(name_width + amount_width + 4);
    let max_amount = data
        .categories
        .iter()
        .map(|(_, amount)| *amount)
        .fold(0.0_f64, f64::max);

    let mut lines = Vec::new();
    for (category, amount) in data.categories.iter().take(inner.height as usize) {
        let color = data
            .colors
            .get(category)
            .copied()
            .unwrap_or(Color::White);
        let filled = bar_length(*amount, max_amount, bar_budget);
        lines.push(Line::from(vec![
            Span::raw(format!("{:name_width$.name_width$} ", category)),
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::raw(" ".repeat(bar_budget.saturating_sub(filled))),
            Span::raw(format!(" {:>amount_width$}", format_amount(*amount))),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn render_share_pie(frame: &mut ratatui::Frame, area: Rect, data: &SummaryData) {
    let block = Block::default().title("Share of total").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.total <= 0.0 {
        let empty = Paragraph::new("No expenses recorded for this scope")
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let slices = build_slices(&data.categories, data.total);
    let canvas = Canvas::default()
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for ((start, end), (category, _)) in slices.iter().zip(&data.categories) {
                let color = data
                    .colors
                    .get(category)
                    .copied()
                    .unwrap_or(Color::White);
                let mut points = Vec::new();
                let mut radius = 0.0_f64;
                while radius <= 1.0 {
                    let mut angle = *start;
                    while angle <= *end {
                        points.push((radius * angle.cos(), radius * angle.sin()));
                        angle += 0.05;
                    }
                    radius += 0.04;
                }
                if !points.is_empty() {
                    ctx.draw(&Points {
                        coords: &points,
                        color,
                    });
                }
            }
        });

    frame.render_widget(canvas, inner);
}

fn render_category_table(frame: &mut ratatui::Frame, area: Rect, data: &SummaryData) {
    let block = Block::default().title("Category spend").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.categories.is_empty() {
        let empty = Paragraph::new("No expenses recorded for this scope")
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{:15}", "Category"), bold),
        Span::raw("  "),
        Span::styled(format!("{:>12}", "Amount"), bold),
    ])];

    for (category, amount) in &data.categories {
        let color = data
            .colors
            .get(category)
            .copied()
            .unwrap_or(Color::White);
        lines.push(Line::from(vec![
            Span::styled(format!("{:15}", category), Style::default().fg(color)),
            Span::raw("  "),
            Span::styled(
                format!("{:>12}", format_amount(*amount)),
                Style::default().fg(color),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}
