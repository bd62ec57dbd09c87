use crate::calc::view_window::{self, ViewMode, display_date, short_weekday, weekday_name};
use crate::calc::{CalendarGrid, GridCell, PlanIndex, build_grid, build_index};
use crate::data::{Category, PlanData, TimeSlot};
use crate::ui::overlay::{DetailOverlay, ListenerRegistry};
use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate};
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

const TODAY_COLOR: Color = Color::Yellow;
const FOCUS_COLOR: Color = Color::Cyan;
const HEADER_BG: Color = Color::Rgb(40, 44, 52);

const EMPTY_DAY: &str = "No study sessions scheduled for this day";

/// Screen areas from the last draw, used to route mouse clicks.
#[derive(Default, Debug)]
struct HitMap {
    cells: Vec<(Rect, NaiveDate)>,
}

impl HitMap {
    fn cell_at(&self, pos: Position) -> Option<NaiveDate> {
        self.cells
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, d)| *d)
    }
}

pub struct App {
    plan_path: PathBuf,
    index: PlanIndex,
    view_mode: ViewMode,
    reference_date: NaiveDate,
    today: NaiveDate,
    /// Keyboard cursor inside the month grid.
    focus: NaiveDate,
    overlay: Option<DetailOverlay>,
    listeners: ListenerRegistry,
    /// Result of the last reload (message, color). Cleared on next keypress.
    status: Option<(String, Color)>,
    hits: HitMap,
}

impl App {
    pub fn new(plan: &PlanData, plan_path: PathBuf, view_mode: ViewMode, today: NaiveDate) -> Self {
        App {
            plan_path,
            index: build_index(&plan.days),
            view_mode,
            reference_date: today,
            today,
            focus: today,
            overlay: None,
            listeners: ListenerRegistry::default(),
            status: None,
            hits: HitMap::default(),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.overlay.as_ref().map(|o| o.date)
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn listener_registry(&self) -> ListenerRegistry {
        self.listeners.clone()
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn grid(&self) -> CalendarGrid {
        build_grid(&self.index, self.reference_date(), self.view_mode(), self.today)
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            tracing::debug!(from = ?self.view_mode, to = ?mode, "view mode changed");
        }
        self.view_mode = mode;
        self.close_overlay();
    }

    pub fn navigate(&mut self, direction: i32) {
        self.reference_date = view_window::navigate(self.reference_date, self.view_mode, direction);
        self.focus = self.reference_date;
    }

    pub fn go_to_today(&mut self) {
        self.reference_date = self.today;
        self.focus = self.today;
    }

    /// Opens the detail overlay for `date` when the month grid shows sessions
    /// on it. Anything else is a no-op.
    pub fn click_date(&mut self, date: NaiveDate) {
        if self.view_mode != ViewMode::Monthly {
            return;
        }
        if self.index.slot_count(date) == 0 {
            return;
        }
        let Some(day) = self.index.get_date(date) else {
            return;
        };
        tracing::debug!(date = %date, slots = day.time_slots.len(), "detail overlay opened");
        self.focus = date;
        self.overlay = Some(DetailOverlay::open(date, day.clone(), &self.listeners));
    }

    pub fn close_overlay(&mut self) {
        if self.overlay.take().is_some() {
            tracing::debug!("detail overlay closed");
        }
    }

    pub fn reload_plan(&mut self) {
        match PlanData::load_from_path(&self.plan_path) {
            Ok(plan) => {
                self.index = build_index(&plan.days);
                self.status = Some((
                    format!("Reloaded {} day record(s)", plan.days.len()),
                    Color::Green,
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "plan reload failed");
                self.status = Some((format!("Reload failed: {e}"), Color::Red));
            }
        }
    }

    fn move_focus(&mut self, days: i64) {
        let Some(next) = self.focus.checked_add_signed(Duration::days(days)) else {
            return;
        };
        self.focus = next;
        if view_window::is_other_month(next, self.reference_date) {
            self.reference_date = next;
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if let Some(overlay) = &self.overlay {
            if overlay.listeners().on_key(code) {
                self.close_overlay();
            } else if code == KeyCode::Char('q') {
                return true;
            }
            return false;
        }

        self.status = None;

        match code {
            KeyCode::Char('d') => self.set_view_mode(ViewMode::Daily),
            KeyCode::Char('w') => self.set_view_mode(ViewMode::Weekly),
            KeyCode::Char('m') => self.set_view_mode(ViewMode::Monthly),
            KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => self.navigate(1),
            KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => self.navigate(-1),
            KeyCode::Char('t') => self.go_to_today(),
            KeyCode::Char('r') => self.reload_plan(),
            KeyCode::Left if self.view_mode == ViewMode::Monthly => self.move_focus(-1),
            KeyCode::Right if self.view_mode == ViewMode::Monthly => self.move_focus(1),
            KeyCode::Up if self.view_mode == ViewMode::Monthly => self.move_focus(-7),
            KeyCode::Down if self.view_mode == ViewMode::Monthly => self.move_focus(7),
            KeyCode::Left => self.navigate(-1),
            KeyCode::Right => self.navigate(1),
            KeyCode::Enter => self.click_date(self.focus),
            KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);
        if let Some(overlay) = &self.overlay {
            if overlay.listeners().on_click(pos) {
                self.close_overlay();
            }
            return;
        }
        if let Some(date) = self.hits.cell_at(pos) {
            self.click_date(date);
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // mode tabs + title
                Constraint::Min(8),    // grid
                Constraint::Length(2), // status + help
            ])
            .split(f.area());

        let grid = self.grid();
        self.hits.cells.clear();

        self.render_header(f, chunks[0], &grid);
        match self.view_mode {
            ViewMode::Daily => self.render_daily(f, chunks[1], &grid),
            ViewMode::Weekly => self.render_weekly(f, chunks[1], &grid),
            ViewMode::Monthly => self.render_monthly(f, chunks[1], &grid),
        }
        self.render_footer(f, chunks[2], &grid);
        let full = f.area();
        self.render_overlay(f, full);
    }

    fn render_header(&self, f: &mut Frame, area: Rect, grid: &CalendarGrid) {
        let mut spans = Vec::new();
        for (mode, key) in [
            (ViewMode::Daily, 'd'),
            (ViewMode::Weekly, 'w'),
            (ViewMode::Monthly, 'm'),
        ] {
            let style = if mode == self.view_mode {
                Style::default()
                    .fg(Color::Black)
                    .bg(FOCUS_COLOR)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {} ({}) ", mode.label(), key), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("  ‹ p   t Today   n ›  ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            grid.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Study Plan "),
        );
        f.render_widget(header, area);
    }

    fn render_daily(&self, f: &mut Frame, area: Rect, grid: &CalendarGrid) {
        let Some(cell) = grid.cells.first() else {
            return;
        };
        let mut lines = vec![
            Line::from(Span::styled(
                weekday_name(cell.date),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(display_date(cell.date)),
            Line::from(""),
        ];
        lines.extend(slot_detail_lines(&cell.slots));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(cell_border_style(cell.is_today, false));
        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_weekly(&self, f: &mut Frame, area: Rect, grid: &CalendarGrid) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 7); 7])
            .split(area);

        for (cell, rect) in grid.cells.iter().zip(columns.iter()) {
            let mut lines: Vec<Line> = Vec::new();
            for slot in &cell.slots {
                lines.push(Line::from(Span::styled(
                    slot.time.clone(),
                    Style::default().fg(Color::DarkGray),
                )));
                lines.push(Line::from(slot.item_name.clone()));
                lines.push(Line::from(category_span(slot.category)));
            }
            if let Some(more) = cell.more_label() {
                lines.push(Line::from(Span::styled(
                    more,
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }

            let title = format!(" {} {} ", short_weekday(cell.date), cell.date.day());
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(cell_border_style(cell.is_today, false))
                .title(Span::styled(title, cell_title_style(cell.is_today, false)));
            f.render_widget(
                Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
                *rect,
            );
        }
    }

    fn render_monthly(&mut self, f: &mut Frame, area: Rect, grid: &CalendarGrid) {
        let rows: Vec<&[GridCell]> = grid.rows().collect();
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(rows.iter().map(|_| Constraint::Ratio(1, rows.len() as u32)));
        let bands = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let week_columns = |band: Rect| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 7); 7])
                .split(band)
        };

        for (name, rect) in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
            .iter()
            .zip(week_columns(bands[0]).iter())
        {
            f.render_widget(
                Paragraph::new(format!(" {name}"))
                    .style(Style::default().bg(HEADER_BG).add_modifier(Modifier::BOLD)),
                *rect,
            );
        }

        for (row, band) in rows.iter().zip(bands.iter().skip(1)) {
            for (cell, rect) in row.iter().zip(week_columns(*band).iter()) {
                let is_focused = cell.date == self.focus;
                let mut lines: Vec<Line> = Vec::new();
                if cell.has_slots() {
                    lines.push(Line::from(Span::styled(
                        format!("● {}", cell.total),
                        Style::default().fg(FOCUS_COLOR),
                    )));
                    for slot in &cell.slots {
                        lines.push(Line::from(Span::styled(
                            slot.item_name.clone(),
                            Style::default().fg(category_color(slot.category)),
                        )));
                    }
                    if let Some(more) = cell.more_label() {
                        lines.push(Line::from(more));
                    }
                }

                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(cell_border_style(cell.is_today, is_focused))
                    .title(Span::styled(
                        format!("{:>2}", cell.date.day()),
                        cell_title_style(cell.is_today, is_focused),
                    ));
                let paragraph = Paragraph::new(lines)
                    .block(block)
                    .style(month_cell_style(cell.is_other_month));
                f.render_widget(paragraph, *rect);
                self.hits.cells.push((*rect, cell.date));
            }
        }
    }

    fn render_overlay(&mut self, f: &mut Frame, area: Rect) {
        let Some(overlay) = &mut self.overlay else {
            return;
        };
        let panel = centered_rect(60, 70, area);

        let mut header = vec![Span::raw(format!(
            "{}   {}",
            display_date(overlay.date),
            overlay.day.date
        ))];
        if !overlay.day.day.is_empty() && overlay.day.day != weekday_name(overlay.date) {
            header.push(Span::styled(
                format!("   planned as {}", overlay.day.day),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let mut lines = vec![Line::from(header), Line::from("")];
        lines.extend(slot_detail_lines(&overlay.day.time_slots));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FOCUS_COLOR))
            .title(Span::styled(
                format!(" {} ", weekday_name(overlay.date)),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Clear, panel);
        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            panel,
        );

        let close = Rect {
            x: panel.x + panel.width.saturating_sub(5),
            y: panel.y,
            width: 3.min(panel.width),
            height: 1,
        };
        f.render_widget(
            Paragraph::new("[x]").style(Style::default().fg(Color::Red)),
            close,
        );
        overlay.listeners_mut().set_bounds(panel, close);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect, grid: &CalendarGrid) {
        let mut lines = Vec::new();
        if let Some((msg, color)) = &self.status {
            lines.push(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )));
        } else if let Some(date) = self.selected_date() {
            lines.push(Line::from(format!("Details for {}", display_date(date))));
        } else if self.index.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(
                    "No study plan found in {}. Generate a plan first, then press r.",
                    self.plan_path.display()
                ),
                Style::default().fg(Color::Yellow),
            )));
        } else if let (ViewMode::Monthly, Some(cell)) = (self.view_mode, grid.cell(self.focus)) {
            lines.push(Line::from(format!(
                "{} {}: {} session(s)",
                short_weekday(cell.date),
                cell.key,
                cell.total
            )));
        } else {
            lines.push(Line::from(format!(
                "Plan: {} ({} day(s))",
                self.plan_path.display(),
                self.index.len()
            )));
        }
        let help = if self.overlay_open() {
            "Esc/Enter: close   click outside: close   q: quit"
        } else {
            match self.view_mode {
                ViewMode::Monthly => {
                    "d/w/m: view   n/p: month   t: today   arrows: move   Enter/click: details   r: reload   q: quit"
                }
                _ => "d/w/m: view   n/p or ←/→: navigate   t: today   r: reload   q: quit",
            }
        };
        lines.push(Line::from(Span::styled(
            help,
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(Paragraph::new(lines), area);
    }
}

// ── Styling helpers ───────────────────────────────────────────────────────────

pub(crate) fn category_color(category: Category) -> Color {
    match category {
        Category::Assignment => Color::Yellow,
        Category::Exam => Color::Red,
        Category::Subject => Color::Green,
        Category::Other => Color::Gray,
    }
}

fn category_span(category: Category) -> Span<'static> {
    Span::styled(
        format!("[{}]", category.label()),
        Style::default().fg(category_color(category)),
    )
}

pub(crate) fn cell_border_style(is_today: bool, is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
    } else if is_today {
        Style::default().fg(TODAY_COLOR)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub(crate) fn cell_title_style(is_today: bool, is_focused: bool) -> Style {
    let mut s = Style::default().add_modifier(Modifier::BOLD);
    if is_today {
        s = s.fg(Color::Black).bg(TODAY_COLOR);
    } else if is_focused {
        s = s.fg(FOCUS_COLOR);
    }
    s
}

pub(crate) fn month_cell_style(is_other_month: bool) -> Style {
    if is_other_month {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

/// Full, unclipped session list used by the daily view and the overlay.
fn slot_detail_lines(slots: &[TimeSlot]) -> Vec<Line<'static>> {
    if slots.is_empty() {
        return vec![Line::from(Span::styled(
            EMPTY_DAY,
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let mut lines = Vec::new();
    for slot in slots {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<8}", slot.time), Style::default().fg(Color::DarkGray)),
            Span::styled(
                slot.item_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("        "),
            category_span(slot.category),
            Span::raw(format!(" {}  {}h", slot.subject_name, slot.hours)),
        ]));
    }
    lines
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
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.set_today(Local::now().date_naive());
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}
