use crate::calc::plan_index::PlanIndex;
use crate::calc::view_window::{ViewMode, compute_window, date_key, is_other_month, window_title};
use crate::data::TimeSlot;
use chrono::NaiveDate;

/// Week and month cells show at most this many sessions before "+N more".
pub const CELL_SLOT_LIMIT: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub date: NaiveDate,
    pub key: String,
    pub is_today: bool,
    /// Padding day outside the viewed month (monthly grids only).
    pub is_other_month: bool,
    /// Sessions to draw, already clipped for week/month cells.
    pub slots: Vec<TimeSlot>,
    pub hidden_count: usize,
    pub total: usize,
}

impl GridCell {
    pub fn has_slots(&self) -> bool {
        self.total > 0
    }

    pub fn more_label(&self) -> Option<String> {
        (self.hidden_count > 0).then(|| format!("+{} more", self.hidden_count))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarGrid {
    pub mode: ViewMode,
    pub title: String,
    pub cells: Vec<GridCell>,
}

impl CalendarGrid {
    /// Cells chunked into calendar weeks.
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.date == date)
    }
}

pub fn build_grid(
    index: &PlanIndex,
    reference: NaiveDate,
    mode: ViewMode,
    today: NaiveDate,
) -> CalendarGrid {
    let cells = compute_window(reference, mode)
        .into_iter()
        .map(|date| {
            let all = index.slots_for(date);
            let shown = match mode {
                ViewMode::Daily => all.len(),
                ViewMode::Weekly | ViewMode::Monthly => all.len().min(CELL_SLOT_LIMIT),
            };
            GridCell {
                date,
                key: date_key(date),
                is_today: date == today,
                is_other_month: mode == ViewMode::Monthly && is_other_month(date, reference),
                slots: all[..shown].to_vec(),
                hidden_count: all.len() - shown,
                total: all.len(),
            }
        })
        .collect();
    CalendarGrid {
        mode,
        title: window_title(reference, mode),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::plan_index::build_index;
    use crate::data::{Category, DayPlan};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn slot(name: &str) -> TimeSlot {
        TimeSlot {
            time: "10:00".to_string(),
            item_name: name.to_string(),
            category: Category::Assignment,
            subject_name: "History".to_string(),
            hours: 2.0,
        }
    }

    fn index_with(date: &str, names: &[&str]) -> PlanIndex {
        build_index(&[DayPlan {
            day: "Mon".to_string(),
            date: Some(date.to_string()),
            time_slots: Some(names.iter().map(|n| slot(n)).collect()),
        }])
    }

    #[test]
    fn test_weekly_grid_shows_essay_on_monday() {
        let index = index_with("2024-06-03", &["Essay"]);
        let grid = build_grid(&index, d(2024, 6, 5), ViewMode::Weekly, d(2024, 6, 5));
        assert_eq!(grid.cells.len(), 7);
        let monday = grid.cell(d(2024, 6, 3)).unwrap();
        assert_eq!(monday.slots.len(), 1);
        assert_eq!(monday.slots[0].item_name, "Essay");
        assert_eq!(monday.more_label(), None);
        assert_eq!(grid.title, "Week of Jun 3, 2024");
    }

    #[test]
    fn test_week_cell_clips_to_three() {
        let index = index_with("2024-06-03", &["A", "B", "C", "D", "E"]);
        let grid = build_grid(&index, d(2024, 6, 3), ViewMode::Weekly, d(2024, 1, 1));
        let cell = grid.cell(d(2024, 6, 3)).unwrap();
        let names: Vec<_> = cell.slots.iter().map(|s| s.item_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(cell.hidden_count, 2);
        assert_eq!(cell.total, 5);
        assert_eq!(cell.more_label().as_deref(), Some("+2 more"));
    }

    #[test]
    fn test_daily_cell_is_unclipped() {
        let index = index_with("2024-06-03", &["A", "B", "C", "D", "E"]);
        let grid = build_grid(&index, d(2024, 6, 3), ViewMode::Daily, d(2024, 1, 1));
        assert_eq!(grid.cells.len(), 1);
        assert_eq!(grid.cells[0].slots.len(), 5);
        assert_eq!(grid.cells[0].hidden_count, 0);
    }

    #[test]
    fn test_monthly_grid_marks_other_month_and_today() {
        let index = PlanIndex::default();
        let today = d(2024, 6, 20);
        let grid = build_grid(&index, d(2024, 6, 15), ViewMode::Monthly, today);
        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.rows().count(), 5);
        assert!(grid.cells[0].is_other_month);
        assert!(!grid.cell(d(2024, 6, 1)).unwrap().is_other_month);
        let today_cells: Vec<_> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today_cells.len(), 1);
        assert_eq!(today_cells[0].date, today);
        assert!(grid.cells.iter().all(|c| !c.has_slots()));
    }

    #[test]
    fn test_today_independent_of_reference() {
        let index = PlanIndex::default();
        let grid = build_grid(&index, d(2024, 6, 15), ViewMode::Monthly, d(2025, 1, 1));
        assert!(grid.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn test_padding_days_still_resolve_slots() {
        let index = index_with("2024-05-28", &["Lab report"]);
        let grid = build_grid(&index, d(2024, 6, 15), ViewMode::Monthly, d(2024, 6, 15));
        let cell = grid.cell(d(2024, 5, 28)).unwrap();
        assert!(cell.is_other_month);
        assert_eq!(cell.total, 1);
        assert_eq!(cell.key, "2024-05-28");
    }
}
