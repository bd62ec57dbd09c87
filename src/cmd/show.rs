use crate::calc::view_window::{parse_date_key, short_weekday};
use crate::calc::{CalendarGrid, GridCell, ViewMode, build_grid, build_index};
use crate::cmd::Workspace;
use anyhow::{Result, bail};
use chrono::{Datelike, Local};
use std::io::Write;
use std::path::Path;

pub fn run(mode: Option<ViewMode>, date: Option<&str>, plan_override: Option<&Path>) -> Result<()> {
    let ws = Workspace::load(plan_override)?;
    let today = Local::now().date_naive();
    let reference = match date {
        Some(raw) => match parse_date_key(raw) {
            Some(d) => d,
            None => bail!("Invalid date '{}'. Expected YYYY-MM-DD.", raw),
        },
        None => today,
    };
    let mode = mode.unwrap_or(ws.settings.default_view);
    let index = build_index(&ws.plan.days);
    let grid = build_grid(&index, reference, mode, today);
    write_grid(&grid, &mut std::io::stdout())
}

pub(crate) fn write_grid<W: Write>(grid: &CalendarGrid, out: &mut W) -> Result<()> {
    writeln!(out, "{}", grid.title)?;
    writeln!(out, "---")?;
    match grid.mode {
        ViewMode::Daily | ViewMode::Weekly => {
            for cell in &grid.cells {
                write_day(cell, out)?;
            }
        }
        ViewMode::Monthly => {
            write_month_table(grid, out)?;
            writeln!(out, "---")?;
            for cell in grid.cells.iter().filter(|c| c.has_slots()) {
                write_day(cell, out)?;
            }
        }
    }
    writeln!(out, "---")?;
    let total: usize = grid.cells.iter().map(|c| c.total).sum();
    writeln!(out, "Total: {} session(s)", total)?;
    Ok(())
}

fn write_day<W: Write>(cell: &GridCell, out: &mut W) -> Result<()> {
    let marker = if cell.is_today { "  (today)" } else { "" };
    writeln!(out, "{} {}{}", short_weekday(cell.date), cell.key, marker)?;
    if cell.total == 0 {
        writeln!(out, "  No study sessions scheduled for this day")?;
    }
    for slot in &cell.slots {
        writeln!(
            out,
            "  {:<14} {} [{}] {} {}h",
            slot.time,
            slot.item_name,
            slot.category.label(),
            slot.subject_name,
            slot.hours
        )?;
    }
    if let Some(more) = cell.more_label() {
        writeln!(out, "  {}", more)?;
    }
    Ok(())
}

/// Month grid: `*` marks today, `~` a padding day, `[n]` the session count.
fn write_month_table<W: Write>(grid: &CalendarGrid, out: &mut W) -> Result<()> {
    let header: String = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .iter()
        .map(|name| format!(" {:<7}", name))
        .collect();
    writeln!(out, "{}", header.trim_end())?;
    for row in grid.rows() {
        let line: String = row.iter().map(month_cell_text).collect();
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn month_cell_text(cell: &GridCell) -> String {
    let lead = if cell.is_other_month { '~' } else { ' ' };
    let mark = if cell.is_today { '*' } else { ' ' };
    let count = if cell.total > 0 {
        format!("[{}]", cell.total)
    } else {
        String::new()
    };
    format!("{}{:>2}{}{:<4}", lead, cell.date.day(), mark, count)
}
