use crate::calc::build_index;
use crate::cmd::Workspace;
use crate::data::PlanData;
use anyhow::Result;
use std::path::Path;

pub fn run(plan_override: Option<&Path>) -> Result<()> {
    let ws = Workspace::load(plan_override)?;
    write_days(&ws.plan, &mut std::io::stdout())
}

/// Flat listing of every session in upstream order.
pub(crate) fn write_days<W: std::io::Write>(plan: &PlanData, out: &mut W) -> Result<()> {
    writeln!(out, "Study Plan")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<12} {:<10} {:<14} {:<24} {:<11} {:<14} {}",
        "Date", "Day", "Time", "Item", "Category", "Subject", "Hours"
    )?;
    let mut undated = 0usize;
    for day in &plan.days {
        if day.date.is_none() {
            undated += 1;
        }
        let date = day.date.as_deref().unwrap_or("-");
        for slot in day.time_slots.iter().flatten() {
            let subject = if slot.subject_name.is_empty() {
                "N/A"
            } else {
                slot.subject_name.as_str()
            };
            writeln!(
                out,
                "  {:<12} {:<10} {:<14} {:<24} {:<11} {:<14} {}h",
                date,
                day.day,
                slot.time,
                slot.item_name,
                slot.category.label(),
                subject,
                slot.hours
            )?;
        }
    }
    writeln!(out, "---")?;
    writeln!(
        out,
        "Total: {} session(s), {} hour(s)",
        plan.total_slots(),
        plan.total_hours()
    )?;
    let index = build_index(&plan.days);
    let mut dates = index.dates();
    if let Some(first) = dates.next() {
        let last = dates.last().unwrap_or(first);
        writeln!(out, "Covers {} to {} ({} date(s))", first, last, index.len())?;
    }
    if undated > 0 {
        writeln!(
            out,
            "{} record(s) have no date and are not shown on the calendar",
            undated
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(plan: &PlanData) -> String {
        let mut buf = Vec::new();
        write_days(plan, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_days_empty() {
        let out = render(&PlanData::default());
        assert!(out.contains("Total: 0 session(s), 0 hour(s)"));
        assert!(!out.contains("no date"));
    }

    #[test]
    fn test_write_days_lists_slots_in_order() {
        let plan = PlanData::from_value(&json!([
            {"day": "Monday", "date": "2024-06-03", "time_slots": [
                {"time": "09:00", "item_name": "Essay", "category": "assignment", "subject_name": "History", "hours": 2},
                {"time": "11:00", "item_name": "Quiz prep", "category": "exam", "subject_name": "", "hours": 0.5}
            ]}
        ]));
        let out = render(&plan);
        let essay = out.find("Essay").unwrap();
        let quiz = out.find("Quiz prep").unwrap();
        assert!(essay < quiz);
        assert!(out.contains("N/A"));
        assert!(out.contains("Total: 2 session(s), 2.5 hour(s)"));
        assert!(out.contains("Covers 2024-06-03 to 2024-06-03 (1 date(s))"));
    }

    #[test]
    fn test_write_days_reports_undated_records() {
        let plan = PlanData::from_value(&json!([
            {"day": "Tuesday", "time_slots": [
                {"time": "09:00", "item_name": "Reading", "category": "subject", "subject_name": "Art", "hours": 1}
            ]}
        ]));
        let out = render(&plan);
        assert!(out.contains("Reading"));
        assert!(out.contains("  -  "));
        assert!(out.contains("1 record(s) have no date"));
    }
}
