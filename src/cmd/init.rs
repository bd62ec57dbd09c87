use crate::calc::view_window::{date_key, week_start, weekday_name};
use crate::data::{AppSettings, Category, DayPlan, PlanData, TimeSlot};
use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir, Local::now().date_naive())?;
    println!("Data files initialized in {}.", dir.display());
    Ok(())
}

/// Writes config.yaml and, unless a plan file is already there, a sample
/// plan for the week containing `today`.
pub(crate) fn run_in_dir(dir: &Path, today: NaiveDate) -> Result<()> {
    let settings = AppSettings::default();
    settings.save_to(dir)?;
    let plan_path = dir.join(&settings.plan_file);
    if plan_path.exists() {
        tracing::info!(path = %plan_path.display(), "plan file exists, sample not written");
        return Ok(());
    }
    sample_plan(today).save_to_path(&plan_path)?;
    Ok(())
}

fn slot(time: &str, item: &str, category: Category, subject: &str, hours: f64) -> TimeSlot {
    TimeSlot {
        time: time.to_string(),
        item_name: item.to_string(),
        category,
        subject_name: subject.to_string(),
        hours,
    }
}

fn day(date: NaiveDate, slots: Vec<TimeSlot>) -> DayPlan {
    DayPlan {
        day: weekday_name(date).to_string(),
        date: Some(date_key(date)),
        time_slots: Some(slots),
    }
}

fn sample_plan(today: NaiveDate) -> PlanData {
    let monday = week_start(today);
    let on = |offset: i64| monday + Duration::days(offset);
    PlanData {
        days: vec![
            day(
                on(0),
                vec![
                    slot("09:00 - 11:00", "Essay draft", Category::Assignment, "History", 2.0),
                    slot("14:00 - 15:30", "Chapter 4 review", Category::Exam, "Biology", 1.5),
                ],
            ),
            day(
                on(2),
                vec![
                    slot("10:00 - 12:00", "Problem set 3", Category::Assignment, "Calculus", 2.0),
                    slot("13:00 - 14:00", "Flashcards", Category::Exam, "Biology", 1.0),
                    slot("15:00 - 16:00", "Lecture notes", Category::Subject, "Physics", 1.0),
                    slot("19:00 - 20:00", "Past paper", Category::Exam, "Calculus", 1.0),
                ],
            ),
            day(
                on(4),
                vec![slot("09:00 - 10:30", "Essay final edit", Category::Assignment, "History", 1.5)],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::build_index;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_run_in_dir_writes_config_and_plan() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path(), d(2024, 6, 5)).unwrap();
        assert!(tmp.path().join("config.yaml").exists());
        assert!(tmp.path().join("plan.json").exists());
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_sample_plan_lands_in_current_week() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path(), d(2024, 6, 5)).unwrap();
        let plan = PlanData::load_from_path(&tmp.path().join("plan.json")).unwrap();
        let index = build_index(&plan.days);
        assert_eq!(index.slot_count(d(2024, 6, 3)), 2);
        assert_eq!(index.slot_count(d(2024, 6, 5)), 4);
        assert_eq!(index.get("2024-06-07").unwrap().day, "Friday");
    }

    #[test]
    fn test_run_in_dir_keeps_existing_plan() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plan.json");
        let existing = r#"[{"day":"Monday","date":"2024-06-03","time_slots":[
            {"time":"09:00","item_name":"My own session","category":"exam","subject_name":"Maths","hours":1}]}]"#;
        fs::write(&path, existing).unwrap();

        run_in_dir(tmp.path(), d(2024, 6, 5)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), existing);
        assert!(tmp.path().join("config.yaml").exists());
    }

    #[test]
    fn test_sample_plan_has_a_clipped_day() {
        let plan = sample_plan(d(2024, 6, 5));
        assert!(
            plan.days
                .iter()
                .any(|d| d.time_slots.as_ref().is_some_and(|s| s.len() > crate::calc::grid::CELL_SLOT_LIMIT))
        );
    }
}
