use crate::data::persistence::write_file;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Assignment,
    Exam,
    Subject,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Assignment => "assignment",
            Category::Exam => "exam",
            Category::Subject => "subject",
            Category::Other => "other",
        }
    }
}

/// One scheduled study session within a day. `time` is a display label only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeSlot {
    pub time: String,
    pub item_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject_name: String,
    pub hours: f64,
}

/// Reads an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single day record as produced by the planning service.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DayPlan {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time_slots: Option<Vec<TimeSlot>>,
}

/// The plan payload, normalized from whatever JSON the planner handed over.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct PlanData {
    pub days: Vec<DayPlan>,
}

impl PlanData {
    /// Reads the plan file at `path`. A missing file is an empty plan; so is
    /// a file whose contents are not a JSON array.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no plan file, starting with an empty plan");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let plan = Self::from_json_str(&contents);
        tracing::info!(
            path = %path.display(),
            records = plan.days.len(),
            "plan loaded"
        );
        Ok(plan)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("failed to serialize JSON")?;
        write_file(path, &contents)
    }

    pub fn from_json_str(contents: &str) -> Self {
        match serde_json::from_str::<Value>(contents) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!(error = %e, "plan payload is not valid JSON, treating as empty");
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(records) = value.as_array() else {
            tracing::warn!("plan payload is not an array, treating as empty");
            return Self::default();
        };
        let days = records.iter().filter_map(parse_day_plan).collect();
        PlanData { days }
    }

    pub fn total_slots(&self) -> usize {
        self.days
            .iter()
            .map(|d| d.time_slots.as_ref().map_or(0, Vec::len))
            .sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.days
            .iter()
            .flat_map(|d| d.time_slots.iter().flatten())
            .fold(0.0, |acc, s| acc + s.hours)
    }
}

fn parse_day_plan(value: &Value) -> Option<DayPlan> {
    let obj = value.as_object()?;
    let day = obj
        .get("day")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let date = obj.get("date").and_then(Value::as_str).map(str::to_string);
    let time_slots = obj.get("time_slots").and_then(Value::as_array).map(|slots| {
        slots
            .iter()
            .filter_map(|s| match TimeSlot::deserialize(s) {
                Ok(slot) => Some(slot),
                Err(e) => {
                    tracing::warn!(date = ?date, error = %e, "skipping unreadable time slot");
                    None
                }
            })
            .collect()
    });
    Some(DayPlan {
        day,
        date,
        time_slots,
    })
}
