pub mod app_settings;
pub mod persistence;
pub mod plan;

pub use app_settings::AppSettings;
pub use plan::{Category, DayPlan, PlanData, TimeSlot};
