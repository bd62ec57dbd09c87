pub mod days;
pub mod init;
pub mod root;
pub mod show;

use crate::data::{AppSettings, PlanData, persistence};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Settings plus the plan they point at, as every subcommand needs them.
pub(crate) struct Workspace {
    pub settings: AppSettings,
    pub plan_path: PathBuf,
    pub plan: PlanData,
}

impl Workspace {
    pub(crate) fn load(plan_override: Option<&Path>) -> Result<Self> {
        let dir = persistence::get_data_dir()?;
        Self::load_in(&dir, plan_override)
    }

    pub(crate) fn load_in(dir: &Path, plan_override: Option<&Path>) -> Result<Self> {
        let settings = AppSettings::load_from(dir)?;
        let plan_path = persistence::resolve_plan_path(dir, &settings.plan_file, plan_override);
        let plan = PlanData::load_from_path(&plan_path)?;
        Ok(Workspace {
            settings,
            plan_path,
            plan,
        })
    }
}
