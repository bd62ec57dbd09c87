use crate::calc::ViewMode;
use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub default_view: ViewMode,
    pub plan_file: String,
    pub log_file: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            default_view: ViewMode::Weekly,
            plan_file: "plan.json".to_string(),
            log_file: "studycal.log".to_string(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    pub fn load_from(dir: &std::path::Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &std::path::Path) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save_to(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_settings_default_values() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_view, ViewMode::Weekly);
        assert_eq!(settings.plan_file, "plan.json");
        assert_eq!(settings.log_file, "studycal.log");
    }

    #[test]
    fn test_settings_wrapper_yaml_roundtrip() {
        let wrapper = SettingsWrapper {
            settings: AppSettings {
                default_view: ViewMode::Monthly,
                plan_file: "exported.json".to_string(),
                log_file: "debug.log".to_string(),
            },
        };
        let yaml = serde_norway::to_string(&wrapper).unwrap();
        assert!(yaml.contains("default_view: monthly"));
        let parsed: SettingsWrapper = serde_norway::from_str(&yaml).unwrap();
        assert_eq!(parsed.settings, wrapper.settings);
    }

    #[test]
    fn test_settings_wrapper_missing_key_uses_default() {
        let wrapper: SettingsWrapper = serde_norway::from_str("other: 1").unwrap();
        assert_eq!(wrapper.settings, AppSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let yaml = "settings:\n  default_view: daily\n";
        let wrapper: SettingsWrapper = serde_norway::from_str(yaml).unwrap();
        assert_eq!(wrapper.settings.default_view, ViewMode::Daily);
        assert_eq!(wrapper.settings.plan_file, "plan.json");
    }

    #[test]
    fn test_save_to_and_load_from() {
        let tmp = tempfile::TempDir::new().unwrap();
        let settings = AppSettings {
            default_view: ViewMode::Daily,
            ..AppSettings::default()
        };
        settings.save_to(tmp.path()).unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), settings);
    }

    #[test]
    fn test_load_from_empty_dir_is_default() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), AppSettings::default());
    }
}
