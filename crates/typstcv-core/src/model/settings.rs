//! The `settings:` block of the input

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_FOLDER: &str = "typstcv_output";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Overrides today's date (`YYYY-MM-DD`) for time spans and "last updated"
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub today: Option<NaiveDate>,
    /// Words rendered bold wherever they appear in free text
    pub bold_keywords: Vec<String>,
    pub render: RenderSettings,
}

/// Output choices; read by the command line front end only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub output_folder: String,
    pub typst: bool,
    pub markdown: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output_folder: DEFAULT_OUTPUT_FOLDER.to_string(),
            typst: true,
            markdown: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.render.output_folder, "typstcv_output");
        assert!(settings.render.typst && settings.render.markdown);
    }

    #[test]
    fn test_today_and_keywords() {
        let settings: Settings =
            serde_yaml::from_str("today: 2024-03-05\nbold_keywords: [Rust]\nrender:\n  markdown: false\n")
                .unwrap();
        assert_eq!(settings.today, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(settings.bold_keywords, vec!["Rust"]);
        assert!(!settings.render.markdown);
        assert!(settings.render.typst);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(serde_yaml::from_str::<Settings>("colour: red\n").is_err());
    }
}
