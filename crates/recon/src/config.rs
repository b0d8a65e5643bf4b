use serde::Deserialize;

use crate::error::DedupError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run description, usually loaded from a `.dedup.toml` file. Every field has
/// a default, so an empty document is a valid config.
#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Treat any skipped pair as a failed run.
    #[serde(default)]
    pub fail_on_skipped: bool,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            fail_on_skipped: false,
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_name() -> String {
    "question dedup".into()
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_left_column")]
    pub left_column: String,
    #[serde(default = "default_right_column")]
    pub right_column: String,
    /// Worksheet to read from xlsx input. First sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            left_column: default_left_column(),
            right_column: default_right_column(),
            sheet: None,
        }
    }
}

fn default_left_column() -> String {
    "question_1".into()
}

fn default_right_column() -> String {
    "question_2".into()
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_selection_file")]
    pub selection_file: String,
    #[serde(default = "default_mapping_file")]
    pub mapping_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default = "default_workbook_file")]
    pub workbook_file: String,
    /// chrono format for the `processing_date` column.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            selection_file: default_selection_file(),
            mapping_file: default_mapping_file(),
            report_file: default_report_file(),
            workbook_file: default_workbook_file(),
            date_format: default_date_format(),
        }
    }
}

fn default_selection_file() -> String {
    "final_selection_questions.csv".into()
}

fn default_mapping_file() -> String {
    "question_id_priority_mapping.csv".into()
}

fn default_report_file() -> String {
    "final_consolidated_question_report.csv".into()
}

fn default_workbook_file() -> String {
    "dedup_report.xlsx".into()
}

fn default_date_format() -> String {
    "%Y-%m-%d".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl DedupConfig {
    pub fn from_toml(input: &str) -> Result<Self, DedupError> {
        let config: DedupConfig =
            toml::from_str(input).map_err(|e| DedupError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        let input = &self.input;
        if input.left_column.trim().is_empty() || input.right_column.trim().is_empty() {
            return Err(DedupError::ConfigValidation(
                "input column names must not be empty".into(),
            ));
        }
        if input.left_column == input.right_column {
            return Err(DedupError::ConfigValidation(format!(
                "left and right columns are both '{}'",
                input.left_column
            )));
        }

        let out = &self.output;
        for (key, file) in [
            ("selection_file", &out.selection_file),
            ("mapping_file", &out.mapping_file),
            ("report_file", &out.report_file),
            ("workbook_file", &out.workbook_file),
        ] {
            if file.trim().is_empty() {
                return Err(DedupError::ConfigValidation(format!("output.{key} is empty")));
            }
        }

        // chrono reports a bad specifier as an Item::Error while parsing.
        let has_bad_item = chrono::format::StrftimeItems::new(&out.date_format)
            .any(|item| matches!(item, chrono::format::Item::Error));
        if out.date_format.is_empty() || has_bad_item {
            return Err(DedupError::ConfigValidation(format!(
                "invalid date_format '{}'",
                out.date_format
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name = "JEE physics dedup"
fail_on_skipped = true

[input]
left_column = "q_a"
right_column = "q_b"
sheet = "Pairs"

[output]
selection_file = "sel.csv"
mapping_file = "map.csv"
report_file = "report.csv"
workbook_file = "all.xlsx"
date_format = "%d/%m/%Y"
"#;

    #[test]
    fn parse_full() {
        let config = DedupConfig::from_toml(FULL).unwrap();
        assert_eq!(config.name, "JEE physics dedup");
        assert!(config.fail_on_skipped);
        assert_eq!(config.input.left_column, "q_a");
        assert_eq!(config.input.sheet.as_deref(), Some("Pairs"));
        assert_eq!(config.output.report_file, "report.csv");
        assert_eq!(config.output.date_format, "%d/%m/%Y");
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = DedupConfig::from_toml("").unwrap();
        assert_eq!(config.input.left_column, "question_1");
        assert_eq!(config.input.right_column, "question_2");
        assert!(config.input.sheet.is_none());
        assert_eq!(config.output.selection_file, "final_selection_questions.csv");
        assert_eq!(config.output.mapping_file, "question_id_priority_mapping.csv");
        assert_eq!(
            config.output.report_file,
            "final_consolidated_question_report.csv"
        );
        assert!(!config.fail_on_skipped);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = DedupConfig::from_toml("[input]\nleft_column = \"first\"\n").unwrap();
        assert_eq!(config.input.left_column, "first");
        assert_eq!(config.input.right_column, "question_2");
    }

    #[test]
    fn reject_same_columns() {
        let input = "[input]\nleft_column = \"q\"\nright_column = \"q\"\n";
        let err = DedupConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, DedupError::ConfigValidation(_)));
    }

    #[test]
    fn reject_empty_output_file() {
        let err = DedupConfig::from_toml("[output]\nmapping_file = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("mapping_file"));
    }

    #[test]
    fn reject_bad_date_format() {
        let err = DedupConfig::from_toml("[output]\ndate_format = \"%Q\"\n").unwrap_err();
        assert!(matches!(err, DedupError::ConfigValidation(_)));
    }

    #[test]
    fn reject_type_error() {
        let err = DedupConfig::from_toml("fail_on_skipped = \"yes\"\n").unwrap_err();
        assert!(matches!(err, DedupError::ConfigParse(_)));
    }
}
