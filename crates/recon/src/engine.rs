use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::{DedupConfig, InputConfig};
use crate::consolidate::Consolidator;
use crate::error::DedupError;
use crate::evidence::compute_summary;
use crate::model::{DedupInput, DedupMeta, DedupResult, QuestionPair, SkippedPair};
use crate::resolve::resolve;

/// Resolve every pair, consolidate, and summarize.
pub fn run(config: &DedupConfig, input: &DedupInput) -> Result<DedupResult, DedupError> {
    run_at(config, input, Local::now())
}

/// [`run`] with an explicit clock, for reproducible report dates.
pub fn run_at(
    config: &DedupConfig,
    input: &DedupInput,
    now: DateTime<Local>,
) -> Result<DedupResult, DedupError> {
    config.validate()?;

    let mut outcomes = Vec::with_capacity(input.pairs.len());
    let mut skipped = Vec::new();
    let mut consolidator = Consolidator::new();

    for pair in &input.pairs {
        match resolve(pair) {
            Ok(outcome) => {
                consolidator.observe(&outcome);
                outcomes.push(outcome);
            }
            Err(reason) => {
                debug!(row = pair.row, %reason, "pair skipped");
                skipped.push(SkippedPair {
                    row: pair.row,
                    reason,
                });
            }
        }
    }

    let consolidation = consolidator.finish();
    let summary = compute_summary(input.pairs.len(), &outcomes, &skipped, &consolidation);

    info!(
        pairs = summary.total_pairs,
        resolved = summary.resolved,
        skipped = summary.skipped,
        questions = summary.distinct_questions,
        corrected = summary.corrected_selections,
        "dedup run complete"
    );

    Ok(DedupResult {
        meta: DedupMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: now.with_timezone(&chrono::Utc).to_rfc3339(),
            processing_date: now.format(&config.output.date_format).to_string(),
        },
        summary,
        outcomes,
        skipped,
        mapping: consolidation.mapping,
        selections: consolidation.selections,
    })
}

/// Build pairs from a header row and data rows, using the configured columns.
/// Short rows yield empty texts. Rows are numbered from 1.
pub fn pairs_from_table<I>(
    headers: &[String],
    rows: I,
    input: &InputConfig,
) -> Result<Vec<QuestionPair>, DedupError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let idx = |name: &str| -> Result<usize, DedupError> {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| DedupError::MissingColumn {
                column: name.into(),
            })
    };

    let left_idx = idx(&input.left_column)?;
    let right_idx = idx(&input.right_column)?;

    let pairs = rows
        .into_iter()
        .enumerate()
        .map(|(i, fields)| {
            let cell = |j: usize| fields.get(j).cloned().unwrap_or_default();
            QuestionPair::new(i + 1, cell(left_idx), cell(right_idx))
        })
        .collect();

    Ok(pairs)
}

/// Load pairs from CSV text with a header row.
pub fn load_csv_pairs(
    csv_data: &str,
    delimiter: u8,
    input: &InputConfig,
) -> Result<Vec<QuestionPair>, DedupError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DedupError::Input(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DedupError::Input(e.to_string()))?;
        rows.push(record.iter().map(|f| f.to_string()).collect::<Vec<_>>());
    }

    pairs_from_table(&headers, rows, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::model::{PriorityTier, Side};

    const A: &str = "507f1f77bcf86cd799439011";
    const B: &str = "507f191e810c19729de860ea";

    #[test]
    fn load_csv_basic() {
        let csv = format!(
            "\
question_1,question_2,similarity
\"JEE Advanced, 2019 Question ID: {A}\",NCERT Question ID: {B},0.97
only left,,0.5
"
        );
        let pairs = load_csv_pairs(&csv, b',', &InputConfig::default()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].row, 1);
        assert!(pairs[0].left.starts_with("JEE Advanced, 2019"));
        assert_eq!(pairs[1].right, "");
    }

    #[test]
    fn load_csv_custom_columns_and_bom() {
        let csv = "\u{feff}a;b\nx;y\n";
        let input = InputConfig {
            left_column: "b".into(),
            right_column: "a".into(),
            sheet: None,
        };
        let pairs = load_csv_pairs(csv, b';', &input).unwrap();
        assert_eq!(pairs[0].left, "y");
        assert_eq!(pairs[0].right, "x");
    }

    #[test]
    fn load_csv_missing_column() {
        let err = load_csv_pairs("question_1,other\na,b\n", b',', &InputConfig::default())
            .unwrap_err();
        assert!(matches!(err, DedupError::MissingColumn { ref column } if column == "question_2"));
    }

    #[test]
    fn run_end_to_end() {
        let input = DedupInput {
            pairs: vec![
                QuestionPair::new(
                    1,
                    format!("JEE Advanced ... Question ID: {A}"),
                    format!("NCERT ... Question ID: {B}"),
                ),
                QuestionPair::new(2, format!("JEE Main Question ID: {A}"), "no id"),
            ],
        };
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let result = run_at(&DedupConfig::default(), &input, now).unwrap();

        assert_eq!(result.meta.processing_date, "2026-03-14");
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.outcomes[0].chosen, Side::Left);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].row, 2);
        assert_eq!(result.mapping.get(A), Some(PriorityTier::JeeAdvanced));
        assert_eq!(result.summary.skipped, 1);
        assert_eq!(result.selections.len(), 1);
    }

    #[test]
    fn run_rejects_invalid_config() {
        let mut config = DedupConfig::default();
        config.input.right_column = config.input.left_column.clone();
        assert!(run(&config, &DedupInput::default()).is_err());
    }
}
