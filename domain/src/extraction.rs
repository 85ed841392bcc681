//! Pulls the summary and action items out of free-form model output.
//!
//! The model answers with text that should contain one fenced block:
//!
//! ````text
//! <prefix>
//! ```yaml
//! <payload>
//! ```
//! <suffix>
//! ````
//!
//! The first `yaml` (or `yml`) block wins. Its payload is decoded as plain YAML
//! data and then checked field by field. Every way the output can miss that shape
//! is reported as a distinct [`OutputFormatErrorKind`].

use crate::error::{output_format_error, Error, OutputFormatErrorKind};
use crate::prompt::FENCE;
use crate::summary::{ActionItem, ParsedOutcome};
use chrono::NaiveDate;
use log::*;
use serde_yaml::{Mapping, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

enum ScanState<'a> {
    SeekingFence,
    InPayload {
        opened_at: usize,
        lines: Vec<&'a str>,
    },
}

/// Decode the first fenced YAML block of `raw` into a [`ParsedOutcome`].
pub fn extract(raw: &str) -> Result<ParsedOutcome, Error> {
    let payload = locate_payload(raw)?;
    if payload.trim().is_empty() {
        return Err(output_format_error(
            OutputFormatErrorKind::EmptyPayload,
            "the yaml block is empty",
        ));
    }

    let document: Value = serde_yaml::from_str(&payload).map_err(|e| {
        warn!("Model output block is not valid YAML: {}", e);
        output_format_error(OutputFormatErrorKind::Malformed, e.to_string())
    })?;

    let outcome = validate(document)?;
    debug!(
        "Extracted summary with {} action items",
        outcome.action_items.len()
    );
    Ok(outcome)
}

fn locate_payload(raw: &str) -> Result<String, Error> {
    let mut state = ScanState::SeekingFence;

    for (number, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        state = match state {
            ScanState::SeekingFence if is_opening_fence(trimmed) => ScanState::InPayload {
                opened_at: number + 1,
                lines: Vec::new(),
            },
            ScanState::SeekingFence => ScanState::SeekingFence,
            ScanState::InPayload { lines, .. } if trimmed.starts_with(FENCE) => {
                return Ok(lines.join("\n"));
            }
            ScanState::InPayload {
                opened_at,
                mut lines,
            } => {
                lines.push(line);
                ScanState::InPayload { opened_at, lines }
            }
        };
    }

    match state {
        ScanState::SeekingFence => Err(output_format_error(
            OutputFormatErrorKind::MissingFence,
            "no ```yaml block found in model output",
        )),
        ScanState::InPayload { opened_at, .. } => Err(output_format_error(
            OutputFormatErrorKind::UnterminatedFence,
            format!("yaml block opened on line {opened_at} is never closed"),
        )),
    }
}

fn is_opening_fence(trimmed: &str) -> bool {
    trimmed
        .strip_prefix(FENCE)
        .map(|label| {
            let label = label.trim();
            label.eq_ignore_ascii_case("yaml") || label.eq_ignore_ascii_case("yml")
        })
        .unwrap_or(false)
}

fn schema_error(detail: impl Into<String>) -> Error {
    output_format_error(OutputFormatErrorKind::Schema, detail)
}

fn validate(document: Value) -> Result<ParsedOutcome, Error> {
    let Value::Mapping(mut root) = document else {
        return Err(schema_error("expected a mapping at the top level"));
    };

    let summary = match root.remove("summary") {
        Some(Value::String(summary)) => summary,
        Some(_) => return Err(schema_error("`summary` must be a string")),
        None => return Err(schema_error("missing `summary`")),
    };

    let entries = match root.remove("action_items") {
        Some(Value::Sequence(entries)) => entries,
        // `action_items:` with nothing after it
        Some(Value::Null) => Vec::new(),
        Some(_) => return Err(schema_error("`action_items` must be a list")),
        None => return Err(schema_error("missing `action_items`")),
    };

    let action_items = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Mapping(fields) => action_item(index, fields),
            _ => Err(schema_error(format!("action_items[{index}] must be a mapping"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedOutcome {
        summary,
        action_items,
    })
}

fn action_item(index: usize, mut fields: Mapping) -> Result<ActionItem, Error> {
    let mut string_field = |name: &str| match fields.remove(name) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(schema_error(format!(
            "action_items[{index}].{name} must be a string"
        ))),
        None => Err(schema_error(format!("action_items[{index}] is missing `{name}`"))),
    };

    let task = string_field("task")?;
    let assignee = string_field("assignee")?.trim().to_string();
    let due_date = string_field("due_date")?;

    if assignee.is_empty() {
        return Err(schema_error(format!(
            "action_items[{index}].assignee must not be empty"
        )));
    }

    let due_date = parse_due_date(due_date.trim()).ok_or_else(|| {
        schema_error(format!(
            "action_items[{index}].due_date \"{due_date}\" is not a YYYY-MM-DD date"
        ))
    })?;

    Ok(ActionItem {
        task,
        assignee,
        due_date,
    })
}

// chrono accepts unpadded fields, so the length pins the exact ISO form.
fn parse_due_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, PipelineErrorKind};

    const STUB_OUTPUT: &str = "```yaml
summary: \"Alice to send report\"
action_items:
- task: \"Send report\"
  assignee: \"Alice\"
  due_date: \"2024-05-01\"
```";

    fn format_kind(err: &Error) -> Option<OutputFormatErrorKind> {
        match err.error_kind {
            DomainErrorKind::Pipeline(PipelineErrorKind::OutputFormat(kind)) => Some(kind),
            _ => None,
        }
    }

    #[test]
    fn test_extracts_stub_engine_output() {
        let outcome = extract(STUB_OUTPUT).unwrap();

        assert_eq!(outcome.summary, "Alice to send report");
        assert_eq!(
            outcome.action_items,
            vec![ActionItem {
                task: "Send report".to_string(),
                assignee: "Alice".to_string(),
                due_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            }]
        );
    }

    #[test]
    fn test_surrounding_text_is_ignored_and_order_kept() {
        let raw = "Sure! Here is the summary you asked for.\n\n  ```YML  \n\
                   summary: Planning sync\n\
                   action_items:\n\
                   - task: Draft agenda\n  assignee: Bob\n  due_date: 2024-06-03\n\
                   - task: Book room\n  assignee: Carol Ann\n  due_date: 2024-06-04\n\
                   - task: Send invites\n  assignee: Dave\n  due_date: 2024-06-05\n\
                   ```\nLet me know if you need anything else.\n```yaml\nsummary: second\n```";

        let outcome = extract(raw).unwrap();

        assert_eq!(outcome.summary, "Planning sync");
        let tasks: Vec<_> = outcome.action_items.iter().map(|i| i.task.as_str()).collect();
        assert_eq!(tasks, ["Draft agenda", "Book room", "Send invites"]);
        assert_eq!(outcome.action_items[1].assignee, "Carol Ann");
    }

    #[test]
    fn test_missing_fence() {
        for raw in ["", "summary: no fence here", "```json\n{}\n```", "``` yaml-ish\n```"] {
            let err = extract(raw).unwrap_err();
            assert_eq!(format_kind(&err), Some(OutputFormatErrorKind::MissingFence), "{raw:?}");
        }
    }

    #[test]
    fn test_unterminated_fence() {
        let err = extract("intro\n```yaml\nsummary: cut off\naction_items: []").unwrap_err();
        assert_eq!(
            format_kind(&err),
            Some(OutputFormatErrorKind::UnterminatedFence)
        );
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_empty_payload() {
        let err = extract("```yaml\n   \n```").unwrap_err();
        assert_eq!(format_kind(&err), Some(OutputFormatErrorKind::EmptyPayload));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = extract("```yaml\nsummary: [unclosed\n```").unwrap_err();
        assert_eq!(format_kind(&err), Some(OutputFormatErrorKind::Malformed));
    }

    #[test]
    fn test_schema_violations() {
        let cases = [
            "- just\n- a list",
            "action_items: []",
            "summary: 42\naction_items: []",
            "summary: ok",
            "summary: ok\naction_items: not a list",
            "summary: ok\naction_items:\n- plain string",
            "summary: ok\naction_items:\n- task: t\n  due_date: 2024-05-01",
            "summary: ok\naction_items:\n- task: t\n  assignee: \"  \"\n  due_date: 2024-05-01",
            "summary: ok\naction_items:\n- task: t\n  assignee: A\n  due_date: 2024-5-1",
            "summary: ok\naction_items:\n- task: t\n  assignee: A\n  due_date: 2024-02-30",
            "summary: ok\naction_items:\n- task: t\n  assignee: A\n  due_date: next Friday",
            "summary: ok\naction_items:\n- task: [1, 2]\n  assignee: A\n  due_date: 2024-05-01",
        ];
        for payload in cases {
            let err = extract(&format!("```yaml\n{payload}\n```")).unwrap_err();
            assert_eq!(
                format_kind(&err),
                Some(OutputFormatErrorKind::Schema),
                "{payload:?}"
            );
        }
    }

    #[test]
    fn test_null_action_items_is_empty_list() {
        let outcome = extract("```yaml\nsummary: Nothing to do\naction_items:\n```").unwrap();
        assert!(outcome.action_items.is_empty());
    }

    #[test]
    fn test_item_count_matches_block_entries() {
        for count in [0usize, 1, 5] {
            let items: String = (0..count)
                .map(|i| format!("- task: Task {i}\n  assignee: Person {i}\n  due_date: 2024-07-0{}\n", i + 1))
                .collect();
            let raw = format!("```yaml\nsummary: s\naction_items:\n{items}```");

            let outcome = extract(&raw).unwrap();
            assert_eq!(outcome.action_items.len(), count);
        }
    }
}
