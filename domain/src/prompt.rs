//! Builds the summarization task sent to the execution engine.
//!
//! The transcript is untrusted text. It is escaped before it is embedded in the
//! instruction template, and the task document itself is assembled from typed
//! values, so nothing in a transcript can change the task structure or smuggle a
//! fence marker into the instructions.

use crate::error::Error;
use crate::summary::TranscriptRequest;
use meeting_ai::types::execution::{Message, PromptStep, Role, Step, TaskDefinition};

/// Marker that opens and closes a fenced block.
pub const FENCE: &str = "```";

/// Info string of the fenced block the model must answer with.
pub const OUTPUT_FENCE_LABEL: &str = "yaml";

const TASK_NAME: &str = "Meeting Summarizer Task";
const TASK_DESCRIPTION: &str = "Summarize a meeting transcript and generate action items.";

// Rendered by the engine from the agent registered at startup.
const SYSTEM_PROMPT: &str = "You are {{agent.name}}. {{agent.about}}";

const OUTPUT_SHAPE: &str = r#"summary: "<string>"
action_items:
- task: "<string>"
  assignee: "<string>"
  due_date: "<YYYY-MM-DD>""#;

/// Shape of the answer the extractor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputContract {
    pub fence_label: &'static str,
    pub shape: &'static str,
}

impl OutputContract {
    /// The contract rendered as the fenced example included in the instructions.
    pub fn fenced_example(&self) -> String {
        format!("{FENCE}{}\n{}\n{FENCE}", self.fence_label, self.shape)
    }
}

pub const OUTPUT_CONTRACT: OutputContract = OutputContract {
    fence_label: OUTPUT_FENCE_LABEL,
    shape: OUTPUT_SHAPE,
};

/// Immutable, request-specific description of one summarization task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    name: String,
    description: String,
    instructions: String,
    contract: OutputContract,
}

impl TaskSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// User message holding the escaped transcript and the output contract.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn contract(&self) -> &OutputContract {
        &self.contract
    }

    /// The task document registered with the engine: a single prompt step whose
    /// completion text is returned unwrapped.
    pub fn to_definition(&self) -> TaskDefinition {
        TaskDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            tools: vec![],
            main: vec![Step::Prompt(PromptStep {
                prompt: vec![
                    Message {
                        role: Role::System,
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    Message {
                        role: Role::User,
                        content: self.instructions.clone(),
                    },
                ],
                unwrap: true,
            })],
        }
    }
}

/// Build the task spec for a transcript.
///
/// Fails with a validation error when the transcript is empty or blank.
pub fn build(transcript: &str) -> Result<TaskSpec, Error> {
    let request = TranscriptRequest::new(Some(transcript))?;
    let escaped = escape(request.transcript());

    let instructions = format!(
        "Here is the transcript of a meeting: \"{escaped}\"\n\n\
         Please summarize the key points and generate action items.\n\
         For each action item, include the assignee's name and a due date.\n\
         Return your output in the following structure:\n\n{}\n",
        OUTPUT_CONTRACT.fenced_example()
    );

    Ok(TaskSpec {
        name: TASK_NAME.to_string(),
        description: TASK_DESCRIPTION.to_string(),
        instructions,
        contract: OUTPUT_CONTRACT,
    })
}

/// Escape text for embedding inside a double-quoted string of the template.
///
/// Quotes and line breaks would end the quoted region, backticks could forge a
/// fence and braces could open an engine template expression.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '`' => escaped.push_str("\\`"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Inverse of [`escape`]. Returns `None` for a dangling backslash or an escape
/// sequence `escape` never produces.
pub fn unescape(text: &str) -> Option<String> {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        let original = match chars.next()? {
            '\\' => '\\',
            '"' => '"',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '`' => '`',
            '{' => '{',
            '}' => '}',
            _ => return None,
        };
        unescaped.push(original);
    }
    Some(unescaped)
}
