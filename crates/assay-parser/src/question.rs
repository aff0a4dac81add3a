//! Question bodies, one variant per assignment type.

use assay_core::enums::AssignmentType;
use serde::Serialize;

use crate::frontmatter::Frontmatter;

/// One answer option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub text: String,
    pub is_correct: bool,
}

/// Parsed question body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice {
        description: String,
        options: Vec<ChoiceOption>,
    },
    Open {
        description: String,
    },
    Coding {
        description: String,
    },
}

impl Question {
    /// Interpret `body` according to `question_type`.
    #[must_use]
    pub fn from_body(question_type: AssignmentType, body: &str) -> Self {
        match question_type {
            AssignmentType::MultipleChoice => parse_multiple_choice(body),
            AssignmentType::Open => Self::Open {
                description: body.to_string(),
            },
            AssignmentType::Coding => Self::Coding {
                description: body.to_string(),
            },
        }
    }

    #[must_use]
    pub const fn assignment_type(&self) -> AssignmentType {
        match self {
            Self::MultipleChoice { .. } => AssignmentType::MultipleChoice,
            Self::Open { .. } => AssignmentType::Open,
            Self::Coding { .. } => AssignmentType::Coding,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::MultipleChoice { description, .. }
            | Self::Open { description }
            | Self::Coding { description } => description,
        }
    }
}

/// A question file parsed in full: metadata plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub frontmatter: Frontmatter,
    pub question: Question,
}

/// Description is everything before the first list line; options are lines
/// shaped like `- [x] text` or `- [ ] text`.
fn parse_multiple_choice(body: &str) -> Question {
    let mut description = Vec::new();
    let mut options = Vec::new();
    let mut in_list = false;

    for line in body.lines() {
        if let Some(option) = parse_option(line) {
            options.push(option);
            in_list = true;
        } else if line.trim_start().starts_with("- ") {
            in_list = true;
        } else if !in_list {
            description.push(line);
        }
    }

    Question::MultipleChoice {
        description: description.join("\n").trim().to_string(),
        options,
    }
}

fn parse_option(line: &str) -> Option<ChoiceOption> {
    let rest = line.trim().strip_prefix('-')?.trim_start().strip_prefix('[')?;
    let mut chars = rest.chars();
    let mark = chars.next()?;
    let is_correct = match mark {
        'x' | 'X' => true,
        ' ' => false,
        _ => return None,
    };
    let text = chars.as_str().strip_prefix(']')?.trim();
    Some(ChoiceOption {
        text: text.to_string(),
        is_correct,
    })
}
