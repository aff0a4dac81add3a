use std::path::PathBuf;

use anyhow::Context;
use assay_core::enums::AssignmentType;
use assay_parser::{AssessmentBuilder, BuildPlan, ParsedQuestion, Question};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ValidatedFile {
    path: PathBuf,
    topic: String,
    #[serde(rename = "type")]
    question_type: AssignmentType,
    tags: Vec<String>,
    id: Option<i64>,
    question: Question,
}

impl From<ParsedQuestion> for ValidatedFile {
    fn from(parsed: ParsedQuestion) -> Self {
        let frontmatter = parsed.frontmatter;
        Self {
            path: frontmatter.file_path,
            topic: frontmatter.topic,
            question_type: frontmatter.question_type,
            tags: frontmatter.tags,
            id: frontmatter.id,
            question: parsed.question,
        }
    }
}

#[derive(Debug, Serialize)]
struct RepositorySummary {
    questions: usize,
    assessments: Vec<AssessmentSummary>,
}

#[derive(Debug, Serialize)]
struct AssessmentSummary {
    tag: String,
    sections: Vec<SectionSummary>,
}

#[derive(Debug, Serialize)]
struct SectionSummary {
    title: String,
    questions: usize,
}

impl From<&BuildPlan> for RepositorySummary {
    fn from(plan: &BuildPlan) -> Self {
        Self {
            questions: plan.question_count(),
            assessments: plan
                .assessments
                .iter()
                .map(|assessment| AssessmentSummary {
                    tag: assessment.tag.clone(),
                    sections: assessment
                        .sections()
                        .iter()
                        .map(|section| SectionSummary {
                            title: section.title.clone(),
                            questions: section.assignments.len(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Handle `assay validate`.
pub fn handle(args: &ValidateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.all {
        let plan = AssessmentBuilder::new(&ctx.parser, &ctx.repository)
            .build_all("")
            .context("repository validation failed")?;
        return output(&RepositorySummary::from(&plan), flags.format);
    }

    let validated = validate_files(ctx, &args.files)?;
    output(&validated, flags.format)
}

/// Parse each file in order; stops at the first invalid one.
fn validate_files(ctx: &AppContext, files: &[PathBuf]) -> anyhow::Result<Vec<ValidatedFile>> {
    files
        .iter()
        .map(|path| {
            let relative = ctx.repository.relative(path);
            let content = ctx.repository.read(&relative)?;
            let parsed = ctx.parser.parse_question(&content, &relative)?;
            tracing::debug!(path = %relative.display(), "question is valid");
            Ok(ValidatedFile::from(parsed))
        })
        .collect::<Result<Vec<_>, assay_parser::ParseError>>()
        .context("question validation failed")
}
