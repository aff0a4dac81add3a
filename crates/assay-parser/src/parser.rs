//! `QuestionParser`: turns question file content into validated frontmatter.

use std::path::Path;

use assay_config::TagConfig;
use assay_core::enums::AssignmentType;

use crate::error::ParseError;
use crate::frontmatter::{self, Frontmatter, RawFrontmatter};
use crate::qid;
use crate::question::{ParsedQuestion, Question};

/// Parses question files against the configured tag set.
///
/// Pure over its inputs: callers read the file and pass its content along with
/// the repository-relative path it came from.
#[derive(Debug, Clone)]
pub struct QuestionParser {
    tags: TagConfig,
}

impl QuestionParser {
    #[must_use]
    pub const fn new(tags: TagConfig) -> Self {
        Self { tags }
    }

    #[must_use]
    pub const fn tags(&self) -> &TagConfig {
        &self.tags
    }

    /// Parse the frontmatter of a question file.
    ///
    /// # Errors
    ///
    /// Returns `MalformedQuestionFormat` when the content does not split into
    /// frontmatter and body, `InvalidFrontmatter` for bad YAML,
    /// `UnknownQuestionType` for an unrecognised `type`, `UnknownTag` for the
    /// first tag missing from the tag configuration, and `MissingTopic` for a
    /// file outside any topic directory.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Frontmatter, ParseError> {
        let (block, _) = frontmatter::split(content, path)?;
        self.frontmatter_from_block(&block, path)
    }

    /// Parse a question file in full, including its body.
    ///
    /// # Errors
    ///
    /// Same as [`QuestionParser::parse`].
    pub fn parse_question(&self, content: &str, path: &Path) -> Result<ParsedQuestion, ParseError> {
        let (block, body) = frontmatter::split(content, path)?;
        let frontmatter = self.frontmatter_from_block(&block, path)?;
        let question = Question::from_body(frontmatter.question_type, &body);
        Ok(ParsedQuestion {
            frontmatter,
            question,
        })
    }

    fn frontmatter_from_block(&self, block: &str, path: &Path) -> Result<Frontmatter, ParseError> {
        let raw = RawFrontmatter::from_yaml(block, path)?;

        let question_type = AssignmentType::parse(raw.question_type.trim()).map_err(|_| {
            ParseError::UnknownQuestionType {
                path: path.to_path_buf(),
                value: raw.question_type.clone(),
            }
        })?;

        let tags = raw.distinct_tags();
        if let Some(unknown) = tags.iter().find(|tag| !self.tags.contains(tag)) {
            return Err(ParseError::UnknownTag {
                path: path.to_path_buf(),
                tag: unknown.clone(),
            });
        }

        let topic = frontmatter::topic_of(path)?;

        Ok(Frontmatter {
            question_type,
            tags,
            id: qid::extract_id(path),
            file_path: path.to_path_buf(),
            topic,
            available_points: raw.available_points,
            available_seconds: raw.available_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn parser() -> QuestionParser {
        QuestionParser::new(TagConfig::new(["backend", "frontend"]).unwrap())
    }

    #[rstest]
    fn parses_frontmatter_fields(parser: QuestionParser) {
        let content = "---\ntype: multiple-choice\ntags:\n  - backend\n  - frontend\navailablePoints: 3\navailableSeconds: 90\n---\nPick one.\n- [x] yes\n- [ ] no\n";
        let frontmatter = parser
            .parse(content, Path::new("Databases/joins_qid42.md"))
            .unwrap();

        assert_eq!(frontmatter.question_type, AssignmentType::MultipleChoice);
        assert_eq!(frontmatter.tags, vec!["backend", "frontend"]);
        assert_eq!(frontmatter.id, Some(42));
        assert_eq!(frontmatter.topic, "Databases");
        assert_eq!(frontmatter.available_points, Some(3));
        assert_eq!(frontmatter.available_seconds, Some(90));
        assert_eq!(frontmatter.base_file_path(), Path::new("Databases/joins.md"));
    }

    #[rstest]
    fn new_question_has_no_id(parser: QuestionParser) {
        let content = "---\ntype: open\ntags: [backend]\n---\nExplain ACID.";
        let frontmatter = parser.parse(content, Path::new("Databases/acid.md")).unwrap();
        assert_eq!(frontmatter.id, None);
        assert_eq!(frontmatter.available_points, None);
    }

    #[rstest]
    fn unknown_type_names_the_value(parser: QuestionParser) {
        let content = "---\ntype: unknown-type\ntags: [backend]\n---\nbody";
        let err = parser.parse(content, Path::new("Databases/q.md")).unwrap_err();
        match &err {
            ParseError::UnknownQuestionType { value, .. } => assert_eq!(value, "unknown-type"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("'unknown-type'"));
    }

    #[rstest]
    fn unknown_tag_names_tag_and_file(parser: QuestionParser) {
        let content = "---\ntype: open\ntags: [backend, devops]\n---\nbody";
        let err = parser.parse(content, Path::new("Ops/deploy.md")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("devops"), "{message}");
        assert!(message.contains("Ops/deploy.md"), "{message}");
    }

    #[rstest]
    #[case("no delimiters at all")]
    #[case("---\ntype: open\ntags: [backend]\n---\n")]
    #[case("---\n---\n")]
    fn malformed_content_is_rejected(parser: QuestionParser, #[case] content: &str) {
        let err = parser.parse(content, Path::new("Databases/q.md")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedQuestionFormat { .. }));
    }

    #[rstest]
    fn missing_tags_key_is_invalid(parser: QuestionParser) {
        let err = parser
            .parse("---\ntype: open\n---\nbody", Path::new("Databases/q.md"))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidFrontmatter { .. }));
    }

    #[rstest]
    fn parse_question_builds_body(parser: QuestionParser) {
        let content = "---\ntype: coding\ntags: [backend]\n---\nReverse a string.";
        let parsed = parser
            .parse_question(content, Path::new("Python/reverse/reverse.md"))
            .unwrap();
        assert_eq!(parsed.frontmatter.topic, "Python");
        assert_eq!(
            parsed.question,
            Question::Coding {
                description: "Reverse a string.".into()
            }
        );
    }
}
