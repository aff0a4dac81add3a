//! # assay-parser
//!
//! Reading question files for assay.
//!
//! A question file is a markdown document with a YAML frontmatter block:
//!
//! ```markdown
//! ---
//! type: multiple-choice
//! tags:
//!   - Backend Developer
//! availablePoints: 2
//! ---
//! Which join keeps unmatched rows from the left table?
//! - [x] LEFT JOIN
//! - [ ] INNER JOIN
//! ```
//!
//! - [`QuestionParser`] validates frontmatter against the tag configuration.
//! - [`qid`] reads and writes the `_qid<N>` marker in file names.
//! - [`QuestionRepository`] scans topic directories and renames files.
//! - [`AssessmentBuilder`] turns a full scan into one pending assessment per tag.

mod builder;
mod error;
mod frontmatter;
mod parser;
pub mod qid;
mod question;
mod repository;

pub use builder::{AssessmentBuilder, BuildPlan};
pub use error::ParseError;
pub use frontmatter::Frontmatter;
pub use parser::QuestionParser;
pub use question::{ChoiceOption, ParsedQuestion, Question};
pub use repository::{QuestionRepository, is_markdown};
