//! Main Conjure struct: load a response file and open a session on it.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::edit::{EditFunction, OptionsPolicy};
use crate::error::{ConjureError, Result};
use crate::inference::{InferenceConfig, QuestionInferencer, QuestionStatistics};
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::materialize::{ResponseMaterializer, ResponseTable};
use crate::question::QuestionSet;
use crate::session::ConjureSession;

/// File extensions that [`Conjure::load`] knows how to read.
const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Configuration for loading responses.
#[derive(Debug, Clone, Default)]
pub struct ConjureConfig {
    pub parser: ParserConfig,
    pub inference: InferenceConfig,
    /// What happens to options left behind by a type change.
    pub options_policy: OptionsPolicy,
    /// Edits applied as soon as the session is created.
    pub question_edits: Option<EditFunction>,
}

impl ConjureConfig {
    pub fn with_options_policy(mut self, policy: OptionsPolicy) -> Self {
        self.options_policy = policy;
        self
    }

    pub fn with_question_edits(mut self, edits: EditFunction) -> Self {
        self.question_edits = Some(edits);
        self
    }
}

/// A column-by-column summary of an inferred file.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub source: SourceMetadata,
    pub questions: QuestionSet,
    /// One entry per question, in question order.
    pub statistics: Vec<QuestionStatistics>,
}

/// Entry point: parses response files and infers their questions.
#[derive(Debug, Clone, Default)]
pub struct Conjure {
    config: ConjureConfig,
    parser: Parser,
    inferencer: QuestionInferencer,
}

impl Conjure {
    pub fn new() -> Self {
        Self::with_config(ConjureConfig::default())
    }

    pub fn with_config(config: ConjureConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let inferencer = QuestionInferencer::with_config(config.inference.clone());
        Self {
            config,
            parser,
            inferencer,
        }
    }

    pub fn config(&self) -> &ConjureConfig {
        &self.config
    }

    /// Load a response file and open a session on its inferred questions.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ConjureSession> {
        let (table, source) = self.read(path.as_ref())?;
        Ok(self.from_table(&table)?.with_source(source))
    }

    /// Open a session on an already parsed table.
    pub fn from_table(&self, table: &DataTable) -> Result<ConjureSession> {
        let questions = self
            .inferencer
            .infer_questions(table)?
            .with_policy(self.config.options_policy);
        let responses = ResponseTable::from_table(&self.inferencer.apply_codebook(table)?);
        let materializer = Arc::new(ResponseMaterializer::new(Arc::new(responses)));

        let session = match &self.config.question_edits {
            Some(edits) => ConjureSession::with_hook(questions, materializer, edits.clone())?,
            None => ConjureSession::new(questions, materializer),
        };
        info!(
            questions = session.inferred().len(),
            respondents = table.row_count(),
            construction_edits = session.log().len(),
            "session ready"
        );
        Ok(session)
    }

    /// Inferred questions and response statistics for a file, without a session.
    pub fn inspect(&self, path: impl AsRef<Path>) -> Result<Inspection> {
        let (table, source) = self.read(path.as_ref())?;
        let questions = self.inferencer.infer_questions(&table)?;
        let statistics = self.inferencer.statistics(&table)?;
        Ok(Inspection {
            source,
            questions,
            statistics,
        })
    }

    fn read(&self, path: &Path) -> Result<(DataTable, SourceMetadata)> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ConjureError::UnsupportedFormat(format!(
                "Unsupported file type: {}",
                path.display()
            )));
        }

        info!(path = %path.display(), "loading responses");
        self.parser.parse_file(path)
    }
}
