use crate::client::EvaluationClient;
use crate::config::EvaluationConfig;
use crate::error::EvalError;
use crate::input;
use crate::models::{EvaluationReport, EvaluationRequest};
use crate::progress::{ProgressReporter, Stage};
use crate::report::{self, ReportSection};
use log::info;

/// Outcome of one successful run, held in the session slot.
pub struct EvaluationOutcome {
    pub report: EvaluationReport,
    pub sections: Vec<ReportSection>,
}

/// Session state owned by the caller: at most one report at a time.
///
/// A successful run overwrites the slot atomically; a failed run leaves it
/// exactly as it was, never partially updated.
#[derive(Default)]
pub struct Session {
    current: Option<EvaluationOutcome>,
}

impl Session {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// The report from the most recent successful run, if any.
    pub fn current_report(&self) -> Option<&EvaluationOutcome> {
        self.current.as_ref()
    }
}

/// Orchestrates one full evaluation run: validate, build, call, assemble.
pub struct Runner {
    client: EvaluationClient,
    config: EvaluationConfig,
}

impl Runner {
    pub fn new(client: EvaluationClient, config: EvaluationConfig) -> Self {
        Self { client, config }
    }

    /// Run the pipeline once. Any failure aborts immediately, emits the
    /// terminal progress error, and leaves the session slot untouched.
    pub async fn run(
        &self,
        session: &mut Session,
        raw_conversation: Option<&str>,
        raw_context: Option<&str>,
        progress: &mut ProgressReporter,
    ) -> Result<(), EvalError> {
        match self
            .run_inner(session, raw_conversation, raw_context, progress)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                progress.fail(&err.to_string());
                Err(err)
            }
        }
    }

    async fn run_inner(
        &self,
        session: &mut Session,
        raw_conversation: Option<&str>,
        raw_context: Option<&str>,
        progress: &mut ProgressReporter,
    ) -> Result<(), EvalError> {
        progress.advance(Stage::Parsing);
        let (conversation, context) = input::validate(raw_conversation, raw_context)?;

        let request = EvaluationRequest::build(conversation, context, &self.config);

        progress.advance(Stage::SendingRequest);
        let (report, raw) = self.client.evaluate(&request).await?;
        progress.advance(Stage::ResponseReceived);
        progress.advance(Stage::ProcessingResults);

        progress.advance(Stage::RenderingReport);
        let sections = report::assemble(&report, &raw);

        session.current = Some(EvaluationOutcome { report, sections });
        progress.advance(Stage::Complete);
        info!("evaluation run completed ({})", request.model_name);

        Ok(())
    }
}
