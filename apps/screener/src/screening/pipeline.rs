//! Three-stage screening pipeline: extract → match → explain.
//!
//! Each stage is one completion call whose output feeds the next stage.
//! Calls are strictly sequential; the first failure ends the run for that
//! document with no partial result and no retry.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::{CompletionClient, LlmError};
use crate::screening::prompts::{EXPLAINER_PROMPT, EXTRACTOR_PROMPT, MATCHER_PROMPT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Match,
    Explain,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Match => "match",
            Stage::Explain => "explain",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    pub source: LlmError,
}

/// The three texts produced for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub extracted_info: String,
    pub match_report: String,
    pub explanation: String,
}

/// Payload for the match stage.
pub fn match_input(info: &str, job_description: &str) -> String {
    format!("Resume Info:\n{info}\n\nJob Description:\n{job_description}")
}

pub async fn run_pipeline(
    llm: &dyn CompletionClient,
    resume_text: &str,
    job_description: &str,
) -> Result<PipelineResult, PipelineError> {
    let extracted_info = run_stage(llm, Stage::Extract, EXTRACTOR_PROMPT, resume_text).await?;

    let match_report = run_stage(
        llm,
        Stage::Match,
        MATCHER_PROMPT,
        &match_input(&extracted_info, job_description),
    )
    .await?;

    let explanation = run_stage(llm, Stage::Explain, EXPLAINER_PROMPT, &match_report).await?;

    Ok(PipelineResult {
        extracted_info,
        match_report,
        explanation,
    })
}

async fn run_stage(
    llm: &dyn CompletionClient,
    stage: Stage,
    system_prompt: &str,
    input: &str,
) -> Result<String, PipelineError> {
    debug!("Running {stage} stage ({} input chars)", input.len());
    llm.complete(system_prompt, input)
        .await
        .map_err(|source| PipelineError { stage, source })
}
