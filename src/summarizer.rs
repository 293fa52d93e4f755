use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::SummarizerResult;
use crate::model::LazyModel;

// Generation settings sent with every batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        SummaryParams {
            max_length: 100,
            min_length: 1,
            do_sample: false,
        }
    }
}

// One model output per input chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryText {
    pub summary_text: String,
}

pub trait Summarizer {
    /// Summarizes the whole batch in one call, one output per chunk in order.
    fn summarize(&self, chunks: &[String], params: &SummaryParams) -> Result<Vec<SummaryText>>;
}

pub struct HuggingFaceSummarizer {
    agent: ureq::Agent,
    api_token: String,
    api_url: String,
}

impl HuggingFaceSummarizer {
    pub fn new(api_token: String, api_url: String) -> Self {
        HuggingFaceSummarizer {
            agent: ureq::Agent::new(),
            api_token,
            api_url,
        }
    }

    pub fn from_config(config: &Config) -> SummarizerResult<Self> {
        let token = config.require_token()?;
        Ok(Self::new(
            token.to_string(),
            config.model_url(&config.summarization_model),
        ))
    }
}

impl Summarizer for HuggingFaceSummarizer {
    fn summarize(&self, chunks: &[String], params: &SummaryParams) -> Result<Vec<SummaryText>> {
        tracing::debug!(url = %self.api_url, chunks = chunks.len(), "calling summarization model");
        self.agent
            .post(&self.api_url)
            .set("Authorization", &format!("Bearer {}", self.api_token))
            .send_json(ureq::json!({
                "inputs": chunks,
                "parameters": params,
            }))
            .context("Failed to call summarization model")?
            .into_json()
            .context("Failed to parse summarization model response")
    }
}

/// Summarizes every chunk in one batched call and joins the outputs with
/// single spaces. No chunks means an empty summary and no model call.
pub fn summarize_chunks<S: Summarizer>(
    summarizer: &LazyModel<S>,
    chunks: &[String],
) -> SummarizerResult<String> {
    if chunks.is_empty() {
        tracing::info!("no chunks to summarize");
        return Ok(String::new());
    }

    let summaries = summarizer
        .get()?
        .summarize(chunks, &SummaryParams::default())?;
    if summaries.len() != chunks.len() {
        tracing::warn!(
            chunks = chunks.len(),
            summaries = summaries.len(),
            "summarization model returned an unexpected number of summaries"
        );
    }

    Ok(summaries
        .into_iter()
        .map(|summ| summ.summary_text)
        .collect::<Vec<String>>()
        .join(" "))
}
