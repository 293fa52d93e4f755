use serde::{Deserialize, Serialize};

use crate::chunker::{combine_sentences_into_chunks, divide_transcript_into_sentences};
use crate::cleaner::clean_transcript;
use crate::config::Config;
use crate::error::SummarizerResult;
use crate::model::LazyModel;
use crate::punctuation::{HuggingFacePunctuator, PunctuationRestorer};
use crate::summarizer::{summarize_chunks, HuggingFaceSummarizer, Summarizer};
use crate::transcript::{load_transcript, validate_url, TranscriptLoader, YoutubeTranscriptLoader};

// Main summary struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub video_id: String,
    pub transcript: String,
    pub chunk_count: usize,
    pub summary: String,
}

/// Runs acquisition, cleaning, chunking and summarization for one URL at a
/// time. The model handles are built on first use and then reused.
pub struct VideoSummarizer<L, P, S> {
    loader: L,
    punctuator: LazyModel<P>,
    summarizer: LazyModel<S>,
}

pub type DefaultVideoSummarizer =
    VideoSummarizer<YoutubeTranscriptLoader, HuggingFacePunctuator, HuggingFaceSummarizer>;

impl DefaultVideoSummarizer {
    pub fn from_config(config: Config) -> Self {
        let loader = YoutubeTranscriptLoader::new(config.transcript_language.clone());
        let punctuation_config = config.clone();
        let punctuator = LazyModel::new("punctuation", move || {
            HuggingFacePunctuator::from_config(&punctuation_config)
        });
        let summarizer = LazyModel::new("summarization", move || {
            HuggingFaceSummarizer::from_config(&config)
        });
        VideoSummarizer::new(loader, punctuator, summarizer)
    }
}

impl<L, P, S> VideoSummarizer<L, P, S>
where
    L: TranscriptLoader,
    P: PunctuationRestorer,
    S: Summarizer,
{
    pub fn new(loader: L, punctuator: LazyModel<P>, summarizer: LazyModel<S>) -> Self {
        VideoSummarizer {
            loader,
            punctuator,
            summarizer,
        }
    }

    pub fn process_video(&self, video_url: &str) -> SummarizerResult<Summary> {
        let video_id = validate_url(video_url)?;

        let raw = load_transcript(&video_id, video_url, &self.loader, &self.punctuator)?;
        let transcript = clean_transcript(&raw)?;
        let sentences = divide_transcript_into_sentences(&transcript);
        let chunks = combine_sentences_into_chunks(&sentences);
        tracing::info!(
            %video_id,
            words = transcript.split_whitespace().count(),
            sentences = sentences.len(),
            chunks = chunks.len(),
            "transcript prepared"
        );

        let summary = summarize_chunks(&self.summarizer, &chunks)?;
        tracing::info!(%video_id, chars = summary.len(), "summary generated");

        Ok(Summary {
            video_id,
            transcript,
            chunk_count: chunks.len(),
            summary,
        })
    }

    pub fn get_summary(&self, video_url: &str) -> SummarizerResult<String> {
        self.process_video(video_url).map(|result| result.summary)
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn punctuator(&self) -> &LazyModel<P> {
        &self.punctuator
    }

    pub fn summarizer(&self) -> &LazyModel<S> {
        &self.summarizer
    }
}
