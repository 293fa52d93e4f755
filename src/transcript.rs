use std::fmt;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::error::{SummarizerError, SummarizerResult};
use crate::model::LazyModel;
use crate::punctuation::PunctuationRestorer;

/// Transcripts with fewer periods than this are treated as unpunctuated.
pub const MIN_PERIODS_FOR_PUNCTUATED: usize = 25;

/// One loaded transcript plus the source metadata the loader attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDocument {
    pub page_content: String,
    pub source: String,
}

// Rendered form keeps the metadata tail; the cleaner cuts it off.
impl fmt::Display for TranscriptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} metadata={{'source': '{}'}}",
            self.page_content, self.source
        )
    }
}

pub fn render_documents(documents: &[TranscriptDocument]) -> String {
    documents
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(" ")
}

pub trait TranscriptLoader {
    fn load(&self, video_url: &str) -> Result<Vec<TranscriptDocument>>;
}

fn youtube_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://(?:www\.)?youtu(?:\.be/|be\.com/watch\?v=)([\w-]+)")
            .expect("static regex compile")
    })
}

pub fn extract_video_id(video_url: &str) -> Option<String> {
    youtube_url_pattern()
        .captures(video_url)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Checks the URL shape and returns the video id it names.
pub fn validate_url(video_url: &str) -> SummarizerResult<String> {
    if video_url.is_empty() {
        return Err(SummarizerError::invalid_input("Video URL cannot be empty."));
    }
    extract_video_id(video_url)
        .ok_or_else(|| SummarizerError::invalid_input("Invalid or unsupported video URL."))
}

/// Fetches the transcript for `video_url`, restoring punctuation when the
/// transcript looks unpunctuated.
pub fn get_video_transcript_from_url<L, P>(
    video_url: &str,
    loader: &L,
    punctuator: &LazyModel<P>,
) -> SummarizerResult<String>
where
    L: TranscriptLoader,
    P: PunctuationRestorer,
{
    let video_id = validate_url(video_url)?;
    load_transcript(&video_id, video_url, loader, punctuator)
}

/// Acquisition for a URL already checked by [`validate_url`].
pub(crate) fn load_transcript<L, P>(
    video_id: &str,
    video_url: &str,
    loader: &L,
    punctuator: &LazyModel<P>,
) -> SummarizerResult<String>
where
    L: TranscriptLoader,
    P: PunctuationRestorer,
{
    tracing::info!(%video_id, "loading transcript");

    let documents = loader.load(video_url)?;
    let transcript = render_documents(&documents);
    if transcript.is_empty() {
        return Err(SummarizerError::NoTranscript);
    }

    let periods = transcript.matches('.').count();
    if periods < MIN_PERIODS_FOR_PUNCTUATED {
        tracing::info!(periods, "transcript looks unpunctuated, restoring punctuation");
        return Ok(punctuator.get()?.restore_punctuation(&transcript)?);
    }

    tracing::debug!(periods, chars = transcript.len(), "transcript loaded");
    Ok(transcript)
}

// Caption track entry embedded in the watch page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

// Response structs for the json3 caption format
#[derive(Debug, Deserialize)]
struct Json3Transcript {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Loads captions straight from YouTube: the watch page lists the caption
/// tracks, and the chosen track is downloaded in `json3` form.
pub struct YoutubeTranscriptLoader {
    agent: ureq::Agent,
    base_url: String,
    language: String,
}

impl YoutubeTranscriptLoader {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.youtube.com";

    pub fn new(language: impl Into<String>) -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL, language)
    }

    /// Loader that reads watch pages from `base_url` instead of youtube.com.
    pub fn with_base_url(base_url: impl Into<String>, language: impl Into<String>) -> Self {
        YoutubeTranscriptLoader {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("youtube_summarizer/", env!("CARGO_PKG_VERSION")))
                .build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
        }
    }

    fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch?v={video_id}", self.base_url);
        tracing::debug!(%url, "fetching watch page");
        self.agent
            .get(&url)
            .set("Accept-Language", "en-US,en;q=0.9")
            .call()
            .context("Failed to fetch video page")?
            .into_string()
            .context("Failed to read video page")
    }

    fn fetch_track(&self, track: &CaptionTrack) -> Result<String> {
        let url = format!("{}&fmt=json3", track.base_url);
        let body = self
            .agent
            .get(&url)
            .call()
            .context("Failed to fetch transcript")?
            .into_string()
            .context("Failed to read transcript")?;
        let parsed: Json3Transcript =
            serde_json::from_str(&body).context("Failed to parse transcript JSON")?;
        Ok(json3_to_text(&parsed))
    }
}

impl TranscriptLoader for YoutubeTranscriptLoader {
    fn load(&self, video_url: &str) -> Result<Vec<TranscriptDocument>> {
        let video_id = extract_video_id(video_url)
            .context("Failed to extract video ID from URL")?;
        let page = self.fetch_watch_page(&video_id)?;
        let tracks = extract_caption_tracks(&page)?;
        let Some(track) = pick_track(&tracks, &self.language) else {
            tracing::warn!(%video_id, "video has no caption tracks");
            return Ok(Vec::new());
        };
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "using caption track"
        );

        let page_content = self.fetch_track(track)?;
        if page_content.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![TranscriptDocument {
            page_content,
            source: video_id,
        }])
    }
}

fn extract_caption_tracks(page: &str) -> Result<Vec<CaptionTrack>> {
    const MARKER: &str = "\"captionTracks\":";
    let Some(start) = page.find(MARKER) else {
        return Ok(Vec::new());
    };
    let rest = &page[start + MARKER.len()..];
    match serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
    {
        Some(tracks) => tracks.context("Failed to parse caption track list"),
        None => Ok(Vec::new()),
    }
}

// Manual tracks in the wanted language first, then generated ones, then anything.
fn pick_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let matches_language = |track: &&CaptionTrack| {
        track.language_code == language || track.language_code.starts_with(&format!("{language}-"))
    };
    tracks
        .iter()
        .filter(matches_language)
        .find(|track| !track.is_generated())
        .or_else(|| tracks.iter().find(matches_language))
        .or_else(|| tracks.first())
}

fn json3_to_text(transcript: &Json3Transcript) -> String {
    transcript
        .events
        .iter()
        .map(|event| {
            event
                .segs
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>()
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<String>>()
        .join(" ")
}
