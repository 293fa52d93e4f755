use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::Config;
use crate::error::SummarizerResult;

/// Words sent per request; the token classifier only sees a bounded window.
const BATCH_WORDS: usize = 230;

const STRIPPED_MARKS: &[char] = &['.', ',', ';', ':', '!', '?'];

pub trait PunctuationRestorer {
    fn restore_punctuation(&self, text: &str) -> Result<String>;
}

// One labelled span returned by the token-classification endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PunctuationPrediction {
    #[serde(alias = "entity")]
    pub entity_group: String,
    pub start: usize,
    pub end: usize,
}

impl PunctuationPrediction {
    fn mark(&self) -> Option<&'static str> {
        match self.entity_group.as_str() {
            "." => Some("."),
            "," => Some(","),
            "?" => Some("?"),
            "-" => Some("-"),
            ":" => Some(":"),
            _ => None,
        }
    }
}

pub struct HuggingFacePunctuator {
    agent: ureq::Agent,
    api_token: String,
    api_url: String,
}

impl HuggingFacePunctuator {
    pub fn new(api_token: String, api_url: String) -> Self {
        HuggingFacePunctuator {
            agent: ureq::Agent::new(),
            api_token,
            api_url,
        }
    }

    pub fn from_config(config: &Config) -> SummarizerResult<Self> {
        let token = config.require_token()?;
        Ok(Self::new(
            token.to_string(),
            config.model_url(&config.punctuation_model),
        ))
    }

    fn predict(&self, text: &str) -> Result<Vec<PunctuationPrediction>> {
        self.agent
            .post(&self.api_url)
            .set("Authorization", &format!("Bearer {}", self.api_token))
            .send_json(ureq::json!({
                "inputs": text,
                "parameters": { "aggregation_strategy": "none" }
            }))
            .context("Failed to call punctuation model")?
            .into_json()
            .context("Failed to parse punctuation model response")
    }
}

impl PunctuationRestorer for HuggingFacePunctuator {
    fn restore_punctuation(&self, text: &str) -> Result<String> {
        let stripped = strip_punctuation(text);
        let words: Vec<&str> = stripped.split_whitespace().collect();
        let mut restored = Vec::new();

        for batch in words.chunks(BATCH_WORDS) {
            let batch_text = batch.join(" ");
            let predictions = self.predict(&batch_text)?;
            restored.push(apply_predictions(&batch_text, &predictions));
        }

        tracing::debug!(batches = restored.len(), "punctuation restored");
        Ok(restored.join(" "))
    }
}

/// Drops sentence punctuation that is not part of a number, so the model
/// starts from bare words.
pub fn strip_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            if !STRIPPED_MARKS.contains(&c) {
                return true;
            }
            let digit_before = i.checked_sub(1).is_some_and(|j| chars[j].is_ascii_digit());
            let digit_after = chars.get(i + 1).is_some_and(|next| next.is_ascii_digit());
            digit_before || digit_after
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Rebuilds `text` with each word's predicted mark placed after the word.
/// Predictions are per token; tokens with no gap between them belong to one
/// word, and the word takes the label of its last token. Prediction offsets
/// count characters, not bytes.
pub fn apply_predictions(text: &str, predictions: &[PunctuationPrediction]) -> String {
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let mut out = String::with_capacity(text.len() + predictions.len());
    let mut cursor = 0;

    for (idx, prediction) in predictions.iter().enumerate() {
        let ends_word = predictions
            .get(idx + 1)
            .map_or(true, |next| next.start > prediction.end);
        if !ends_word {
            continue;
        }
        let Some(&end) = offsets.get(prediction.end) else {
            continue;
        };
        if end < cursor {
            continue;
        }
        out.push_str(&text[cursor..end]);
        cursor = end;
        if let Some(mark) = prediction.mark() {
            out.push_str(mark);
        }
    }

    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::{
        apply_predictions, strip_punctuation, HuggingFacePunctuator, PunctuationPrediction,
        PunctuationRestorer, BATCH_WORDS,
    };
    use crate::config::Config;
    use mockito::Matcher;

    fn prediction(label: &str, start: usize, end: usize) -> PunctuationPrediction {
        PunctuationPrediction {
            entity_group: label.to_owned(),
            start,
            end,
        }
    }

    #[test]
    fn strip_keeps_numeric_separators() {
        assert_eq!(
            strip_punctuation("Hi, there! It costs 3.50 dollars; ok?"),
            "Hi there It costs 3.50 dollars ok"
        );
    }

    #[test]
    fn predictions_insert_marks_after_spans() {
        let text = "hello world how are you";
        let predictions = vec![
            prediction("0", 0, 5),
            prediction(".", 6, 11),
            prediction("0", 12, 19),
            prediction("?", 20, 23),
        ];

        assert_eq!(
            apply_predictions(text, &predictions),
            "hello world. how are you?"
        );
    }

    #[test]
    fn predictions_use_character_offsets() {
        let text = "café au lait merci";
        let predictions = vec![prediction(",", 0, 12), prediction(".", 13, 18)];

        assert_eq!(apply_predictions(text, &predictions), "café au lait, merci.");
    }

    #[test]
    fn out_of_range_predictions_are_ignored() {
        let text = "short text";
        let predictions = vec![prediction(".", 0, 99)];

        assert_eq!(apply_predictions(text, &predictions), "short text");
    }

    #[test]
    fn token_level_responses_deserialize() {
        let parsed: Vec<PunctuationPrediction> = serde_json::from_str(
            r#"[{"entity":".","score":0.98,"word":"world","start":6,"end":11}]"#,
        )
        .expect("prediction");
        assert_eq!(parsed[0].entity_group, ".");
        assert_eq!(parsed[0].end, 11);
    }

    #[test]
    fn adjacent_words_with_the_same_label_each_get_a_mark() {
        let text = "stop go";
        let predictions = vec![prediction(".", 0, 4), prediction(".", 5, 7)];

        assert_eq!(apply_predictions(text, &predictions), "stop. go.");
    }

    #[test]
    fn subword_tokens_take_the_mark_of_the_last_piece() {
        let text = "hello there";
        let predictions = vec![
            prediction(".", 0, 3),
            prediction("0", 3, 5),
            prediction("0", 6, 9),
            prediction("?", 9, 11),
        ];

        assert_eq!(apply_predictions(text, &predictions), "hello there?");
    }

    fn last_word_prediction(batch: &str) -> serde_json::Value {
        let start = batch.rfind(' ').map_or(0, |space| space + 1);
        serde_json::json!([
            {"entity": ".", "score": 0.97, "word": &batch[start..], "start": start, "end": batch.len()}
        ])
    }

    #[test]
    fn restore_punctuation_posts_word_batches_and_rejoins_them() {
        let mut server = mockito::Server::new();
        let words: Vec<String> = (0..300).map(|i| format!("w{i}x")).collect();
        let first = words[..BATCH_WORDS].join(" ");
        let second = words[BATCH_WORDS..].join(" ");
        let input = words.join(" ").replacen("w5x", "w5x,", 1);

        let first_call = server
            .mock("POST", "/org/punct")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::Json(serde_json::json!({
                "inputs": first,
                "parameters": {"aggregation_strategy": "none"}
            })))
            .with_status(200)
            .with_body(last_word_prediction(&first).to_string())
            .create();
        let second_call = server
            .mock("POST", "/org/punct")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::PartialJson(serde_json::json!({"inputs": second})))
            .with_status(200)
            .with_body(last_word_prediction(&second).to_string())
            .create();

        let config = Config {
            token: Some("hf_test".to_owned()),
            api_base_url: server.url(),
            punctuation_model: "org/punct".to_owned(),
            ..Config::default()
        };
        let punctuator = HuggingFacePunctuator::from_config(&config).expect("punctuator");

        let restored = punctuator.restore_punctuation(&input).expect("restored");

        first_call.assert();
        second_call.assert();
        assert_eq!(restored, format!("{first}. {second}."));
    }

    #[test]
    fn failed_requests_surface_with_context() {
        let mut server = mockito::Server::new();
        let _unavailable = server
            .mock("POST", "/org/punct")
            .with_status(503)
            .create();
        let punctuator =
            HuggingFacePunctuator::new("hf_test".to_owned(), format!("{}/org/punct", server.url()));

        let err = punctuator
            .restore_punctuation("some words")
            .expect_err("server error");

        assert_eq!(err.to_string(), "Failed to call punctuation model");
    }
}
