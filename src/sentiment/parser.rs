//! Parsing of LLM sentiment replies

use super::SentimentSignal;
use crate::error::{ForecastError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SentimentReply {
    score: f64,
    #[serde(default)]
    reasoning: String,
}

/// Parses a reply of the form `{ "score": 0.4, "reasoning": "..." }`.
///
/// Markdown code fences and any prose around the first JSON object are
/// ignored. The score is clamped into `[-1, 1]`.
pub fn parse_sentiment_reply(text: &str) -> Result<SentimentSignal> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let json = extract_json_object(&cleaned).ok_or_else(|| {
        ForecastError::ExternalDataUnavailable("no JSON object in sentiment reply".to_string())
    })?;

    let reply: SentimentReply = serde_json::from_str(json).map_err(|e| {
        ForecastError::ExternalDataUnavailable(format!("malformed sentiment reply: {}", e))
    })?;

    SentimentSignal::new(reply.score, reply.reasoning.trim())
        .map_err(|e| ForecastError::ExternalDataUnavailable(e.to_string()))
}

/// First balanced `{...}` block, skipping braces inside string literals
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let signal = parse_sentiment_reply(r#"{"score": 0.4, "reasoning": "Strong earnings"}"#).unwrap();
        assert_eq!(signal.score, 0.4);
        assert_eq!(signal.rationale, "Strong earnings");
        assert!(signal.available);
    }

    #[test]
    fn test_fenced_reply_with_prose() {
        let reply = "Here is the analysis:\n```json\n{\n  \"score\": -0.65,\n  \"reasoning\": \"Recall of {flagship} product\"\n}\n```\nLet me know.";
        let signal = parse_sentiment_reply(reply).unwrap();
        assert_eq!(signal.score, -0.65);
        assert_eq!(signal.rationale, "Recall of {flagship} product");
    }

    #[test]
    fn test_score_is_clamped() {
        let signal = parse_sentiment_reply(r#"{"score": 3.5}"#).unwrap();
        assert_eq!(signal.score, 1.0);
        assert_eq!(signal.rationale, "");
    }

    #[test]
    fn test_malformed_replies() {
        assert!(matches!(
            parse_sentiment_reply("I cannot help with that."),
            Err(ForecastError::ExternalDataUnavailable(_))
        ));
        assert!(parse_sentiment_reply(r#"{"reasoning": "no score"}"#).is_err());
        assert!(parse_sentiment_reply(r#"{"score": "high"}"#).is_err());
        assert!(parse_sentiment_reply(r#"{"score": 0.2"#).is_err());
    }

    #[test]
    fn test_extract_first_object() {
        assert_eq!(extract_json_object(r#"x {"a": {"b": 1}} {"c": 2}"#), Some(r#"{"a": {"b": 1}}"#));
        assert_eq!(extract_json_object(r#"{"a": "\"}"}"#), Some(r#"{"a": "\"}"}"#));
        assert_eq!(extract_json_object("none"), None);
    }
}
