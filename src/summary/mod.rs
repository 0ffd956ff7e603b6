// src/summary/mod.rs
//! One-sentence patch summary generated by a language model from a small
//! sample of the extracted changes.

pub mod ollama;

use crate::bundle::Bundle;
use crate::utils::error::SummaryError;
use async_trait::async_trait;
use serde::Serialize;

pub use ollama::OllamaClient;

pub const MAX_SUMMARY_WORDS: usize = 22;

const CHAMPION_SAMPLES: usize = 3;
const ITEM_SAMPLES: usize = 2;
const BULLETS_PER_ITEM: usize = 2;
const SECTION_SAMPLES: usize = 4;

/// Text completion backend.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, SummaryError>;
}

/// Response body of the summary endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryOutcome {
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryOutcome {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            summary: None,
            error: Some(error.into()),
        }
    }
}

/// Samples of a bundle handed to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryContext {
    pub champions: Vec<String>,
    pub items: Vec<String>,
    pub sections: Vec<String>,
}

impl SummaryContext {
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let champions = bundle
            .champions
            .iter()
            .take(CHAMPION_SAMPLES)
            .map(|(name, summary)| match summary {
                Some(summary) => format!("{name} — {summary}"),
                None => name.clone(),
            })
            .collect();

        let items = bundle
            .items
            .iter()
            .take(ITEM_SAMPLES)
            .map(|(name, bullets)| {
                if bullets.is_empty() {
                    return name.clone();
                }
                let joined = bullets
                    .iter()
                    .take(BULLETS_PER_ITEM)
                    .map(|b| b.trim())
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("{name} — {joined}")
            })
            .collect();

        let sections = bundle.other.keys().take(SECTION_SAMPLES).cloned().collect();

        Self {
            champions,
            items,
            sections,
        }
    }

    pub fn prompt(&self) -> String {
        fn or_none(parts: &[String], sep: &str) -> String {
            if parts.is_empty() {
                "None".to_string()
            } else {
                parts.join(sep)
            }
        }

        format!(
            "You are an expert League of Legends patch analyst. \
             Write ONE concise sentence (max {MAX_SUMMARY_WORDS} words) for PLAYERS. \
             Prioritize the 1–3 most impactful shifts: major champion buffs/nerfs, item or system changes, or mode updates (e.g., Arena). \
             Prefer naming specific champions/items/modes; avoid stats, raw numbers, lists, and minor fixes. \
             Do not use vague abstractions like ‘crowd control’ when specifics exist; prefer paraphrases like ‘longer stuns’, ‘faster clears’, ‘shorter cooldowns’. \
             Use active voice; no intro text, no quotes, no parentheses; at most one semicolon; end with a period. \
             If nothing stands out, say ‘Minor balance and quality-of-life tweaks.’\n\n\
             Champion changes (sample): {}\n\
             Item changes (sample): {}\n\
             Other sections (sample): {}\n\n\
             Return only the single sentence.",
            or_none(&self.champions, " | "),
            or_none(&self.items, " | "),
            or_none(&self.sections, ", "),
        )
    }
}

/// First line of the model output, capped at [`MAX_SUMMARY_WORDS`] words
/// and ending in terminal punctuation.
pub fn clamp_sentence(raw: &str) -> Option<String> {
    let first_line = raw.trim().lines().next()?;
    let words: Vec<&str> = first_line.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let mut sentence = if words.len() > MAX_SUMMARY_WORDS {
        let cut = words[..MAX_SUMMARY_WORDS].join(" ");
        format!("{}.", cut.trim_end_matches([',', ';', ':']))
    } else {
        words.join(" ")
    };

    if !sentence.ends_with(['.', '!', '?']) {
        sentence = format!("{}.", sentence.trim_end_matches([',', ';', ':']));
    }
    Some(sentence)
}

/// Summarizes `bundle`; never fails, errors come back inside the outcome.
pub async fn summarize(summarizer: &dyn Summarizer, bundle: Option<&Bundle>) -> SummaryOutcome {
    let Some(bundle) = bundle else {
        return SummaryOutcome::failed("missing patch_version");
    };

    let prompt = SummaryContext::from_bundle(bundle).prompt();
    match summarizer.complete(&prompt).await {
        Ok(raw) => match clamp_sentence(&raw) {
            Some(sentence) => SummaryOutcome {
                summary: Some(sentence),
                error: None,
            },
            None => SummaryOutcome::failed(SummaryError::EmptyResponse.to_string()),
        },
        Err(e) => {
            tracing::error!("Summary generation failed for {}: {}", bundle.version, e);
            SummaryOutcome::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::PatchVersion;

    struct Canned(Result<&'static str, ()>);

    #[async_trait]
    impl Summarizer for Canned {
        async fn complete(&self, _prompt: &str) -> Result<String, SummaryError> {
            self.0
                .map(str::to_string)
                .map_err(|_| SummaryError::EmptyResponse)
        }
    }

    fn bundle() -> Bundle {
        let mut bundle = Bundle::empty(PatchVersion::parse("25-16").unwrap());
        bundle
            .champions
            .insert("Ahri".into(), Some("Q damage increased".into()));
        bundle.champions.insert("Brand".into(), None);
        bundle.items.insert(
            "Infinity Edge".into(),
            vec!["Cost: 3400 -> 3450".into(), "AD: 70 -> 65".into(), "Crit".into()],
        );
        bundle
    }

    #[test]
    fn context_samples() {
        let ctx = SummaryContext::from_bundle(&bundle());
        assert_eq!(ctx.champions, vec!["Ahri — Q damage increased", "Brand"]);
        assert_eq!(ctx.items, vec!["Infinity Edge — Cost: 3400 -> 3450; AD: 70 -> 65"]);
        assert!(ctx.sections.is_empty());

        let prompt = ctx.prompt();
        assert!(prompt.contains("max 22 words"));
        assert!(prompt.contains("Other sections (sample): None"));
        assert!(prompt.contains("Champion changes (sample): Ahri — Q damage increased | Brand"));
    }

    #[test]
    fn clamps_long_output() {
        let long = (1..=30).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let clamped = clamp_sentence(&long).unwrap();
        assert_eq!(clamped.split_whitespace().count(), MAX_SUMMARY_WORDS);
        assert!(clamped.ends_with("w22."));

        assert_eq!(
            clamp_sentence("  Ahri and   Infinity Edge shift the meta,\nsecond line").as_deref(),
            Some("Ahri and Infinity Edge shift the meta.")
        );
        assert_eq!(clamp_sentence("Done!").as_deref(), Some("Done!"));
        assert_eq!(clamp_sentence("   "), None);
    }

    #[tokio::test]
    async fn outcome_shapes() {
        let ok = summarize(&Canned(Ok("Ahri rises")), Some(&bundle())).await;
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"summary": "Ahri rises."})
        );

        let failed = summarize(&Canned(Err(())), Some(&bundle())).await;
        assert_eq!(failed.summary, None);
        assert_eq!(failed.error.as_deref(), Some("no response text"));

        let missing = summarize(&Canned(Ok("x")), None).await;
        assert_eq!(
            serde_json::to_value(&missing).unwrap(),
            serde_json::json!({"summary": null, "error": "missing patch_version"})
        );
    }
}
