use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

/// Heading the model is told to put before its policy list. The display
/// splits on this exact text, so the prompt and the parser must share it.
pub const POLICY_LIST_HEADING: &str = "### 🏆 Top 7 Recommended Policies:";

static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("valid ordinal regex"));

/// Generated recommendation, split for rendering when the format allows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum RecommendationDisplay {
    Structured {
        underwriting: String,
        /// Markdown cards, each prefixed with its bold rank
        policies: Vec<String>,
    },
    Unstructured {
        raw: String,
    },
}

/// Split generated text into the underwriting section and policy cards.
/// Falls back to the raw text when the heading is missing or repeated.
pub fn parse_recommendation(text: &str) -> RecommendationDisplay {
    let mut sections = text.split(POLICY_LIST_HEADING);
    let (Some(underwriting), Some(policy_section), None) =
        (sections.next(), sections.next(), sections.next())
    else {
        warn!(
            heading = POLICY_LIST_HEADING,
            "Generated text does not contain the policy heading exactly once, showing it raw"
        );
        return RecommendationDisplay::Unstructured {
            raw: text.to_string(),
        };
    };

    let policies = policy_section
        .trim()
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(i, block)| format!("**{}.** {}", i + 1, ORDINAL_PREFIX.replace(block, "")))
        .collect();

    RecommendationDisplay::Structured {
        underwriting: underwriting.to_string(),
        policies,
    }
}
