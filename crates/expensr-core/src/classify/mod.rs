//! Two-tier expense classification.
//!
//! Tier 1 delegates to the injected AI collaborator; tier 2 is the
//! deterministic keyword fallback that always produces an answer. The AI
//! tier is accurate but can fail (timeout, malformed response, quota) and
//! must never block ingestion, so every non-success outcome falls through
//! to the keyword tier.

pub mod keywords;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::AiService;
use crate::models::config::ClassifyConfig;

pub use keywords::keyword_guess;

/// The closed set of expense categories. Serialized under the canonical
/// names used for persistence and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryLabel {
    #[serde(rename = "Food & Beverage")]
    FoodBeverage,
    Utilities,
    Transportation,
    #[serde(rename = "Office Supplies")]
    OfficeSupplies,
    Others,
}

impl CategoryLabel {
    pub const ALL: [CategoryLabel; 5] = [
        CategoryLabel::FoodBeverage,
        CategoryLabel::Utilities,
        CategoryLabel::Transportation,
        CategoryLabel::OfficeSupplies,
        CategoryLabel::Others,
    ];

    /// Canonical category name, as persisted and shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::FoodBeverage => "Food & Beverage",
            CategoryLabel::Utilities => "Utilities",
            CategoryLabel::Transportation => "Transportation",
            CategoryLabel::OfficeSupplies => "Office Supplies",
            CategoryLabel::Others => "Others",
        }
    }

    /// Parse a canonical name. Anything else is `None` — a collaborator
    /// answering outside the closed set counts as no answer.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == name)
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-tier classifier: AI collaborator first, keyword scoring fallback.
pub struct ClassifierStack {
    ai: Option<Arc<dyn AiService>>,
    sample_chars: usize,
    ai_timeout: Duration,
}

impl ClassifierStack {
    pub fn new(config: &ClassifyConfig) -> Self {
        Self {
            ai: None,
            sample_chars: config.sample_chars,
            ai_timeout: Duration::from_millis(config.ai_timeout_ms),
        }
    }

    /// Keyword tier only; what you get when no AI collaborator is wired up.
    pub fn keyword_only() -> Self {
        Self::new(&ClassifyConfig::default())
    }

    pub fn with_ai(mut self, ai: Arc<dyn AiService>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Classify receipt text into a category. Total: always returns a
    /// label, falling back through the tiers.
    pub fn classify(&self, text: &str) -> CategoryLabel {
        if let Some(ai) = &self.ai {
            let sample: String = text.chars().take(self.sample_chars).collect();
            let labels: Vec<&str> = CategoryLabel::ALL.iter().map(|l| l.as_str()).collect();

            match ai.classify(&sample, &labels, self.ai_timeout) {
                Ok(Some(label)) => match CategoryLabel::from_name(&label) {
                    Some(category) => {
                        debug!(%category, "AI classification");
                        return category;
                    }
                    None => {
                        warn!(%label, "AI returned a label outside the closed set");
                    }
                },
                Ok(None) => debug!("AI declined to classify"),
                Err(e) => warn!(error = %e, "AI classification failed, using keyword fallback"),
            }
        }

        keyword_guess(text)
    }
}
