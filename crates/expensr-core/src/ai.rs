//! AI classification/insight collaborator interface.
//!
//! The generative model behind this interface is an external capability,
//! injected at construction so a test double can stand in. Calls are
//! bounded by a caller-supplied timeout and failure never blocks ingestion:
//! the classifier falls back to its keyword tier and insight generation
//! falls back to a stubbed payload.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the AI collaborator. All of them are recoverable from the
/// pipeline's point of view.
#[derive(Error, Debug)]
pub enum AiError {
    /// The call did not complete within the caller-supplied timeout.
    #[error("AI call timed out after {0:?}")]
    Timeout(Duration),

    /// The service was unreachable or rejected the call.
    #[error("AI service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something unusable.
    #[error("malformed AI response: {0}")]
    Malformed(String),
}

/// A generated business insight: a narrative summary plus structured
/// follow-up actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub summary: String,
    pub actions: InsightActions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightActions {
    pub budget_recommendations: Vec<BudgetRecommendation>,
    pub tax_preparation: Vec<TaxPreparationItem>,
    pub risks: Vec<RiskItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRecommendation {
    pub category: String,
    pub suggestion: String,
    pub est_monthly_savings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxPreparationItem {
    pub item: String,
    pub why_it_matters: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskItem {
    pub risk: String,
    pub watch_metric: String,
}

/// External classification and insight capability.
pub trait AiService: Send + Sync {
    /// Classify a text sample into exactly one of `labels`.
    ///
    /// `Ok(None)` means the model declined. Implementations must bound
    /// their work by `timeout`. Callers treat any label outside `labels`
    /// as a decline.
    fn classify(
        &self,
        sample: &str,
        labels: &[&str],
        timeout: Duration,
    ) -> Result<Option<String>, AiError>;

    /// Generate a narrative insight from aggregate financial context.
    fn generate_insight(
        &self,
        context: &serde_json::Value,
        timeout: Duration,
    ) -> Result<Insight, AiError>;
}
