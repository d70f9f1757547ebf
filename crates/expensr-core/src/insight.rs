//! AI-generated business insights over aggregate context.
//!
//! The context handed to the collaborator is assembled from the same pure
//! aggregations the reports use; insight generation itself is fully
//! delegated, and any failure degrades to a stubbed payload rather than an
//! error.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use expensr_store::TransactionRow;

use crate::aggregate::{self, Summary, VendorSpend, WeeklyCashFlowPoint};
use crate::ai::{AiService, Insight, InsightActions};

/// Number of top vendors included in the context.
const TOP_VENDOR_LIMIT: usize = 5;

/// Number of trailing weekly cash-flow points included in the context.
const RECENT_WEEKS: usize = 4;

/// Aggregate financial context handed to the insight collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightContext {
    pub summary: Summary,
    pub top_vendors_90d: Vec<VendorSpend>,
    pub recent_cash_flow: Vec<WeeklyCashFlowPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// Assemble the insight context for one organization's transactions.
pub fn build_context(
    txs: &[TransactionRow],
    categories: &HashMap<Uuid, String>,
    vendors: &HashMap<Uuid, String>,
    as_of: NaiveDate,
    question: Option<String>,
) -> InsightContext {
    let cash_flow = aggregate::weekly_cash_flow(txs);
    let recent_start = cash_flow.len().saturating_sub(RECENT_WEEKS);

    InsightContext {
        summary: aggregate::summary(txs, categories, as_of),
        top_vendors_90d: aggregate::top_vendors(txs, vendors, as_of, TOP_VENDOR_LIMIT),
        recent_cash_flow: cash_flow[recent_start..].to_vec(),
        question,
    }
}

/// Generate an insight, degrading to the stub on any failure.
pub fn generate(ai: &dyn AiService, context: &InsightContext, timeout: Duration) -> Insight {
    let value = match serde_json::to_value(context) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "insight context failed to serialize");
            return fallback_insight();
        }
    };

    match ai.generate_insight(&value, timeout) {
        Ok(insight) => insight,
        Err(e) => {
            warn!(error = %e, "insight generation failed");
            fallback_insight()
        }
    }
}

/// Stub returned when the collaborator cannot produce an insight.
pub fn fallback_insight() -> Insight {
    Insight {
        summary: "Unable to generate detailed insights. Please ensure you have sufficient \
                  transaction data for analysis."
            .to_string(),
        actions: InsightActions::default(),
    }
}
