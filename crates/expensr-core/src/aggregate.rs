//! Pure aggregation over persisted transactions.
//!
//! Every function works on an organization's transaction rows plus id→name
//! maps for categories/vendors, and takes the reference date explicitly so
//! results are deterministic under test.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use expensr_store::{TransactionRow, TxKind};

use crate::error::{ExpensrError, Result};

/// Inclusive year bounds accepted by the monthly report.
pub const REPORT_YEAR_MIN: i32 = 2020;
pub const REPORT_YEAR_MAX: i32 = 2030;

/// Trailing window for the category/vendor breakdowns, in days.
const BREAKDOWN_WINDOW_DAYS: i64 = 90;

/// Name used when a transaction's category cannot be resolved.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Spending total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: Decimal,
}

/// Spending total for one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSpend {
    pub vendor: String,
    pub total: Decimal,
}

/// Summary KPIs for one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of all expense amounts, all time.
    pub total_expense: Decimal,
    /// Number of ingested transactions, all time.
    pub receipt_count: u64,
    /// total_expense / receipt_count, zero when there are no receipts.
    pub avg_per_receipt: Decimal,
    /// Category with the highest summed expense amount overall.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_category: Option<CategorySpend>,
    /// Expense totals by category over the trailing 90 days, descending.
    pub by_category_90d: Vec<CategorySpend>,
}

/// One (month, category) cell of the monthly report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReportRow {
    /// First day of the calendar month.
    pub month: NaiveDate,
    pub category: String,
    pub total: Decimal,
}

/// Net cash flow for one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCashFlowPoint {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub net: Decimal,
}

/// Summary KPIs and the 90-day category breakdown.
pub fn summary(
    txs: &[TransactionRow],
    categories: &HashMap<Uuid, String>,
    as_of: NaiveDate,
) -> Summary {
    let total_expense: Decimal = txs
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .map(|t| t.amount)
        .sum();
    let receipt_count = txs.len() as u64;
    let avg_per_receipt = if receipt_count == 0 {
        Decimal::ZERO
    } else {
        total_expense / Decimal::from(receipt_count)
    };

    // All-time expense totals per category name.
    let mut all_time: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txs.iter().filter(|t| t.kind == TxKind::Expense) {
        *all_time.entry(category_name(t, categories)).or_default() += t.amount;
    }
    let top_category = all_time
        .iter()
        .max_by_key(|&(_, total)| *total)
        .map(|(category, total)| CategorySpend {
            category: category.clone(),
            total: *total,
        });

    let window_start = as_of - Duration::days(BREAKDOWN_WINDOW_DAYS);
    let mut recent: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txs.iter().filter(|t| t.kind == TxKind::Expense) {
        if t.effective_date() >= window_start {
            *recent.entry(category_name(t, categories)).or_default() += t.amount;
        }
    }
    let mut by_category_90d: Vec<CategorySpend> = recent
        .into_iter()
        .map(|(category, total)| CategorySpend { category, total })
        .collect();
    by_category_90d.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));

    Summary {
        total_expense,
        receipt_count,
        avg_per_receipt,
        top_category,
        by_category_90d,
    }
}

/// Expense + income totals grouped by (calendar month, category) for one
/// year, ordered by month then category.
pub fn monthly_report(
    txs: &[TransactionRow],
    categories: &HashMap<Uuid, String>,
    year: i32,
) -> Result<Vec<MonthlyReportRow>> {
    if !(REPORT_YEAR_MIN..=REPORT_YEAR_MAX).contains(&year) {
        return Err(ExpensrError::Validation(format!(
            "year must be between {REPORT_YEAR_MIN} and {REPORT_YEAR_MAX}, got {year}"
        )));
    }

    let mut cells: BTreeMap<(u32, String), Decimal> = BTreeMap::new();
    for t in txs {
        let date = t.effective_date();
        if date.year() != year {
            continue;
        }
        *cells
            .entry((date.month(), category_name(t, categories)))
            .or_default() += t.amount;
    }

    Ok(cells
        .into_iter()
        .map(|((month, category), total)| MonthlyReportRow {
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            category,
            total,
        })
        .collect())
}

/// Weekly inflow/outflow/net across all transactions, ascending by week.
pub fn weekly_cash_flow(txs: &[TransactionRow]) -> Vec<WeeklyCashFlowPoint> {
    let mut weeks: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for t in txs {
        let entry = weeks.entry(week_start(t.effective_date())).or_default();
        match t.kind {
            TxKind::Income => entry.0 += t.amount,
            TxKind::Expense => entry.1 += t.amount,
        }
    }

    weeks
        .into_iter()
        .map(|(week_start, (inflow, outflow))| WeeklyCashFlowPoint {
            week_start,
            inflow,
            outflow,
            net: inflow - outflow,
        })
        .collect()
}

/// Top expense vendors over the trailing 90 days.
pub fn top_vendors(
    txs: &[TransactionRow],
    vendors: &HashMap<Uuid, String>,
    as_of: NaiveDate,
    limit: usize,
) -> Vec<VendorSpend> {
    let window_start = as_of - Duration::days(BREAKDOWN_WINDOW_DAYS);
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txs.iter().filter(|t| t.kind == TxKind::Expense) {
        if t.effective_date() < window_start {
            continue;
        }
        // Transactions without a resolvable vendor are skipped.
        let Some(name) = t.vendor_id.and_then(|id| vendors.get(&id)) else {
            continue;
        };
        *totals.entry(name.clone()).or_default() += t.amount;
    }

    let mut rows: Vec<VendorSpend> = totals
        .into_iter()
        .map(|(vendor, total)| VendorSpend { vendor, total })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then(a.vendor.cmp(&b.vendor)));
    rows.truncate(limit);
    rows
}

/// Monday of the date's ISO week.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn category_name(t: &TransactionRow, categories: &HashMap<Uuid, String>) -> String {
    categories
        .get(&t.category_id)
        .cloned()
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(
        org: Uuid,
        category_id: Uuid,
        amount: &str,
        date: &str,
        kind: TxKind,
    ) -> TransactionRow {
        TransactionRow {
            id: Uuid::new_v4(),
            organization_id: org,
            document_id: None,
            vendor_id: None,
            category_id,
            description: "test".to_string(),
            amount: dec(amount),
            currency: "MYR".to_string(),
            invoice_date: Some(date.parse().unwrap()),
            kind,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_summary_kpis() {
        let org = Uuid::new_v4();
        let food = Uuid::new_v4();
        let transport = Uuid::new_v4();
        let categories = HashMap::from([
            (food, "Food & Beverage".to_string()),
            (transport, "Transportation".to_string()),
        ]);
        let txs = vec![
            tx(org, food, "100.00", "2024-05-20", TxKind::Expense),
            tx(org, food, "50.00", "2024-05-25", TxKind::Expense),
            tx(org, transport, "30.00", "2023-01-10", TxKind::Expense),
            tx(org, food, "500.00", "2024-05-28", TxKind::Income),
        ];

        let s = summary(&txs, &categories, "2024-06-01".parse().unwrap());

        assert_eq!(s.total_expense, dec("180.00"));
        assert_eq!(s.receipt_count, 4);
        assert_eq!(s.avg_per_receipt, dec("45.00"));
        assert_eq!(s.top_category.unwrap().category, "Food & Beverage");
        // The 2023 transport expense is outside the 90-day window.
        assert_eq!(
            s.by_category_90d,
            vec![CategorySpend {
                category: "Food & Beverage".to_string(),
                total: dec("150.00"),
            }]
        );
    }

    #[test]
    fn test_summary_empty() {
        let s = summary(&[], &HashMap::new(), "2024-06-01".parse().unwrap());
        assert_eq!(s.total_expense, Decimal::ZERO);
        assert_eq!(s.receipt_count, 0);
        assert_eq!(s.avg_per_receipt, Decimal::ZERO);
        assert_eq!(s.top_category, None);
        assert!(s.by_category_90d.is_empty());
    }

    #[test]
    fn test_unresolvable_category_is_uncategorized() {
        let org = Uuid::new_v4();
        let txs = vec![tx(org, Uuid::new_v4(), "10.00", "2024-05-20", TxKind::Expense)];
        let s = summary(&txs, &HashMap::new(), "2024-06-01".parse().unwrap());
        assert_eq!(s.by_category_90d[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_monthly_report_year_validation() {
        assert!(monthly_report(&[], &HashMap::new(), 2019).is_err());
        assert!(monthly_report(&[], &HashMap::new(), 2031).is_err());
        assert!(monthly_report(&[], &HashMap::new(), 2020).is_ok());
        assert!(monthly_report(&[], &HashMap::new(), 2030).is_ok());
    }

    #[test]
    fn test_monthly_report_groups_and_orders() {
        let org = Uuid::new_v4();
        let food = Uuid::new_v4();
        let utilities = Uuid::new_v4();
        let categories = HashMap::from([
            (food, "Food & Beverage".to_string()),
            (utilities, "Utilities".to_string()),
        ]);
        let txs = vec![
            tx(org, food, "20.00", "2024-03-02", TxKind::Expense),
            tx(org, food, "30.00", "2024-03-20", TxKind::Expense),
            tx(org, utilities, "80.00", "2024-01-15", TxKind::Expense),
            // Income is included in the report.
            tx(org, food, "400.00", "2024-03-05", TxKind::Income),
            // Other years are excluded.
            tx(org, food, "99.00", "2023-03-05", TxKind::Expense),
        ];

        let rows = monthly_report(&txs, &categories, 2024).unwrap();

        assert_eq!(
            rows,
            vec![
                MonthlyReportRow {
                    month: "2024-01-01".parse().unwrap(),
                    category: "Utilities".to_string(),
                    total: dec("80.00"),
                },
                MonthlyReportRow {
                    month: "2024-03-01".parse().unwrap(),
                    category: "Food & Beverage".to_string(),
                    total: dec("450.00"),
                },
            ]
        );
    }

    #[test]
    fn test_weekly_cash_flow_buckets_by_iso_week() {
        let org = Uuid::new_v4();
        let cat = Uuid::new_v4();
        let txs = vec![
            // 2024-01-15 is a Monday, 2024-01-17 the same week.
            tx(org, cat, "100.00", "2024-01-15", TxKind::Income),
            tx(org, cat, "40.00", "2024-01-17", TxKind::Expense),
            // Next week.
            tx(org, cat, "10.00", "2024-01-22", TxKind::Expense),
        ];

        let points = weekly_cash_flow(&txs);

        assert_eq!(
            points,
            vec![
                WeeklyCashFlowPoint {
                    week_start: "2024-01-15".parse().unwrap(),
                    inflow: dec("100.00"),
                    outflow: dec("40.00"),
                    net: dec("60.00"),
                },
                WeeklyCashFlowPoint {
                    week_start: "2024-01-22".parse().unwrap(),
                    inflow: Decimal::ZERO,
                    outflow: dec("10.00"),
                    net: dec("-10.00"),
                },
            ]
        );
    }

    #[test]
    fn test_week_start_is_monday() {
        assert_eq!(week_start("2024-01-15".parse().unwrap()), "2024-01-15".parse().unwrap());
        assert_eq!(week_start("2024-01-21".parse().unwrap()), "2024-01-15".parse().unwrap());
    }

    #[test]
    fn test_top_vendors_skips_unresolved() {
        let org = Uuid::new_v4();
        let cat = Uuid::new_v4();
        let grab = Uuid::new_v4();
        let vendors = HashMap::from([(grab, "Grab Malaysia".to_string())]);

        let mut with_vendor = tx(org, cat, "45.00", "2024-05-20", TxKind::Expense);
        with_vendor.vendor_id = Some(grab);
        let without_vendor = tx(org, cat, "99.00", "2024-05-21", TxKind::Expense);

        let rows = top_vendors(
            &[with_vendor, without_vendor],
            &vendors,
            "2024-06-01".parse().unwrap(),
            5,
        );

        assert_eq!(
            rows,
            vec![VendorSpend {
                vendor: "Grab Malaysia".to_string(),
                total: dec("45.00"),
            }]
        );
    }
}
