//! In-memory backend implementing all three collaborator interfaces.
//!
//! Every operation takes the table lock, so single-process callers get the
//! atomicity the relational backend would provide. The whole store
//! serializes to a JSON snapshot, which is what the CLI persists between
//! invocations.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{
    CategoryRow, DocumentRow, StoredForecast, TransactionRow, TransactionView, VendorRow,
};
use crate::{BlobStore, ExpenseStore, ForecastCache, Page, Result, StoreError, TxFilter};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    vendors: Vec<VendorRow>,
    categories: Vec<CategoryRow>,
    documents: Vec<DocumentRow>,
    transactions: Vec<TransactionRow>,
    blobs: Vec<BlobRef>,
    forecasts: Vec<StoredForecast>,
}

/// Reference to a stored blob. Content is not retained; the core only ever
/// needs the reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobRef {
    key: String,
    content_type: String,
    size: u64,
}

/// In-memory store with a serde snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let tables: Tables = serde_json::from_str(&content)?;
        Ok(Self {
            inner: Mutex::new(tables),
        })
    }

    /// Write the current snapshot to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tables = self.lock()?;
        let content = serde_json::to_string_pretty(&*tables)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Number of persisted transactions across all organizations.
    pub fn transaction_count(&self) -> Result<usize> {
        Ok(self.lock()?.transactions.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

impl ExpenseStore for MemoryStore {
    fn find_vendor(&self, org: Uuid, name: &str) -> Result<Option<Uuid>> {
        let tables = self.lock()?;
        Ok(tables
            .vendors
            .iter()
            .find(|v| v.organization_id == org && v.name == name)
            .map(|v| v.id))
    }

    fn insert_vendor(&self, row: VendorRow) -> Result<()> {
        self.lock()?.vendors.push(row);
        Ok(())
    }

    fn find_category(&self, org: Uuid, name: &str) -> Result<Option<Uuid>> {
        let tables = self.lock()?;
        Ok(tables
            .categories
            .iter()
            .find(|c| c.organization_id == org && c.name == name)
            .map(|c| c.id))
    }

    fn insert_category(&self, row: CategoryRow) -> Result<()> {
        self.lock()?.categories.push(row);
        Ok(())
    }

    fn insert_document(&self, row: DocumentRow) -> Result<()> {
        self.lock()?.documents.push(row);
        Ok(())
    }

    fn insert_transaction(&self, row: TransactionRow) -> Result<()> {
        self.lock()?.transactions.push(row);
        Ok(())
    }

    fn transactions(&self, org: Uuid) -> Result<Vec<TransactionRow>> {
        let tables = self.lock()?;
        Ok(tables
            .transactions
            .iter()
            .filter(|t| t.organization_id == org)
            .cloned()
            .collect())
    }

    fn vendors(&self, org: Uuid) -> Result<Vec<VendorRow>> {
        let tables = self.lock()?;
        Ok(tables
            .vendors
            .iter()
            .filter(|v| v.organization_id == org)
            .cloned()
            .collect())
    }

    fn categories(&self, org: Uuid) -> Result<Vec<CategoryRow>> {
        let tables = self.lock()?;
        Ok(tables
            .categories
            .iter()
            .filter(|c| c.organization_id == org)
            .cloned()
            .collect())
    }

    fn query_transactions(
        &self,
        org: Uuid,
        filter: &TxFilter,
        page: Page,
    ) -> Result<(Vec<TransactionView>, u64)> {
        let page = page.clamped();
        let tables = self.lock()?;

        let vendor_name = |id: Option<Uuid>| {
            id.and_then(|id| tables.vendors.iter().find(|v| v.id == id))
                .map(|v| v.name.clone())
        };
        let category_name = |id: Uuid| {
            tables
                .categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
        };

        let mut rows: Vec<(DateTime<Utc>, TransactionView)> = tables
            .transactions
            .iter()
            .filter(|t| t.organization_id == org)
            .map(|t| {
                let view = TransactionView {
                    id: t.id,
                    effective_date: t.effective_date(),
                    amount: t.amount,
                    currency: t.currency.clone(),
                    vendor_name: vendor_name(t.vendor_id),
                    category_name: category_name(t.category_id),
                    description: t.description.clone(),
                    kind: t.kind,
                };
                (t.created_at, view)
            })
            .filter(|(_, v)| matches_filter(v, filter))
            .collect();

        // Effective date descending, insertion time as tie-breaker.
        rows.sort_by(|(ca, a), (cb, b)| {
            b.effective_date
                .cmp(&a.effective_date)
                .then(cb.cmp(ca))
        });

        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .map(|(_, v)| v)
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect();

        Ok((items, total))
    }
}

fn matches_filter(view: &TransactionView, filter: &TxFilter) -> bool {
    if let Some(from) = filter.from {
        if view.effective_date < from {
            return false;
        }
    }
    if let Some(to) = filter.to {
        if view.effective_date > to {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        match &view.category_name {
            Some(name) if contains_ci(name, category) => {}
            _ => return false,
        }
    }
    if let Some(vendor) = &filter.vendor {
        match &view.vendor_name {
            Some(name) if contains_ci(name, vendor) => {}
            _ => return false,
        }
    }
    true
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl BlobStore for MemoryStore {
    fn store(&self, bytes: &[u8], filename: &str, content_type: &str) -> Result<String> {
        let key = format!("receipts/{}/{}", Uuid::new_v4(), filename);
        self.lock()?.blobs.push(BlobRef {
            key: key.clone(),
            content_type: content_type.to_string(),
            size: bytes.len() as u64,
        });
        Ok(format!("memory://{key}"))
    }
}

impl ForecastCache for MemoryStore {
    fn latest(
        &self,
        org: Uuid,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredForecast>> {
        let tables = self.lock()?;
        Ok(tables
            .forecasts
            .iter()
            .filter(|f| f.organization_id == org && f.computed_at > now - max_age)
            .max_by_key(|f| f.computed_at)
            .cloned())
    }

    fn put(&self, forecast: StoredForecast) -> Result<()> {
        self.lock()?.forecasts.push(forecast);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{TxKind, UpsertOutcome};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    fn tx(
        org: Uuid,
        category_id: Uuid,
        vendor_id: Option<Uuid>,
        amount: &str,
        date: &str,
        kind: TxKind,
    ) -> TransactionRow {
        TransactionRow {
            id: Uuid::new_v4(),
            organization_id: org,
            document_id: None,
            vendor_id,
            category_id,
            description: "test".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            currency: "MYR".to_string(),
            invoice_date: Some(date.parse().unwrap()),
            kind,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_upsert_vendor_resolves_existing() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let (first, outcome) = store.upsert_vendor(org, "Starbucks", Utc::now()).unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        let (second, outcome) = store.upsert_vendor(org, "Starbucks", Utc::now()).unwrap();
        assert_eq!(outcome, UpsertOutcome::Existing);
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_get_or_create_both_succeed() {
        let store = Arc::new(MemoryStore::new());
        let org = Uuid::new_v4();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.get_or_create_category(org, "Transportation", Utc::now())
                })
            })
            .collect();

        let ids: Vec<Uuid> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap().0)
            .collect();

        // Both calls resolved to some id for the name; duplicates tolerated.
        assert_eq!(ids.len(), 2);
        assert!(store
            .find_category(org, "Transportation")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_query_filters_and_pagination() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let now = Utc::now();
        let (food, _) = store.get_or_create_category(org, "Food & Beverage", now).unwrap();
        let (transport, _) = store.get_or_create_category(org, "Transportation", now).unwrap();
        let (vendor, _) = store.upsert_vendor(org, "Grab Malaysia", now).unwrap();

        store
            .insert_transaction(tx(org, food, None, "12.50", "2024-03-01", TxKind::Expense))
            .unwrap();
        store
            .insert_transaction(tx(
                org,
                transport,
                Some(vendor),
                "30.00",
                "2024-03-05",
                TxKind::Expense,
            ))
            .unwrap();
        store
            .insert_transaction(tx(org, food, None, "9.90", "2024-04-01", TxKind::Expense))
            .unwrap();

        // Case-insensitive substring on category.
        let filter = TxFilter {
            category: Some("food".to_string()),
            ..Default::default()
        };
        let (items, total) = store.query_transactions(org, &filter, Page::default()).unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].effective_date, "2024-04-01".parse().unwrap());

        // Vendor substring.
        let filter = TxFilter {
            vendor: Some("grab".to_string()),
            ..Default::default()
        };
        let (items, total) = store.query_transactions(org, &filter, Page::default()).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].vendor_name.as_deref(), Some("Grab Malaysia"));

        // Inclusive date range.
        let filter = TxFilter {
            from: Some("2024-03-05".parse().unwrap()),
            to: Some("2024-04-01".parse().unwrap()),
            ..Default::default()
        };
        let (_, total) = store.query_transactions(org, &filter, Page::default()).unwrap();
        assert_eq!(total, 2);

        // Pagination windows the ordered rows but reports the full count.
        let (items, total) = store
            .query_transactions(org, &TxFilter::default(), Page::new(2, 2))
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].effective_date, "2024-03-01".parse().unwrap());
    }

    #[test]
    fn test_forecast_cache_freshness_window() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let now = Utc::now();

        store
            .put(StoredForecast {
                id: Uuid::new_v4(),
                organization_id: org,
                horizon: 8,
                granularity: "week".to_string(),
                series: serde_json::json!([]),
                computed_at: now - Duration::hours(30),
            })
            .unwrap();

        assert!(store.latest(org, Duration::hours(24), now).unwrap().is_none());
        assert!(store.latest(org, Duration::hours(48), now).unwrap().is_some());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let org = Uuid::new_v4();

        let store = MemoryStore::new();
        let (category, _) = store.get_or_create_category(org, "Others", Utc::now()).unwrap();
        store
            .insert_transaction(tx(org, category, None, "5.00", "2024-01-15", TxKind::Expense))
            .unwrap();
        store.save(&path).unwrap();

        let reloaded = MemoryStore::load(&path).unwrap();
        assert_eq!(reloaded.transaction_count().unwrap(), 1);
        assert!(reloaded.find_category(org, "Others").unwrap().is_some());
    }

    #[test]
    fn test_blob_store_returns_reference() {
        let store = MemoryStore::new();
        let url = store.store(b"fake bytes", "receipt.jpg", "image/jpeg").unwrap();
        assert!(url.starts_with("memory://receipts/"));
        assert!(url.ends_with("/receipt.jpg"));
    }
}
