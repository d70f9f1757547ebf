//! Store backend interfaces.

pub mod memory;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::record::{
    CategoryRow, DocumentRow, StoredForecast, TransactionRow, TransactionView, UpsertOutcome,
    VendorRow, MAX_NAME_LEN,
};
use crate::{Page, Result, StoreError, TxFilter};

/// Relational persistence operations for one backing store.
///
/// Backends implement the primitive find/insert/query operations; the
/// duplicate-tolerant get-or-create protocol for vendors and categories is
/// provided on top of them. (Organization, name) uniqueness is advisory —
/// backends may report `StoreError::Duplicate` from inserts but are not
/// required to, and callers must tolerate duplicate rows.
pub trait ExpenseStore: Send + Sync {
    fn find_vendor(&self, org: Uuid, name: &str) -> Result<Option<Uuid>>;
    fn insert_vendor(&self, row: VendorRow) -> Result<()>;

    fn find_category(&self, org: Uuid, name: &str) -> Result<Option<Uuid>>;
    fn insert_category(&self, row: CategoryRow) -> Result<()>;

    fn insert_document(&self, row: DocumentRow) -> Result<()>;
    fn insert_transaction(&self, row: TransactionRow) -> Result<()>;

    /// All transactions for an organization, for aggregation.
    fn transactions(&self, org: Uuid) -> Result<Vec<TransactionRow>>;

    /// All vendors for an organization.
    fn vendors(&self, org: Uuid) -> Result<Vec<VendorRow>>;

    /// All categories for an organization.
    fn categories(&self, org: Uuid) -> Result<Vec<CategoryRow>>;

    /// Filtered, paginated listing joined with vendor/category names,
    /// ordered by effective date descending. Returns the page of rows and
    /// the total row count before pagination.
    fn query_transactions(
        &self,
        org: Uuid,
        filter: &TxFilter,
        page: Page,
    ) -> Result<(Vec<TransactionView>, u64)>;

    /// Resolve or create a vendor id for (org, name).
    ///
    /// Lookup first; on a miss, insert under a fresh id. When the insert
    /// reports a duplicate (a concurrent call won the race), retry the
    /// lookup once; if the row is still not visible, insert again under
    /// another fresh id and accept the duplicate.
    fn upsert_vendor(
        &self,
        org: Uuid,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<(Uuid, UpsertOutcome)> {
        let name = clamp_name(name);
        if let Some(id) = self.find_vendor(org, &name)? {
            return Ok((id, UpsertOutcome::Existing));
        }
        let id = Uuid::new_v4();
        match self.insert_vendor(VendorRow {
            id,
            organization_id: org,
            name: name.clone(),
            created_at: now,
        }) {
            Ok(()) => Ok((id, UpsertOutcome::Created)),
            Err(StoreError::Duplicate { .. }) => {
                tracing::warn!(vendor = %name, "vendor insert collided, retrying lookup");
                if let Some(id) = self.find_vendor(org, &name)? {
                    return Ok((id, UpsertOutcome::Existing));
                }
                let id = Uuid::new_v4();
                self.insert_vendor(VendorRow {
                    id,
                    organization_id: org,
                    name,
                    created_at: now,
                })?;
                Ok((id, UpsertOutcome::CreatedAfterRetry))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve or create a category id for (org, name), with the same
    /// retry-once protocol as `upsert_vendor`.
    fn get_or_create_category(
        &self,
        org: Uuid,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<(Uuid, UpsertOutcome)> {
        let name = clamp_name(name);
        if let Some(id) = self.find_category(org, &name)? {
            return Ok((id, UpsertOutcome::Existing));
        }
        let id = Uuid::new_v4();
        match self.insert_category(CategoryRow {
            id,
            organization_id: org,
            name: name.clone(),
            created_at: now,
        }) {
            Ok(()) => Ok((id, UpsertOutcome::Created)),
            Err(StoreError::Duplicate { .. }) => {
                tracing::warn!(category = %name, "category insert collided, retrying lookup");
                if let Some(id) = self.find_category(org, &name)? {
                    return Ok((id, UpsertOutcome::Existing));
                }
                let id = Uuid::new_v4();
                self.insert_category(CategoryRow {
                    id,
                    organization_id: org,
                    name,
                    created_at: now,
                })?;
                Ok((id, UpsertOutcome::CreatedAfterRetry))
            }
            Err(e) => Err(e),
        }
    }
}

/// Object storage for uploaded files. The core never reads blob content
/// back; it only records the returned reference.
pub trait BlobStore: Send + Sync {
    /// Store a file and return its reference URL.
    fn store(&self, bytes: &[u8], filename: &str, content_type: &str) -> Result<String>;
}

/// Cache of computed forecast series, keyed by organization.
pub trait ForecastCache: Send + Sync {
    /// The most recent forecast no older than `max_age`, if any.
    fn latest(
        &self,
        org: Uuid,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<StoredForecast>>;

    fn put(&self, forecast: StoredForecast) -> Result<()>;
}

fn clamp_name(name: &str) -> String {
    name.trim().chars().take(MAX_NAME_LEN).collect()
}

/// Content type for an uploaded file, from its extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "pdf" => "application/pdf",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
