//! Ingestion orchestrator: normalize, extract, classify, persist.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use expensr_store::{
    content_type_for, BlobStore, DocumentRow, ExpenseStore, TransactionRow, TxKind,
    MAX_DESCRIPTION_LEN,
};

use crate::ai::AiService;
use crate::classify::{CategoryLabel, ClassifierStack};
use crate::error::{ExpensrError, Result};
use crate::extract::ReceiptParser;
use crate::models::config::ExpensrConfig;
use crate::models::fields::ParsedFields;
use crate::normalize::normalize;

const MAX_FILENAME_LEN: usize = 255;
const DEFAULT_FILENAME: &str = "receipt.txt";

/// An uploaded file accompanying the OCR text.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// One ingestion request.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub organization_id: Uuid,
    /// Caller identity. Required unless anonymous ingestion is enabled.
    pub uploaded_by: Option<Uuid>,
    pub file: Option<FileUpload>,
    pub ocr_text: String,
    pub kind: TxKind,
}

/// What an ingestion produced.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IngestReceipt {
    pub document_id: Uuid,
    pub transaction_id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub category_id: Uuid,
    pub category: CategoryLabel,
    pub fields: ParsedFields,
    pub blob_url: Option<String>,
}

/// Sequences the pipeline for one document: blob storage, field
/// extraction, classification, persistence. Stateless; safe to share
/// across request-handling contexts.
pub struct Ingestor<'a, S, B> {
    store: &'a S,
    blobs: &'a B,
    parser: ReceiptParser,
    classifier: ClassifierStack,
    config: ExpensrConfig,
}

impl<'a, S: ExpenseStore, B: BlobStore> Ingestor<'a, S, B> {
    pub fn new(store: &'a S, blobs: &'a B, config: ExpensrConfig) -> Self {
        Self {
            store,
            blobs,
            parser: ReceiptParser::from_config(&config.extraction),
            classifier: ClassifierStack::new(&config.classify),
            config,
        }
    }

    /// Wire up the AI classification collaborator.
    pub fn with_ai(mut self, ai: Arc<dyn AiService>) -> Self {
        self.classifier = ClassifierStack::new(&self.config.classify).with_ai(ai);
        self
    }

    pub fn ingest(&self, req: IngestRequest) -> Result<IngestReceipt> {
        if req.ocr_text.trim().is_empty() && req.file.is_none() {
            return Err(ExpensrError::Validation(
                "either a file or OCR text is required".to_string(),
            ));
        }

        let uploaded_by = match req.uploaded_by {
            Some(id) => id,
            None if self.config.identity.allow_anonymous => {
                placeholder_principal(req.organization_id)
            }
            None => {
                return Err(ExpensrError::Validation(
                    "uploaded_by is required".to_string(),
                ));
            }
        };

        let org = req.organization_id;
        let now = Utc::now();

        // Blob storage comes first and its failure aborts the ingestion: a
        // document whose supplied file has no stored reference was not
        // ingested.
        let blob_url = match &req.file {
            Some(file) => Some(self.blobs.store(
                &file.bytes,
                &file.filename,
                content_type_for(&file.filename),
            )?),
            None => None,
        };

        let fields = self.parser.parse(&req.ocr_text);
        let category = self.classifier.classify(&req.ocr_text);

        let filename: String = req
            .file
            .as_ref()
            .map(|f| f.filename.as_str())
            .unwrap_or(DEFAULT_FILENAME)
            .chars()
            .take(MAX_FILENAME_LEN)
            .collect();

        let document_id = Uuid::new_v4();
        self.store.insert_document(DocumentRow {
            id: document_id,
            organization_id: org,
            name: filename.clone(),
            blob_url: blob_url.clone(),
            raw_text: normalize(&req.ocr_text, self.config.extraction.max_text_length),
            uploaded_by,
            created_at: now,
        })?;

        let vendor_id = match &fields.vendor {
            Some(name) => Some(self.store.upsert_vendor(org, name, now)?.0),
            None => None,
        };

        let (category_id, _) = self
            .store
            .get_or_create_category(org, category.as_str(), now)?;

        let description: String = fields
            .vendor
            .clone()
            .unwrap_or(filename)
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect();

        let transaction_id = Uuid::new_v4();
        self.store.insert_transaction(TransactionRow {
            id: transaction_id,
            organization_id: org,
            document_id: Some(document_id),
            vendor_id,
            category_id,
            description,
            amount: fields.total_amount,
            currency: fields.currency.clone(),
            invoice_date: fields.invoice_date,
            kind: req.kind,
            created_at: now,
        })?;

        info!(
            %org,
            %document_id,
            %transaction_id,
            category = category.as_str(),
            "ingested document"
        );

        Ok(IngestReceipt {
            document_id,
            transaction_id,
            vendor_id,
            category_id,
            category,
            fields,
            blob_url,
        })
    }
}

/// Deterministic per-organization placeholder principal, used only when
/// anonymous ingestion is explicitly enabled.
fn placeholder_principal(org: Uuid) -> Uuid {
    let mut bytes = *org.as_bytes();
    bytes[..6].copy_from_slice(&[0x11; 6]);
    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiError, Insight};
    use expensr_store::{MemoryStore, StoreError};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::time::Duration;

    const RECEIPT: &str = "\
STARBUCKS COFFEE
Receipt No: SB-1201
Date: 2024-01-15
Grande Latte 18.50
Total: RM 24.50";

    fn request(org: Uuid) -> IngestRequest {
        IngestRequest {
            organization_id: org,
            uploaded_by: Some(Uuid::new_v4()),
            file: None,
            ocr_text: RECEIPT.to_string(),
            kind: TxKind::Expense,
        }
    }

    #[test]
    fn test_ingest_persists_transaction() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let ingestor = Ingestor::new(&store, &store, ExpensrConfig::default());

        let receipt = ingestor.ingest(request(org)).unwrap();

        assert_eq!(receipt.category, CategoryLabel::FoodBeverage);
        assert_eq!(receipt.fields.vendor.as_deref(), Some("STARBUCKS COFFEE"));
        assert_eq!(
            receipt.fields.total_amount,
            Decimal::from_str("24.50").unwrap()
        );
        assert_eq!(receipt.fields.currency, "MYR");

        let txs = store.transactions(org).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].id, receipt.transaction_id);
        assert_eq!(txs[0].invoice_date, Some("2024-01-15".parse().unwrap()));
        assert_eq!(txs[0].description, "STARBUCKS COFFEE");
        assert_eq!(txs[0].vendor_id, receipt.vendor_id);
        assert!(receipt.vendor_id.is_some());

        assert!(store.find_category(org, "Food & Beverage").unwrap().is_some());
    }

    #[test]
    fn test_ingest_requires_text_or_file() {
        let store = MemoryStore::new();
        let ingestor = Ingestor::new(&store, &store, ExpensrConfig::default());

        let mut req = request(Uuid::new_v4());
        req.ocr_text = String::new();
        let err = ingestor.ingest(req).unwrap_err();
        assert!(matches!(err, ExpensrError::Validation(_)));
    }

    #[test]
    fn test_ingest_requires_identity_by_default() {
        let store = MemoryStore::new();
        let ingestor = Ingestor::new(&store, &store, ExpensrConfig::default());

        let mut req = request(Uuid::new_v4());
        req.uploaded_by = None;
        let err = ingestor.ingest(req).unwrap_err();
        assert!(matches!(err, ExpensrError::Validation(_)));
    }

    #[test]
    fn test_anonymous_ingestion_when_enabled() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let mut config = ExpensrConfig::default();
        config.identity.allow_anonymous = true;
        let ingestor = Ingestor::new(&store, &store, config);

        let mut req = request(org);
        req.uploaded_by = None;
        ingestor.ingest(req).unwrap();

        // Same placeholder principal on every anonymous ingestion.
        assert_eq!(placeholder_principal(org), placeholder_principal(org));
    }

    #[test]
    fn test_blob_failure_aborts_ingestion() {
        struct FailingBlobs;
        impl BlobStore for FailingBlobs {
            fn store(
                &self,
                _bytes: &[u8],
                _filename: &str,
                _content_type: &str,
            ) -> expensr_store::Result<String> {
                Err(StoreError::Blob("bucket unavailable".to_string()))
            }
        }

        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let blobs = FailingBlobs;
        let ingestor = Ingestor::new(&store, &blobs, ExpensrConfig::default());

        let mut req = request(org);
        req.file = Some(FileUpload {
            bytes: b"image bytes".to_vec(),
            filename: "receipt.jpg".to_string(),
        });
        let err = ingestor.ingest(req).unwrap_err();
        assert!(matches!(err, ExpensrError::Store(StoreError::Blob(_))));
        assert_eq!(store.transactions(org).unwrap().len(), 0);
    }

    #[test]
    fn test_failing_ai_still_ingests_via_keywords() {
        struct DownAi;
        impl AiService for DownAi {
            fn classify(
                &self,
                _sample: &str,
                _labels: &[&str],
                timeout: Duration,
            ) -> std::result::Result<Option<String>, AiError> {
                Err(AiError::Timeout(timeout))
            }
            fn generate_insight(
                &self,
                _context: &serde_json::Value,
                _timeout: Duration,
            ) -> std::result::Result<Insight, AiError> {
                Err(AiError::Unavailable("down".to_string()))
            }
        }

        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let ingestor =
            Ingestor::new(&store, &store, ExpensrConfig::default()).with_ai(Arc::new(DownAi));

        let receipt = ingestor.ingest(request(org)).unwrap();
        assert_eq!(receipt.category, CategoryLabel::FoodBeverage);
    }

    #[test]
    fn test_unparseable_text_falls_back_to_others() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        let ingestor = Ingestor::new(&store, &store, ExpensrConfig::default());

        let mut req = request(org);
        req.ocr_text = "@@@@ ???? 0000".to_string();
        let receipt = ingestor.ingest(req).unwrap();

        assert_eq!(receipt.category, CategoryLabel::Others);
        assert_eq!(receipt.fields.vendor, None);
        assert_eq!(receipt.fields.total_amount, Decimal::ZERO);
        // The transaction still references a resolvable category.
        assert!(store.find_category(org, "Others").unwrap().is_some());
        // Description falls back to the filename.
        let txs = store.transactions(org).unwrap();
        assert_eq!(txs[0].description, "receipt.txt");
    }
}
