//! Collection-level storage estimation.

use canteras_types::{Collection, Document};
use serde::Serialize;

use crate::size::record_size;

/// Quota used for the capacity estimate.
///
/// Note this differs from [`DISPLAY_QUOTA_BYTES`]; both figures are reported
/// to administrators as "1 GiB" and are kept separate on purpose.
pub const STORAGE_QUOTA_BYTES: u64 = 1_073_700_000;

/// Quota used for the usage percentage shown next to the roster (1 GiB).
pub const DISPLAY_QUOTA_BYTES: u64 = 1_073_741_824;

/// Estimated storage usage of one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    /// Name of the estimated collection.
    pub collection: String,
    /// Estimated bytes used by all documents, metadata included.
    pub total_bytes: u64,
    /// Quota the estimate was computed against.
    pub quota_bytes: u64,
    /// `total_bytes` as a percentage of the quota, rounded to two decimals.
    pub percentage_used: f64,
    /// Identifier of the largest document, if any.
    pub max_record_id: Option<String>,
    /// Size of the largest document in bytes.
    pub max_record_size: u64,
    /// Number of documents processed.
    pub record_count: usize,
    /// Estimated number of documents (existing plus new) that fit in the quota
    /// if every new document were as large as the current largest one.
    pub estimated_capacity: i64,
}

impl EstimationResult {
    /// Returns the bytes left before reaching the quota, zero if exceeded.
    #[must_use]
    pub const fn remaining_bytes(&self) -> u64 {
        self.quota_bytes.saturating_sub(self.total_bytes)
    }

    /// Returns how many more documents of the largest size would fit.
    #[must_use]
    pub const fn additional_records(&self) -> i64 {
        self.estimated_capacity - self.record_count as i64
    }
}

/// Storage usage estimator for document collections.
#[derive(Debug, Clone, Copy)]
pub struct Estimator {
    quota_bytes: u64,
}

impl Estimator {
    /// Creates an estimator with the given quota.
    #[must_use]
    pub const fn new(quota_bytes: u64) -> Self {
        Self { quota_bytes }
    }

    /// Returns the quota in bytes.
    #[must_use]
    pub const fn quota_bytes(&self) -> u64 {
        self.quota_bytes
    }

    /// Estimates the storage used by a collection.
    #[must_use]
    pub fn estimate_collection(&self, collection: &Collection) -> EstimationResult {
        self.estimate_documents(collection.name(), collection.documents())
    }

    /// Estimates the storage used by `documents` stored under `collection`.
    ///
    /// Documents are visited in order. When several share the largest size
    /// the first one is reported.
    #[must_use]
    pub fn estimate_documents(&self, collection: &str, documents: &[Document]) -> EstimationResult {
        let mut total_bytes: u64 = 0;
        let mut max_record_size: u64 = 0;
        let mut max_record_id: Option<&str> = None;

        for doc in documents {
            let size = record_size(&doc.path(collection), doc.record());
            total_bytes += size;
            if size > max_record_size {
                max_record_size = size;
                max_record_id = Some(doc.id());
            }
        }

        let record_count = documents.len();

        EstimationResult {
            collection: collection.to_owned(),
            total_bytes,
            quota_bytes: self.quota_bytes,
            percentage_used: usage_percentage(total_bytes, self.quota_bytes),
            max_record_id: max_record_id.map(str::to_owned),
            max_record_size,
            record_count,
            estimated_capacity: self.capacity(total_bytes, max_record_size, record_count),
        }
    }

    // Computed in i128 so any u64 quota and total fit; saturates into i64.
    fn capacity(&self, total_bytes: u64, max_record_size: u64, record_count: usize) -> i64 {
        let count = record_count as i128;
        let capacity = if max_record_size == 0 {
            count
        } else {
            let remaining = i128::from(self.quota_bytes) - i128::from(total_bytes);
            remaining.div_euclid(i128::from(max_record_size)) + count
        };
        i64::try_from(capacity).unwrap_or(if capacity > 0 { i64::MAX } else { i64::MIN })
    }

    /// Formats bytes in human-readable form.
    #[must_use]
    pub fn format_bytes(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(STORAGE_QUOTA_BYTES)
    }
}

/// Returns `bytes` as a percentage of `quota`, rounded to two decimals.
#[must_use]
pub fn usage_percentage(bytes: u64, quota: u64) -> f64 {
    if quota == 0 {
        return 0.0;
    }
    (bytes as f64 / quota as f64 * 10_000.0).round() / 100.0
}

/// Returns `bytes` as a percentage of [`DISPLAY_QUOTA_BYTES`].
#[must_use]
pub fn display_percentage(bytes: u64) -> f64 {
    usage_percentage(bytes, DISPLAY_QUOTA_BYTES)
}
