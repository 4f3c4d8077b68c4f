//! Reconciliation of availability records with releases by hash.

use std::collections::HashMap;

use super::AvailabilityRecord;

/// Index availability records by lowercase hash.
///
/// Backends may answer out of order, skip hashes, or answer the same hash
/// twice. The first record for a hash wins; a later duplicate only
/// contributes its file list when the first had none.
pub fn index_by_hash(records: Vec<AvailabilityRecord>) -> HashMap<String, AvailabilityRecord> {
    let mut by_hash: HashMap<String, AvailabilityRecord> = HashMap::new();

    for record in records {
        if record.hash.is_empty() {
            continue;
        }
        let hash = record.hash.to_lowercase();
        match by_hash.get_mut(&hash) {
            Some(existing) => {
                if existing.files.is_none() && record.files.is_some() {
                    existing.files = record.files;
                }
            }
            None => {
                by_hash.insert(hash.clone(), AvailabilityRecord { hash, ..record });
            }
        }
    }

    by_hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AvailabilityStatus;
    use crate::release::ReleaseFile;

    #[test]
    fn test_index_normalizes_hash_case() {
        let records = vec![AvailabilityRecord::new("ABC123", AvailabilityStatus::Cached)];
        let index = index_by_hash(records);

        assert_eq!(index.len(), 1);
        let record = index.get("abc123").unwrap();
        assert_eq!(record.hash, "abc123");
        assert_eq!(record.status, AvailabilityStatus::Cached);
    }

    #[test]
    fn test_index_first_record_wins() {
        let records = vec![
            AvailabilityRecord::new("h1", AvailabilityStatus::Uncached),
            AvailabilityRecord::new("H1", AvailabilityStatus::Cached),
        ];
        let index = index_by_hash(records);

        assert_eq!(index.len(), 1);
        assert_eq!(index["h1"].status, AvailabilityStatus::Uncached);
    }

    #[test]
    fn test_index_fills_missing_files_from_duplicate() {
        let records = vec![
            AvailabilityRecord::new("h1", AvailabilityStatus::Cached),
            AvailabilityRecord::new("h1", AvailabilityStatus::Cached)
                .with_files(vec![ReleaseFile::new("a.mkv", 10)]),
        ];
        let index = index_by_hash(records);

        assert_eq!(index["h1"].file_list().len(), 1);
    }

    #[test]
    fn test_index_skips_empty_hash() {
        let records = vec![AvailabilityRecord::new("", AvailabilityStatus::Cached)];
        assert!(index_by_hash(records).is_empty());
    }
}
