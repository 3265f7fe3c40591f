use std::collections::HashSet;
use std::sync::Arc;
use chrono::Utc;
use sled::{Batch, Db};
use crate::errors::StateError;
use crate::storage::codec::IndexRefs;

const IDX_BACKREF: &'static str = "idx_back:";

pub(crate) struct Indexing {}

impl Indexing {

    ///
    /// Keeps track of all indexes per item, which can be user to clear them later.
    pub fn add_backrefs(indexes: &Vec<String>, target_key: String, batch: &mut Batch) -> Result<(), StateError> {
        let refs = IndexRefs { keys: indexes.clone() };
        let value = refs.write_to_bytes()?;
        batch.insert(
            // an item may be replaced many times, each version gets its own timestamped backref
            format!("{}{}/{}", IDX_BACKREF, target_key, Utc::now().timestamp_millis() as u64).as_bytes(),
            value.as_slice(),
        );
        Ok(())
    }

    ///
    /// Remove all indexes for the specified `target_key`
    pub fn remove_backref(target_key: String, db: Arc<Db>, batch: &mut Batch) -> Result<(), StateError> {
        let refs = db.scan_prefix(format!("{}{}/", IDX_BACKREF, target_key));
        let mut deleting = HashSet::new();
        for row in refs {
            let (key, value) = row?;
            // don't forget to remove the backref itself
            batch.remove(key);
            if let Ok(refs) = IndexRefs::parse_from_bytes(value.as_ref()) {
                for key in refs.keys {
                    if deleting.insert(key.clone()) {
                        batch.remove(key.as_bytes())
                    }
                }
            }
        }
        Ok(())
    }
}

pub trait IndexedValue<T> where T: IndexEncoding + Sized + 'static {

    /// Get index keys for the storage, i.e. values used to index and query actual data.
    /// All returned values are mapped to the same item
    fn get_index(&self) -> Vec<T>;

    /// Indexes as strings
    fn get_index_keys(&self) -> Vec<String> {
        let mut result: Vec<String> = self.get_index()
            .iter()
            .map(|k| k.get_index_key())
            .collect();

        // we need to sort list to remove duplicates
        result.sort();
        result.dedup();
        result
    }
}

pub trait IndexEncoding {
    fn get_index_key(&self) -> String;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use sled::Batch;
    use tempdir::TempDir;
    use super::{IndexEncoding, IndexedValue, Indexing};

    struct Key(&'static str);

    impl IndexEncoding for Key {
        fn get_index_key(&self) -> String {
            format!("idx:test:{}", self.0)
        }
    }

    struct Item {}

    impl IndexedValue<Key> for Item {
        fn get_index(&self) -> Vec<Key> {
            vec![Key("b"), Key("a"), Key("b")]
        }
    }

    #[test]
    fn dedup_index_keys() {
        let item = Item {};
        assert_eq!(item.get_index_keys(), vec!["idx:test:a".to_string(), "idx:test:b".to_string()]);
    }

    #[test]
    fn removes_all_indexes() {
        let tmp_dir = TempDir::new("test-indexing").unwrap();
        let db = Arc::new(sled::open(tmp_dir.path()).unwrap());
        let indexes = Item {}.get_index_keys();

        let mut batch = Batch::default();
        for idx in &indexes {
            batch.insert(idx.as_bytes(), "item:1".as_bytes());
        }
        Indexing::add_backrefs(&indexes, "item:1".to_string(), &mut batch).unwrap();
        db.apply_batch(batch).unwrap();
        assert_eq!(db.scan_prefix("idx:test:").count(), 2);

        let mut batch = Batch::default();
        Indexing::remove_backref("item:1".to_string(), db.clone(), &mut batch).unwrap();
        db.apply_batch(batch).unwrap();
        assert_eq!(db.scan_prefix("idx:test:").count(), 0);
        assert_eq!(db.scan_prefix("idx_back:").count(), 0);
    }
}
