use std::collections::HashSet;
use std::ops::{Bound, Deref};
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use sled::{Batch, Db, IVec};
use tracing::{debug, warn};
use uuid::Uuid;
use crate::access::pagination::{PageCursor, PageQuery, PageResult};
use crate::access::tours::{Tour, TourQueries, TourRecords};
use crate::errors::{InvalidValueError, StateError};
use crate::storage::codec::TourRecord;
use crate::storage::indexing::{IndexEncoding, IndexedValue, Indexing};

///
/// # Storage:
///
/// - `tour:<UUID>` to store the tour data
/// - `idx:tour:<INDEX>` for indexes, where the value is the key of the tour data
///
/// # Indexes:
///
/// - `1/<NAME>\0<UUID>` tours ordered by name, id keeps the order stable for equal names
///

const PREFIX_KEY: &'static str = "tour:";
const PREFIX_IDX: &'static str = "idx:tour";
const NAME_SEPARATOR: char = '\0';

enum IndexType {
    // `<NAME>\0<UUID>`
    ByName(String, Uuid),
    // `<NAME>`, lowest key for all tours with the specified name (or a name starting with it)
    NameFrom(String),
}

impl IndexType {
    fn get_prefix(&self) -> usize {
        match self {
            IndexType::ByName(_, _) => 1,
            IndexType::NameFrom(_) => 1,
        }
    }

    fn name_index_start() -> String {
        format!("{}:1/", PREFIX_IDX)
    }

    // `0` is the next char after `/`
    fn name_index_end() -> String {
        format!("{}:10", PREFIX_IDX)
    }
}

impl IndexEncoding for IndexType {
    fn get_index_key(&self) -> String {
        match self {
            IndexType::ByName(name, id) => format!("{}:{:}/{:}{:}{:}", PREFIX_IDX, self.get_prefix(), name, NAME_SEPARATOR, id),
            IndexType::NameFrom(name) => format!("{}:{:}/{:}", PREFIX_IDX, self.get_prefix(), name),
        }
    }
}

impl IndexedValue<IndexType> for TourRecord {
    fn get_index(&self) -> Vec<IndexType> {
        match Uuid::parse_str(self.tour.id.as_str()) {
            Ok(id) => vec![IndexType::ByName(self.tour.name.clone(), id)],
            Err(_) => vec![],
        }
    }
}

#[derive(Clone)]
pub struct ToursAccess {
    pub(crate) db: Arc<Db>,
}

impl ToursAccess {
    fn get_key(id: Uuid) -> String {
        format!("{}{}", PREFIX_KEY, id.to_string())
    }

    fn extract_id(key: String) -> Result<Uuid, StateError> {
        if !key.starts_with(PREFIX_KEY) {
            return Err(StateError::InvalidId)
        }
        let id = key.get((PREFIX_KEY.len())..).ok_or(StateError::InvalidId)?;
        Uuid::parse_str(id).map_err(|_| StateError::InvalidId)
    }

    fn get_item(&self, id: Uuid) -> Result<Option<TourRecord>, StateError> {
        ToursAccess::read_item(id, self.db.get(ToursAccess::get_key(id)))
    }

    ///
    /// A missing or undecodable tour is `Ok(None)`, so an index scan can skip it. A failed read is an error.
    fn read_item(id: Uuid, data: Result<Option<IVec>, sled::Error>) -> Result<Option<TourRecord>, StateError> {
        match data? {
            Some(b) => match TourRecord::parse_from_bytes(b.deref()) {
                Ok(record) => Ok(Some(record)),
                Err(_) => {
                    warn!(%id, "skip corrupted tour");
                    Ok(None)
                }
            },
            None => Ok(None)
        }
    }

    fn add_item(&self, record: TourRecord, batch: &mut Batch) -> Result<(), StateError> {
        let id = Uuid::parse_str(record.tour.id.as_str())?;
        let item_bytes = record.write_to_bytes()?;
        let item_key = ToursAccess::get_key(id);
        let indexes: Vec<String> = record.get_index_keys();
        Indexing::add_backrefs(&indexes, item_key.clone(), batch)?;
        for idx in indexes {
            batch.insert(idx.as_bytes(), item_key.as_bytes());
        }
        batch.insert(item_key.as_bytes(), item_bytes);
        Ok(())
    }

    ///
    /// Read tours referenced by the name index within the bounds, up to `limit` of them.
    /// Returns the tours and the index key of the last one.
    fn scan(&self, bounds: (Bound<String>, Bound<String>), limit: usize) -> Result<(Vec<Tour>, Option<String>), StateError> {
        let mut results = Vec::new();
        let mut last_key: Option<String> = None;
        if limit == 0 {
            return Ok((results, last_key))
        }

        for row in self.db.range(bounds) {
            let (idx_key, item_key) = row?;
            let item_key = String::from_utf8(item_key.to_vec()).map_err(|_| StateError::CorruptedValue)?;
            let id = ToursAccess::extract_id(item_key)?;
            match self.get_item(id)? {
                Some(record) => {
                    let idx_key = String::from_utf8(idx_key.to_vec()).map_err(|_| StateError::CorruptedValue)?;
                    last_key = Some(idx_key);
                    results.push(record.tour);
                    if results.len() >= limit {
                        break
                    }
                }
                None => warn!(%id, "skip index entry without a tour")
            }
        }
        Ok((results, last_key))
    }
}

#[async_trait]
impl TourQueries for ToursAccess {

    async fn list_by_name(&self, page: PageQuery) -> Result<PageResult<Tour>, StateError> {
        let start = match page.cursor {
            Some(cursor) => {
                if !cursor.key.starts_with(IndexType::name_index_start().as_str()) {
                    return Err(StateError::InvalidId)
                }
                Bound::Excluded(cursor.key)
            },
            None => Bound::Included(IndexType::name_index_start()),
        };
        let (values, last_key) = self.scan((start, Bound::Excluded(IndexType::name_index_end())), page.limit)?;
        debug!(limit = page.limit, found = values.len(), "list tours by name");
        Ok(PageResult {
            values,
            cursor: last_key.map(PageCursor::new),
        })
    }

    async fn range_by_name(&self, from: &str, to: &str, limit: usize) -> Result<Vec<Tour>, StateError> {
        if from >= to {
            return Ok(vec![])
        }
        let bounds = (
            Bound::Included(IndexType::NameFrom(from.to_string()).get_index_key()),
            Bound::Excluded(IndexType::NameFrom(to.to_string()).get_index_key()),
        );
        let (values, _) = self.scan(bounds, limit)?;
        debug!(from, limit, found = values.len(), "range tours by name");
        Ok(values)
    }
}

impl TourRecords for ToursAccess {

    fn add(&self, items: Vec<Tour>) -> Result<Vec<Uuid>, StateError> {
        for item in &items {
            item.validate()?;
        }

        let mut batch = Batch::default();
        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let now = Utc::now().timestamp_millis() as u64;
        for item in items {
            // reuse existing id, or create a new id
            let id = Uuid::parse_str(item.id.as_str()).unwrap_or_else(|_| Uuid::new_v4());
            if !seen.insert(id) {
                return Err(StateError::InvalidValue(
                    InvalidValueError::NameMessage("id".to_string(), "duplicated".to_string())))
            }

            let item_key = ToursAccess::get_key(id);
            Indexing::remove_backref(item_key, self.db.clone(), &mut batch)?;

            let record = TourRecord {
                tour: Tour {
                    id: id.to_string(),
                    ..item
                },
                update_timestamp: now,
            };
            self.add_item(record, &mut batch)?;
            ids.push(id);
        }
        self.db.apply_batch(batch)
            .map_err(|e| StateError::from(e))
            .map(|_| ids)
    }

    fn get(&self, id: Uuid) -> Result<Option<Tour>, StateError> {
        let item_key = ToursAccess::get_key(id);
        match self.db.get(item_key)? {
            Some(b) => Ok(Some(TourRecord::parse_from_bytes(b.as_ref())?.tour)),
            None => Ok(None)
        }
    }

    fn remove(&self, id: Uuid) -> Result<(), StateError> {
        let mut batch = Batch::default();
        let item_key = ToursAccess::get_key(id);
        batch.remove(item_key.as_bytes());
        Indexing::remove_backref(item_key, self.db.clone(), &mut batch)?;
        self.db.apply_batch(batch)
            .map_err(|e| StateError::from(e))
    }
}
