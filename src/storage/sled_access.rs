use std::path::PathBuf;
use std::sync::Arc;
use sled::{Db};
use crate::errors::StateError;
use crate::storage::tour_store::ToursAccess;

pub struct SledStorage {
    pub(crate) db: Arc<Db>,
}

/// Sled backed storage
impl SledStorage {
    /// Open Sled DB at the specified path
    pub fn open(path: PathBuf) -> Result<SledStorage, StateError> {
        let db = sled::open(path)?;
        Ok(SledStorage {
            db: Arc::new(db),
        })
    }

    /// Open API to access tours store. The handle is cheap to clone and can be shared between listing sessions
    pub fn get_tours(&self) -> ToursAccess {
        ToursAccess { db: self.db.clone() }
    }
}
