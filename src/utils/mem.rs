use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use lazy_static::lazy_static;
use crate::borrowers::domain::model::BorrowerEntity;
use crate::core::library::{LibraryError, LibraryResult};
use crate::items::domain::model::ItemEntity;
use crate::lending::domain::model::LoanEntity;

// MemoryDatabase is the process-local counterpart of the DynamoDB tables,
// shared by every in-memory repository the same way the DDB repositories
// share tables. Multi-record commits take the table locks in declaration
// order: items, borrowers, loans.
pub(crate) struct MemoryDatabase {
    pub(crate) items: RwLock<HashMap<String, ItemEntity>>,
    pub(crate) borrowers: RwLock<HashMap<String, BorrowerEntity>>,
    pub(crate) loans: RwLock<HashMap<String, LoanEntity>>,
}

impl MemoryDatabase {
    pub(crate) fn new() -> Arc<MemoryDatabase> {
        Arc::new(MemoryDatabase {
            items: RwLock::new(HashMap::new()),
            borrowers: RwLock::new(HashMap::new()),
            loans: RwLock::new(HashMap::new()),
        })
    }
}

lazy_static! {
    static ref SHARED_DB: Arc<MemoryDatabase> = MemoryDatabase::new();
}

pub(crate) fn shared_db() -> Arc<MemoryDatabase> {
    SHARED_DB.clone()
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> LibraryResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| LibraryError::runtime("memory store lock poisoned", None))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> LibraryResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| LibraryError::runtime("memory store lock poisoned", None))
}
