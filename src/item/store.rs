use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use log::debug;

use crate::{
    core::{
        item::{ItemWriter, ItemWriterResult},
        transaction::TransactionManager,
    },
    BatchError,
};

/// An in-memory record store keyed by an auto-assigned identifier.
///
/// The store doubles as a [`TransactionManager`]: between `begin` and
/// `commit` every write is staged, and only `commit` assigns row ids and
/// makes the records visible. `rollback` discards the staged records, so a
/// failed chunk is never observable. Writes outside a transaction commit
/// immediately.
#[derive(Default)]
pub struct RecordStore<T> {
    rows: RefCell<BTreeMap<u64, T>>,
    staged: RefCell<Vec<T>>,
    next_id: Cell<u64>,
    in_transaction: Cell<bool>,
}

impl<T: Clone> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            rows: RefCell::new(BTreeMap::new()),
            staged: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            in_transaction: Cell::new(false),
        }
    }

    /// Committed records, in insertion (id) order.
    pub fn records(&self) -> Vec<T> {
        self.rows.borrow().values().cloned().collect()
    }

    /// Committed rows with their assigned ids.
    pub fn rows(&self) -> Vec<(u64, T)> {
        self.rows
            .borrow()
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    fn append(&self, items: &[T]) {
        if self.in_transaction.get() {
            self.staged.borrow_mut().extend_from_slice(items);
        } else {
            for item in items {
                self.insert_committed(item.clone());
            }
        }
    }

    fn insert_committed(&self, item: T) {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.rows.borrow_mut().insert(id, item);
    }
}

impl<T: Clone> TransactionManager for RecordStore<T> {
    fn begin(&self) -> Result<(), BatchError> {
        if self.in_transaction.get() {
            return Err(BatchError::Transaction(
                "a transaction is already in progress".to_string(),
            ));
        }
        self.in_transaction.set(true);
        Ok(())
    }

    fn commit(&self) -> Result<(), BatchError> {
        if !self.in_transaction.get() {
            return Err(BatchError::Transaction(
                "no transaction in progress".to_string(),
            ));
        }

        let staged: Vec<T> = self.staged.borrow_mut().drain(..).collect();
        debug!("Committing {} staged records", staged.len());

        for item in staged {
            self.insert_committed(item);
        }
        self.in_transaction.set(false);
        Ok(())
    }

    fn rollback(&self) -> Result<(), BatchError> {
        if !self.in_transaction.get() {
            return Err(BatchError::Transaction(
                "no transaction in progress".to_string(),
            ));
        }

        let discarded = self.staged.borrow().len();
        debug!("Rolling back {} staged records", discarded);

        self.staged.borrow_mut().clear();
        self.in_transaction.set(false);
        Ok(())
    }
}

/// A writer that appends each chunk to a [`RecordStore`].
///
/// Pair it with the store itself as the step's transaction manager to get
/// chunk-level commit and rollback.
pub struct StoreItemWriter<'a, T> {
    store: &'a RecordStore<T>,
}

impl<'a, T> StoreItemWriter<'a, T> {
    pub fn new(store: &'a RecordStore<T>) -> Self {
        Self { store }
    }
}

impl<T: Clone> ItemWriter<T> for StoreItemWriter<'_, T> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        self.store.append(items);
        Ok(())
    }
}
