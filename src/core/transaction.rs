use log::error;

use crate::error::BatchError;

/// The transactional resource a step commits each chunk against.
///
/// The step acquires a transaction right before writing a chunk and releases
/// it right after commit or rollback; it is never held across chunks.
pub trait TransactionManager {
    fn begin(&self) -> Result<(), BatchError>;
    fn commit(&self) -> Result<(), BatchError>;
    fn rollback(&self) -> Result<(), BatchError>;
}

/// Scoped acquisition of a transaction.
///
/// Calling [`complete`](TransactionScope::complete) commits; dropping the
/// scope without completing it rolls back. Every exit path out of the chunk
/// write, including early returns on error, therefore releases the resource.
pub struct TransactionScope<'a> {
    manager: &'a dyn TransactionManager,
    completed: bool,
}

impl<'a> TransactionScope<'a> {
    /// Begins a transaction on the given manager.
    pub fn begin(manager: &'a dyn TransactionManager) -> Result<TransactionScope<'a>, BatchError> {
        manager.begin()?;
        Ok(TransactionScope {
            manager,
            completed: false,
        })
    }

    /// Commits the transaction, consuming the scope.
    pub fn complete(mut self) -> Result<(), BatchError> {
        self.completed = true;
        self.manager.commit()
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            if let Err(err) = self.manager.rollback() {
                error!("Error occured during rollback: {}", err);
            }
        }
    }
}

/// Transaction manager for writers with no transactional medium, for example
/// the logger writer. Used when a step is built without an explicit manager.
#[derive(Default)]
pub struct NoOpTransactionManager {}

impl TransactionManager for NoOpTransactionManager {
    fn begin(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn commit(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn rollback(&self) -> Result<(), BatchError> {
        Ok(())
    }
}
