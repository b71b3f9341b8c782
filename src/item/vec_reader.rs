use std::cell::RefCell;
use std::vec::IntoIter;

use log::debug;

use crate::core::item::{ItemReader, ItemReaderResult};

/// A reader over an in-memory ordered collection.
///
/// Drains the underlying vector strictly in input order and signals end of
/// stream once every element has been returned. The cursor is consumed by a
/// run: re-running a step needs a fresh reader.
///
/// # Examples
///
/// ```
/// use minibatch::core::item::ItemReader;
/// use minibatch::item::vec_reader::VecItemReader;
///
/// let reader = VecItemReader::new(vec![1, 2, 3]);
///
/// assert_eq!(reader.read().unwrap(), Some(1));
/// assert_eq!(reader.read().unwrap(), Some(2));
/// assert_eq!(reader.read().unwrap(), Some(3));
/// assert_eq!(reader.read().unwrap(), None);
/// ```
pub struct VecItemReader<R> {
    items: RefCell<IntoIter<R>>,
}

impl<R> VecItemReader<R> {
    pub fn new(items: Vec<R>) -> Self {
        Self {
            items: RefCell::new(items.into_iter()),
        }
    }
}

impl<R> ItemReader<R> for VecItemReader<R> {
    fn read(&self) -> ItemReaderResult<R> {
        let next = self.items.borrow_mut().next();

        if next.is_some() {
            debug!("Reading the next item from the collection");
        }

        Ok(next)
    }
}
