//! Mock item writer used by the error-path tests.
use mockall::mock;

use minibatch::{core::item::ItemWriter, BatchError};

mock! {
    pub StringItemWriter {}
    impl ItemWriter<String> for StringItemWriter {
        fn write(&self, items: &[String]) -> Result<(), BatchError>;
        fn open(&self) -> Result<(), BatchError>;
        fn close(&self) -> Result<(), BatchError>;
    }
}
