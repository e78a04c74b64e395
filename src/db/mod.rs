pub mod mongo;

pub use mongo::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Connection string has no default database")]
    NoDefaultDatabase,

    #[error("BSON conversion error: {0}")]
    Conversion(String),
}
