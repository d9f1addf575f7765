pub mod config;
pub mod error;
pub mod search;
pub mod storage;

pub use error::{Result, SearchError};
