pub mod query;
pub mod types;

pub use query::{create_session, search, session_page};
