//! Search module - query language core / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - Parsing and rendering are pure functions, no I/O, no shared state
//! - Gateway controls flow, storage only exposes primitives (count, page)
//! - Call direction: Gateway → Storage (unidirectional) / 调用方向
//!
//! Query language / 查询语法：
//! - AND / OR / NOT (any case), precedence NOT > AND > OR
//! - `+word` / `-word` / `|word` shorthand
//! - `"quoted phrases"`, whitespace = AND, no parentheses

pub mod engine;
pub mod parser;
pub mod render;
pub mod schema;
pub mod session;
pub mod tokenizer;

pub use engine::SearchGateway;
pub use parser::parse_user_query;
pub use render::{build_fts_query, build_like_clause, LikeClause};
pub use schema::{NewsItem, NewsRecord, Node, SearchPage, SourceCount};
pub use session::{MemorySessionStore, SessionStore};
