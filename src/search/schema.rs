//! Search data model - tokens, AST nodes and result records / 搜索数据模型

use serde::{Deserialize, Serialize};

/// Query token produced by the tokenizer / 查询词元
///
/// Operator keywords are recognised case-insensitively; phrase tokens keep
/// their surrounding quotes until they are turned into a [`Node::Term`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    /// Bare word (maximal run of non-whitespace) / 普通词
    Word(String),
    /// Quoted phrase including the quotes / 带引号短语
    Phrase(String),
    And,
    Or,
    Not,
}

impl QueryToken {
    /// Classify one raw token string / 对原始词元分类
    pub fn classify(raw: &str) -> Self {
        if is_quoted_phrase(raw) {
            return QueryToken::Phrase(raw.to_string());
        }
        match raw.to_uppercase().as_str() {
            "AND" => QueryToken::And,
            "OR" => QueryToken::Or,
            "NOT" => QueryToken::Not,
            _ => QueryToken::Word(raw.to_string()),
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, QueryToken::And | QueryToken::Or | QueryToken::Not)
    }

    pub fn is_term(&self) -> bool {
        !self.is_operator()
    }
}

/// A token wrapped in straight double quotes on both ends.
pub fn is_quoted_phrase(raw: &str) -> bool {
    raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"')
}

/// Parsed query expression (AST node) / 查询语法树节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Term { value: String, is_phrase: bool },
    Not(Box<Node>),
    And(Vec<Node>),
    Or(Vec<Node>),
}

impl Node {
    pub fn term(value: impl Into<String>) -> Self {
        Node::Term { value: value.into(), is_phrase: false }
    }

    pub fn phrase(value: impl Into<String>) -> Self {
        Node::Term { value: value.into(), is_phrase: true }
    }

    pub fn not(child: Node) -> Self {
        Node::Not(Box::new(child))
    }

    /// Placeholder left behind by empty groups, removed by pruning / 空占位节点
    pub(crate) fn empty() -> Self {
        Node::term("")
    }

    pub(crate) fn is_empty_term(&self) -> bool {
        matches!(self, Node::Term { value, .. } if value.is_empty())
    }
}

/// One stored news record as returned to callers / 新闻记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NewsRecord {
    pub source: String,
    pub title: String,
    pub link: String,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub added_at: String,
}

/// New item to be stored; `hash` de-duplicates repeated fetches / 待入库条目
#[derive(Debug, Clone)]
pub struct NewsItem {
    pub source: String,
    pub title: String,
    pub link: String,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub hash: String,
}

/// Per-source record count / 按来源统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// One page of search results / 搜索结果页
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub records: Vec<NewsRecord>,
    pub total: i64,
    /// `false` when the input held nothing to search for (storage not queried)
    pub parsed: bool,
}

impl SearchPage {
    /// Result for input that parsed to no node / 空查询结果
    pub fn nothing_to_search() -> Self {
        Self { records: Vec::new(), total: 0, parsed: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_operators_case_insensitive() {
        assert_eq!(QueryToken::classify("and"), QueryToken::And);
        assert_eq!(QueryToken::classify("Or"), QueryToken::Or);
        assert_eq!(QueryToken::classify("NOT"), QueryToken::Not);
        assert_eq!(QueryToken::classify("notice"), QueryToken::Word("notice".to_string()));
    }

    #[test]
    fn test_classify_quoted_operator_is_phrase() {
        assert_eq!(QueryToken::classify("\"OR\""), QueryToken::Phrase("\"OR\"".to_string()));
        // A lone quote is not a phrase
        assert_eq!(QueryToken::classify("\""), QueryToken::Word("\"".to_string()));
    }
}
