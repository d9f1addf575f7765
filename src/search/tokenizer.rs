//! Query tokenizer - splits user input and normalizes operators / 查询分词器
//!
//! Stages / 阶段：
//! - Split into quoted phrases or bare words / 拆分短语与单词
//! - Rewrite `+word` / `-word` / `|word` into AND / NOT / OR / 前缀展开
//! - Insert AND between adjacent terms / 相邻词插入 AND
//! - Collapse runs of operators / 合并连续运算符

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{is_quoted_phrase, QueryToken};

/// Quoted phrase (closing quote required) or maximal non-whitespace run
static TOKEN_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"".*?"|\S+"#).expect("valid token regex"));

/// Split raw input into token strings / 拆分原始输入
///
/// An unmatched quote is not special: `"abc` comes back as a bare token.
pub fn split_tokens(raw: &str) -> Vec<String> {
    TOKEN_SPLIT_RE
        .find_iter(raw)
        .map(|m| m.as_str())
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand prefix shorthand into explicit operators / 展开前缀简写
pub fn expand_prefixes(tokens: &[String]) -> Vec<QueryToken> {
    let mut expanded = Vec::with_capacity(tokens.len());

    for tok in tokens {
        if is_quoted_phrase(tok) {
            expanded.push(QueryToken::Phrase(tok.clone()));
            continue;
        }

        let mut chars = tok.chars();
        let operator = match chars.next() {
            Some('+') => Some(QueryToken::And),
            Some('-') => Some(QueryToken::Not),
            Some('|') => Some(QueryToken::Or),
            _ => None,
        };

        match operator {
            Some(op) => {
                let body = chars.as_str();
                // A bare prefix character carries no term
                if body.is_empty() {
                    continue;
                }
                expanded.push(op);
                expanded.push(QueryToken::classify(body));
            }
            None => expanded.push(QueryToken::classify(tok)),
        }
    }

    expanded
}

/// Insert AND between two adjacent terms / 插入隐式 AND
pub fn insert_implicit_and(tokens: Vec<QueryToken>) -> Vec<QueryToken> {
    let mut normalized = Vec::with_capacity(tokens.len() * 2);
    let mut prev_was_term = false;

    for tok in tokens {
        let is_term = tok.is_term();
        if is_term && prev_was_term {
            normalized.push(QueryToken::And);
        }
        normalized.push(tok);
        prev_was_term = is_term;
    }

    normalized
}

/// Keep only the first operator of every operator run / 合并连续运算符
pub fn collapse_operators(tokens: Vec<QueryToken>) -> Vec<QueryToken> {
    let mut cleaned: Vec<QueryToken> = Vec::with_capacity(tokens.len());

    for tok in tokens {
        let prev_is_op = cleaned.last().map(QueryToken::is_operator).unwrap_or(false);
        if tok.is_operator() && prev_is_op {
            continue;
        }
        cleaned.push(tok);
    }

    cleaned
}

/// Full token pipeline: raw text -> collapsed token stream / 完整分词流程
pub fn tokenize_query(raw: &str) -> Vec<QueryToken> {
    let tokens = split_tokens(raw);
    let expanded = expand_prefixes(&tokens);
    collapse_operators(insert_implicit_and(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> QueryToken {
        QueryToken::Word(s.to_string())
    }

    #[test]
    fn test_split_phrases_and_words() {
        let tokens = split_tokens(r#"  cat "old case"   dog "#);
        assert_eq!(tokens, vec!["cat", "\"old case\"", "dog"]);
    }

    #[test]
    fn test_split_unmatched_quote() {
        let tokens = split_tokens(r#""old case"#);
        assert_eq!(tokens, vec!["\"old", "case"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_tokens("").is_empty());
        assert!(split_tokens(" \t\n ").is_empty());
    }

    #[test]
    fn test_expand_prefixes() {
        let tokens = split_tokens("+cat -war |dog - + |");
        let expanded = expand_prefixes(&tokens);
        assert_eq!(
            expanded,
            vec![
                QueryToken::And,
                word("cat"),
                QueryToken::Not,
                word("war"),
                QueryToken::Or,
                word("dog"),
            ]
        );
    }

    #[test]
    fn test_expand_keeps_phrase() {
        let tokens = split_tokens(r#""-war""#);
        assert_eq!(expand_prefixes(&tokens), vec![QueryToken::Phrase("\"-war\"".to_string())]);
    }

    #[test]
    fn test_implicit_and() {
        let tokens = insert_implicit_and(vec![word("a"), word("b"), QueryToken::Or, word("c")]);
        assert_eq!(tokens, vec![word("a"), QueryToken::And, word("b"), QueryToken::Or, word("c")]);
    }

    #[test]
    fn test_collapse_operators_keeps_first() {
        let tokens = collapse_operators(vec![
            word("a"),
            QueryToken::Or,
            QueryToken::And,
            QueryToken::Or,
            word("b"),
        ]);
        assert_eq!(tokens, vec![word("a"), QueryToken::Or, word("b")]);
    }

    #[test]
    fn test_tokenize_query_pipeline() {
        let tokens = tokenize_query("cat AND and dog");
        assert_eq!(tokens, vec![word("cat"), QueryToken::And, word("dog")]);

        // NOT is an operator, so no AND lands in front of it
        let tokens = tokenize_query("cat -war");
        assert_eq!(tokens, vec![word("cat"), QueryToken::Not, word("war")]);
    }
}
