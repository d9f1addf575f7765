//! Query parser - builds the AST with precedence NOT > AND > OR / 查询解析器
//!
//! The parser never fails: dangling operators, empty prefixes, unmatched
//! quotes and operator-only input degrade to a smaller tree or to `None`.
//! `None` means "nothing to search for", which is different from a valid
//! query that matches zero records.

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{Node, QueryToken};
use super::tokenizer::tokenize_query;

/// Anything outside ASCII alphanumerics, `_`, `-` and Cyrillic letters
static TERM_CLEAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9A-Za-zА-Яа-яЁё_\-]+").expect("valid term regex"));

/// Token stream after NOT resolution / NOT 处理后的序列
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Node(Node),
    And,
    Or,
}

/// AND-grouped stream; groups separated by OR markers / AND 分组后的序列
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Group(Node),
    Or,
}

/// Normalize a raw term: restrict the character set, collapse runs into one
/// space, lowercase / 规范化词项
pub fn sanitize_term(raw: &str) -> String {
    TERM_CLEAN_RE
        .replace_all(raw.trim(), " ")
        .trim()
        .to_lowercase()
}

fn build_term(token: QueryToken) -> Option<Node> {
    match token {
        QueryToken::Phrase(raw) => {
            // Quotes are single-byte, slicing is on char boundaries
            let inner = &raw[1..raw.len() - 1];
            Some(Node::phrase(sanitize_term(inner)))
        }
        QueryToken::Word(raw) => Some(Node::term(sanitize_term(&raw))),
        _ => None,
    }
}

/// Bind every NOT to the token right after it / 绑定 NOT 操作数
fn consume_not(tokens: Vec<QueryToken>) -> Vec<Resolved> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();

    while let Some(tok) = iter.next() {
        match tok {
            QueryToken::Not => match iter.next() {
                Some(QueryToken::And) => out.push(Resolved::And),
                Some(QueryToken::Or) => out.push(Resolved::Or),
                // NOT NOT cannot survive operator collapsing
                Some(QueryToken::Not) => {}
                Some(operand) => {
                    if let Some(child) = build_term(operand) {
                        out.push(Resolved::Node(Node::not(child)));
                    }
                }
                // Dangling NOT at the end
                None => {}
            },
            QueryToken::And => out.push(Resolved::And),
            QueryToken::Or => out.push(Resolved::Or),
            term => {
                if let Some(node) = build_term(term) {
                    out.push(Resolved::Node(node));
                }
            }
        }
    }

    out
}

fn flush_group(current: &mut Vec<Node>, out: &mut Vec<Segment>) {
    let group = std::mem::take(current);
    let node = match group.len() {
        0 => Node::empty(),
        1 => group.into_iter().next().unwrap_or_else(Node::empty),
        _ => {
            let mut kept: Vec<Node> = group.into_iter().filter(|n| !n.is_empty_term()).collect();
            match kept.len() {
                0 => Node::empty(),
                1 => kept.remove(0),
                _ => Node::And(kept),
            }
        }
    };
    out.push(Segment::Group(node));
}

/// Adjacent items are conjunctive; OR closes the current group / AND 分组
fn group_and(items: Vec<Resolved>) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut current: Vec<Node> = Vec::new();

    for item in items {
        match item {
            Resolved::And => continue,
            Resolved::Or => {
                flush_group(&mut current, &mut out);
                out.push(Segment::Or);
            }
            Resolved::Node(node) => current.push(node),
        }
    }
    flush_group(&mut current, &mut out);

    out
}

/// Split on OR markers and wrap the groups / OR 分组
fn group_or(segments: Vec<Segment>) -> Node {
    let mut groups: Vec<Node> = Vec::new();
    let mut current: Option<Node> = None;

    for segment in segments {
        match segment {
            Segment::Group(node) => current = Some(node),
            Segment::Or => groups.push(current.take().unwrap_or_else(Node::empty)),
        }
    }
    groups.push(current.unwrap_or_else(Node::empty));

    if groups.len() == 1 {
        groups.remove(0)
    } else {
        Node::Or(groups)
    }
}

fn prune_children(children: Vec<Node>) -> Vec<Node> {
    children.into_iter().filter_map(prune).collect()
}

/// Drop empty terms and collapse degenerate composites / 剪枝
///
/// Tree depth is bounded by the grammar (OR > AND > NOT > term), so plain
/// recursion is fine here.
pub fn prune(node: Node) -> Option<Node> {
    match node {
        Node::Term { ref value, .. } => {
            if value.is_empty() {
                None
            } else {
                Some(node)
            }
        }
        Node::Not(child) => prune(*child).map(Node::not),
        Node::And(children) => {
            let mut kept = prune_children(children);
            match kept.len() {
                0 => None,
                1 => Some(kept.remove(0)),
                _ => Some(Node::And(kept)),
            }
        }
        Node::Or(children) => {
            let mut kept = prune_children(children);
            match kept.len() {
                0 => None,
                1 => Some(kept.remove(0)),
                _ => Some(Node::Or(kept)),
            }
        }
    }
}

/// Parse user input into a pruned AST / 解析用户查询
///
/// Syntax / 语法：
/// - Operator words AND OR NOT (any case) / 运算符不区分大小写
/// - Prefixes `+word` (AND), `-word` (NOT), `|word` (OR) / 前缀
/// - `"multi word phrase"` / 短语
/// - Whitespace between terms means AND / 空格即 AND
/// - Parentheses are not supported / 不支持括号
pub fn parse_user_query(raw: &str) -> Option<Node> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let tokens = tokenize_query(raw);
    let resolved = consume_not(tokens);
    let segments = group_and(resolved);
    let ast = prune(group_or(segments));

    tracing::debug!("Parsed query {:?} -> {:?}", raw, ast);
    ast
}
