//! Query renderers - turn one AST into a backend query / 查询渲染
//!
//! - FTS5 MATCH expression for the full-text index / 全文索引表达式
//! - LIKE clause + positional parameters for the substring fallback / LIKE 回退

use super::schema::Node;

/// WHERE clause (without the keyword) plus its bind parameters, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeClause {
    pub sql: String,
    pub params: Vec<String>,
}

/// Render an FTS5 MATCH string / 生成 FTS5 查询串
///
/// AND is the index's implicit conjunction (a space); NOT is always
/// parenthesized. AND/OR groups get no parentheses of their own, the tree
/// shape already encodes NOT > AND > OR.
pub fn build_fts_query(ast: &Node) -> String {
    match ast {
        Node::Term { value, is_phrase: true } => format!("\"{}\"", value),
        Node::Term { value, is_phrase: false } => value.clone(),
        Node::Not(child) => format!("NOT ({})", build_fts_query(child)),
        Node::And(children) => children
            .iter()
            .map(build_fts_query)
            .collect::<Vec<_>>()
            .join(" "),
        Node::Or(children) => children
            .iter()
            .map(build_fts_query)
            .collect::<Vec<_>>()
            .join(" OR "),
    }
}

/// Escape LIKE wildcards so they match literally / 转义通配符
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render a substring-match clause over two columns / 生成 LIKE 条件
///
/// Phrases and single words are treated the same here: both become one
/// `%value%` pattern checked against `title_col` and `body_col`.
pub fn build_like_clause(ast: &Node, title_col: &str, body_col: &str) -> LikeClause {
    let mut params = Vec::new();
    let sql = render_like(ast, title_col, body_col, &mut params);
    LikeClause { sql, params }
}

fn render_like(node: &Node, title_col: &str, body_col: &str, params: &mut Vec<String>) -> String {
    match node {
        Node::Term { value, .. } => {
            let pattern = format!("%{}%", escape_like(value));
            params.push(pattern.clone());
            params.push(pattern);
            format!(
                "(lower({title}) LIKE ? ESCAPE '\\' OR lower({body}) LIKE ? ESCAPE '\\')",
                title = title_col,
                body = body_col
            )
        }
        Node::Not(child) => format!("(NOT {})", render_like(child, title_col, body_col, params)),
        Node::And(children) => join_like(children, " AND ", title_col, body_col, params),
        Node::Or(children) => join_like(children, " OR ", title_col, body_col, params),
    }
}

fn join_like(
    children: &[Node],
    separator: &str,
    title_col: &str,
    body_col: &str,
    params: &mut Vec<String>,
) -> String {
    let parts: Vec<String> = children
        .iter()
        .map(|child| render_like(child, title_col, body_col, params))
        .collect();
    format!("({})", parts.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parser::parse_user_query;

    fn fts(raw: &str) -> String {
        build_fts_query(&parse_user_query(raw).expect("query should parse"))
    }

    #[test]
    fn test_fts_terms_and_phrases() {
        assert_eq!(fts("Cat"), "cat");
        assert_eq!(fts("\"Old Case\""), "\"old case\"");
        assert_eq!(fts("cat dog"), "cat dog");
        assert_eq!(fts("a b OR c"), "a b OR c");
    }

    #[test]
    fn test_fts_not_is_parenthesized() {
        assert_eq!(fts("-war"), "NOT (war)");
        assert_eq!(fts("peace -war"), "peace NOT (war)");
        assert_eq!(fts("peace -\"cold\""), "peace NOT (\"cold\")");
        // the prefix form only covers one whitespace-free token
        assert_eq!(fts("peace -\"cold war\""), "peace NOT (cold) war");
    }

    #[test]
    fn test_like_single_term() {
        let clause = build_like_clause(&Node::term("cat"), "title", "summary");
        assert_eq!(
            clause.sql,
            "(lower(title) LIKE ? ESCAPE '\\' OR lower(summary) LIKE ? ESCAPE '\\')"
        );
        assert_eq!(clause.params, vec!["%cat%", "%cat%"]);
    }

    #[test]
    fn test_like_param_order_matches_placeholders() {
        let ast = parse_user_query("a b OR -c").unwrap();
        let clause = build_like_clause(&ast, "title", "summary");
        let placeholders = clause.sql.matches('?').count();
        assert_eq!(placeholders, clause.params.len());
        assert_eq!(clause.params, vec!["%a%", "%a%", "%b%", "%b%", "%c%", "%c%"]);
        assert!(clause.sql.starts_with("(("));
        assert!(clause.sql.contains(" AND "));
        // `OR -c` collapses to `OR c`: the first operator of a run wins
        assert!(!clause.sql.contains("NOT"));
        assert!(clause.sql.contains(") OR (lower(title) LIKE ?"));
    }

    #[test]
    fn test_like_phrase_same_as_word() {
        let phrase = build_like_clause(&Node::phrase("old case"), "title", "summary");
        let word = build_like_clause(&Node::term("old case"), "title", "summary");
        assert_eq!(phrase, word);
    }

    #[test]
    fn test_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        let clause = build_like_clause(&Node::term("50%_off"), "title", "summary");
        assert_eq!(clause.params[0], "%50\\%\\_off%");
    }
}
