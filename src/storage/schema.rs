//! SQLite schema for the news store / 新闻库表结构

/// Base table and indices, always created / 基础表
pub const BASE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS news (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source TEXT NOT NULL,
        title TEXT NOT NULL,
        link TEXT NOT NULL,
        published TEXT,
        summary TEXT,
        hash TEXT NOT NULL UNIQUE,
        added_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_news_published ON news(published)",
    "CREATE INDEX IF NOT EXISTS idx_news_source ON news(source)",
];

/// External-content FTS5 table kept in sync by triggers / 全文索引表与触发器
pub const FTS_SCHEMA: &[&str] = &[
    r#"
    CREATE VIRTUAL TABLE IF NOT EXISTS news_fts USING fts5(
        title,
        summary,
        content='news',
        content_rowid='id'
    )
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS news_ai AFTER INSERT ON news BEGIN
        INSERT INTO news_fts(rowid, title, summary) VALUES (new.id, new.title, new.summary);
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS news_ad AFTER DELETE ON news BEGIN
        INSERT INTO news_fts(news_fts, rowid, title, summary) VALUES ('delete', old.id, old.title, old.summary);
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS news_au AFTER UPDATE ON news BEGIN
        INSERT INTO news_fts(news_fts, rowid, title, summary) VALUES ('delete', old.id, old.title, old.summary);
        INSERT INTO news_fts(rowid, title, summary) VALUES (new.id, new.title, new.summary);
    END
    "#,
];

/// Columns returned for every record / 记录字段
pub const RECORD_COLUMNS: &str = "source, title, link, published, summary, added_at";
