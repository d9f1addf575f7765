//! 新闻数据库索引 - SQLite 存储 + FTS5 全文索引
//!
//! 存储方案：
//! - news表：新闻记录，hash 唯一去重
//! - news_fts表：外部内容 FTS5 索引（title + summary），触发器同步
//! - FTS5 不可用时回退到 LIKE 子串匹配
//!
//! 全文索引能力在启动时探测一次，之后不再改变

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use super::schema::{BASE_SCHEMA, FTS_SCHEMA, RECORD_COLUMNS};
use super::{NewsStorage, RenderedQuery};
use crate::error::Result;
use crate::search::schema::{NewsItem, NewsRecord, SourceCount};

/// LIMIT/OFFSET value; saturates instead of wrapping negative
fn sql_bound(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// 新闻数据库
pub struct NewsIndex {
    db: Pool<Sqlite>,
    fts_available: bool,
}

impl NewsIndex {
    /// 打开数据库文件并初始化表结构（WAL模式）
    pub async fn open(db_url: &str, fts_enabled: bool) -> Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(db_url)
            .await?;

        // 启用WAL模式，提高并发读性能
        sqlx::query("PRAGMA journal_mode=WAL").execute(&db).await?;
        // 设置busy_timeout，避免锁超时
        sqlx::query("PRAGMA busy_timeout=5000").execute(&db).await?;
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&db).await?;

        let index = Self::new(db, fts_enabled).await?;
        tracing::info!(
            "News database opened: {} (fts5: {})",
            db_url,
            index.fts_available
        );
        Ok(index)
    }

    /// 内存数据库（单连接，连接不回收，否则数据丢失）
    pub async fn in_memory(fts_enabled: bool) -> Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::new(db, fts_enabled).await
    }

    /// 使用现有连接池，建表并探测全文索引
    pub async fn new(db: Pool<Sqlite>, fts_enabled: bool) -> Result<Self> {
        let fts_available = Self::init(&db, fts_enabled).await?;
        Ok(Self { db, fts_available })
    }

    /// 关闭数据库连接池 / Close database connection pool
    pub async fn close(&self) {
        self.db.close().await;
    }

    /// 初始化表结构，返回 FTS5 是否可用
    async fn init(db: &Pool<Sqlite>, fts_enabled: bool) -> Result<bool> {
        for stmt in BASE_SCHEMA {
            sqlx::query(stmt).execute(db).await?;
        }

        if !fts_enabled {
            tracing::warn!("Full-text index disabled by config, using LIKE fallback");
            return Ok(false);
        }

        for stmt in FTS_SCHEMA {
            if let Err(e) = sqlx::query(stmt).execute(db).await {
                // SQLite 编译时未带 FTS5
                if e.to_string().to_lowercase().contains("fts5") {
                    tracing::warn!("FTS5 unavailable ({}), using LIKE fallback", e);
                    return Ok(false);
                }
                return Err(e.into());
            }
        }

        match sqlx::query("SELECT count(*) FROM news_fts").fetch_one(db).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("FTS5 probe failed ({}), using LIKE fallback", e);
                Ok(false)
            }
        }
    }

    /// 批量插入，hash 重复的记录静默跳过，返回实际插入数
    pub async fn insert_many(&self, items: &[NewsItem]) -> Result<u64> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;
        let mut inserted = 0u64;

        for item in items {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO news (source, title, link, published, summary, hash) VALUES (?, ?, ?, ?, ?, ?)"
            )
            .bind(&item.source)
            .bind(&item.title)
            .bind(&item.link)
            .bind(&item.published)
            .bind(&item.summary)
            .bind(&item.hash)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!("Inserted {}/{} news items", inserted, items.len());
        Ok(inserted)
    }

    /// 最新新闻分页（按发布时间倒序）
    pub async fn latest_page(&self, offset: usize, limit: usize) -> Result<Vec<NewsRecord>> {
        let sql = format!(
            "SELECT {} FROM news ORDER BY datetime(published) DESC, id DESC LIMIT ? OFFSET ?",
            RECORD_COLUMNS
        );
        let rows = sqlx::query_as::<_, NewsRecord>(&sql)
            .bind(sql_bound(limit))
            .bind(sql_bound(offset))
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    /// 新闻总数
    pub async fn total(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(&self.db)
            .await?;
        Ok(total)
    }

    /// 按来源统计
    pub async fn count_by_source(&self) -> Result<Vec<SourceCount>> {
        let rows = sqlx::query_as::<_, SourceCount>(
            "SELECT source, COUNT(*) AS count FROM news GROUP BY source ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl NewsStorage for NewsIndex {
    fn probe_capability(&self) -> bool {
        self.fts_available
    }

    async fn count(&self, query: &RenderedQuery) -> Result<i64> {
        let total = match query {
            RenderedQuery::Fts(expr) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM news_fts WHERE news_fts MATCH ?")
                    .bind(expr.as_str())
                    .fetch_one(&self.db)
                    .await?
            }
            RenderedQuery::Like(clause) => {
                let sql = format!("SELECT COUNT(*) FROM news WHERE {}", clause.sql);
                let mut q = sqlx::query_scalar::<_, i64>(&sql);
                for param in &clause.params {
                    q = q.bind(param.as_str());
                }
                q.fetch_one(&self.db).await?
            }
        };
        Ok(total)
    }

    async fn fetch_page(
        &self,
        query: &RenderedQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<NewsRecord>> {
        let rows = match query {
            RenderedQuery::Fts(expr) => {
                sqlx::query_as::<_, NewsRecord>(
                    r#"
                    SELECT n.source, n.title, n.link, n.published, n.summary, n.added_at
                    FROM news_fts
                    JOIN news n ON n.id = news_fts.rowid
                    WHERE news_fts MATCH ?
                    ORDER BY n.id DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(expr.as_str())
                .bind(sql_bound(limit))
                .bind(sql_bound(offset))
                .fetch_all(&self.db)
                .await?
            }
            RenderedQuery::Like(clause) => {
                let sql = format!(
                    "SELECT {} FROM news WHERE {} ORDER BY id DESC LIMIT ? OFFSET ?",
                    RECORD_COLUMNS, clause.sql
                );
                let mut q = sqlx::query_as::<_, NewsRecord>(&sql);
                for param in &clause.params {
                    q = q.bind(param.as_str());
                }
                q.bind(sql_bound(limit))
                    .bind(sql_bound(offset))
                    .fetch_all(&self.db)
                    .await?
            }
        };
        Ok(rows)
    }
}
