//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite 和 PostgreSQL。

mod courses;
mod db_errors;
mod professors;
mod scores;

use crate::config::DatabaseConfig;
use crate::errors::{RatingsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// 列表查询的默认上限
pub(crate) const RECENT_LIMIT: u64 = 100;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移（可重复执行）
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| RatingsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| RatingsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");

        // 内存库只存在于单个连接的生命周期内，连接池固定为 1 且不回收
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size.max(1))
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| RatingsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| RatingsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(url.to_string())
        } else {
            Err(RatingsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 关闭连接池
    pub async fn close_impl(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| RatingsError::database_connection(format!("关闭数据库连接失败: {e}")))
    }
}

// Storage trait 实现
use crate::models::{
    Course, CreateCourseRequest, Grade, Professor, ScoreAggregate, ScoreFilter, SubScores,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 课程模块
    async fn add_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.add_course_impl(course).await
    }

    async fn add_courses(&self, courses: Vec<CreateCourseRequest>) -> Result<Vec<Course>> {
        self.add_courses_impl(courses).await
    }

    async fn remove_course(&self, code: &str, cascade: bool) -> Result<()> {
        self.remove_course_impl(code, cascade).await
    }

    async fn list_last_courses(&self) -> Result<Vec<Course>> {
        self.list_last_courses_impl().await
    }

    async fn list_courses_by_professor(&self, professor_id: &str) -> Result<Vec<Course>> {
        self.list_courses_by_professor_impl(professor_id).await
    }

    async fn search_courses(&self, pattern: &str) -> Result<Vec<Course>> {
        self.search_courses_impl(pattern).await
    }

    // 教师模块
    async fn add_professor(&self, name: &str) -> Result<Professor> {
        self.add_professor_impl(name).await
    }

    async fn add_professors(&self, names: Vec<String>) -> Result<Vec<Professor>> {
        self.add_professors_impl(names).await
    }

    async fn remove_professor(&self, id: &str, cascade: bool) -> Result<()> {
        self.remove_professor_impl(id, cascade).await
    }

    async fn list_last_professors(&self) -> Result<Vec<Professor>> {
        self.list_last_professors_impl().await
    }

    async fn list_professors_by_course(&self, course_code: &str) -> Result<Vec<Professor>> {
        self.list_professors_by_course_impl(course_code).await
    }

    async fn get_professor_id_by_name(&self, name: &str) -> Result<String> {
        self.get_professor_id_by_name_impl(name).await
    }

    async fn search_professors(&self, pattern: &str) -> Result<Vec<Professor>> {
        self.search_professors_impl(pattern).await
    }

    // 关联与评分模块
    async fn add_course_professor(&self, professor_id: &str, course_code: &str) -> Result<()> {
        self.add_course_professor_impl(professor_id, course_code)
            .await
    }

    async fn add_course_professors(
        &self,
        professor_ids: Vec<String>,
        course_codes: Vec<String>,
    ) -> Result<()> {
        self.add_course_professors_impl(professor_ids, course_codes)
            .await
    }

    async fn is_graded(&self, fingerprint: &str) -> Result<bool> {
        self.is_graded_impl(fingerprint).await
    }

    async fn insert_grade(
        &self,
        fingerprint: &str,
        professor_id: &str,
        course_code: &str,
        scores: SubScores,
    ) -> Result<Grade> {
        self.insert_grade_impl(fingerprint, professor_id, course_code, scores)
            .await
    }

    async fn list_scores(&self, filter: ScoreFilter) -> Result<Vec<ScoreAggregate>> {
        self.list_scores_impl(filter).await
    }

    async fn close(&self) -> Result<()> {
        self.close_impl().await
    }
}

#[cfg(test)]
impl SeaOrmStorage {
    /// 测试用内存库，已执行迁移
    pub(crate) async fn in_memory() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
            operation_timeout: 0,
        };
        Self::connect(&config)
            .await
            .expect("in-memory database should open")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("ratings.db").unwrap(),
            "sqlite://ratings.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/ratings").unwrap(),
            "postgres://u:p@localhost/ratings"
        );
        let err = SeaOrmStorage::build_database_url("mysql://localhost/ratings")
            .expect_err("mysql is not supported");
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_migration_is_idempotent() {
        let storage = SeaOrmStorage::in_memory().await;
        Migrator::up(&storage.db, None)
            .await
            .expect("second migration run should be a no-op");
        assert!(storage.list_last_courses_impl().await.unwrap().is_empty());
    }
}
