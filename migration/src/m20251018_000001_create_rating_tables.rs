use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// SQLite 方言
const SQLITE_SCHEMA: &[&str] = &[
    // 课程表
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        code TEXT PRIMARY KEY NOT NULL CHECK (length(code) > 0),
        name TEXT NOT NULL CHECK (length(name) > 0),
        inserted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (code, name)
    )
    "#,
    // 教师表
    r#"
    CREATE TABLE IF NOT EXISTS professors (
        id VARCHAR(36) PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE CHECK (length(name) > 0),
        inserted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    // 评分表（fingerprint 为空的行表示教师与课程的关联）
    r#"
    CREATE TABLE IF NOT EXISTS scores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fingerprint TEXT NOT NULL,
        professor_id VARCHAR(36) NOT NULL REFERENCES professors (id),
        course_code TEXT NOT NULL REFERENCES courses (code),
        score_teaching REAL CHECK (score_teaching >= 0 AND score_teaching <= 5),
        score_coursework REAL CHECK (score_coursework >= 0 AND score_coursework <= 5),
        score_learning REAL CHECK (score_learning >= 0 AND score_learning <= 5),
        inserted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

/// PostgreSQL 方言
const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        code TEXT PRIMARY KEY NOT NULL CHECK (length(code) > 0),
        name TEXT NOT NULL CHECK (length(name) > 0),
        inserted_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (code, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS professors (
        id VARCHAR(36) PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE CHECK (length(name) > 0),
        inserted_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS scores (
        id BIGSERIAL PRIMARY KEY,
        fingerprint TEXT NOT NULL,
        professor_id VARCHAR(36) NOT NULL REFERENCES professors (id),
        course_code TEXT NOT NULL REFERENCES courses (code),
        score_teaching DOUBLE PRECISION CHECK (score_teaching >= 0 AND score_teaching <= 5),
        score_coursework DOUBLE PRECISION CHECK (score_coursework >= 0 AND score_coursework <= 5),
        score_learning DOUBLE PRECISION CHECK (score_learning >= 0 AND score_learning <= 5),
        inserted_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

/// 两种方言共用的索引
const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_scores_fingerprint ON scores (fingerprint)",
    "CREATE INDEX IF NOT EXISTS idx_scores_course_code ON scores (course_code)",
    "CREATE INDEX IF NOT EXISTS idx_scores_professor_id ON scores (professor_id)",
    // 同一对教师/课程只能有一条未评分的关联行
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_scores_association \
     ON scores (professor_id, course_code) WHERE fingerprint = ''",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = match manager.get_database_backend() {
            DbBackend::Sqlite => SQLITE_SCHEMA,
            DbBackend::Postgres => POSTGRES_SCHEMA,
            other => {
                return Err(DbErr::Migration(format!(
                    "unsupported database backend: {other:?}"
                )));
            }
        };

        let db = manager.get_connection();
        for statement in schema.iter().chain(INDEXES) {
            db.execute_unprepared(statement).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        let db = manager.get_connection();
        for table in ["scores", "professors", "courses"] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table}"))
                .await?;
        }
        Ok(())
    }
}
