use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    Course, CreateCourseRequest, Grade, Professor, ScoreAggregate, SubScores,
    scores::requests::ScoreFilter,
};

pub mod sea_orm_storage;

/// 关系存储：课程、教师、评分三张表上的全部读写
///
/// 实现只持有连接句柄，可被多个请求任务并发调用；冲突写入由数据库串行化。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 课程管理方法
    // 创建课程
    async fn add_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 批量创建课程（逐行插入，中途失败时之前的行保留）
    async fn add_courses(&self, courses: Vec<CreateCourseRequest>) -> Result<Vec<Course>>;
    // 删除课程，cascade 为真时先删除引用它的评分
    async fn remove_course(&self, code: &str, cascade: bool) -> Result<()>;
    // 最近创建的课程
    async fn list_last_courses(&self) -> Result<Vec<Course>>;
    // 某位教师关联的课程
    async fn list_courses_by_professor(&self, professor_id: &str) -> Result<Vec<Course>>;
    // 按代码或名称子串搜索课程
    async fn search_courses(&self, pattern: &str) -> Result<Vec<Course>>;

    /// 教师管理方法
    // 创建教师
    async fn add_professor(&self, name: &str) -> Result<Professor>;
    // 批量创建教师
    async fn add_professors(&self, names: Vec<String>) -> Result<Vec<Professor>>;
    // 删除教师，cascade 为真时先删除引用它的评分
    async fn remove_professor(&self, id: &str, cascade: bool) -> Result<()>;
    // 最近创建的教师
    async fn list_last_professors(&self) -> Result<Vec<Professor>>;
    // 某门课程关联的教师
    async fn list_professors_by_course(&self, course_code: &str) -> Result<Vec<Professor>>;
    // 通过姓名获取教师 ID
    async fn get_professor_id_by_name(&self, name: &str) -> Result<String>;
    // 按姓名子串搜索教师
    async fn search_professors(&self, pattern: &str) -> Result<Vec<Professor>>;

    /// 关联与评分方法
    // 建立教师与课程的关联（未评分）
    async fn add_course_professor(&self, professor_id: &str, course_code: &str) -> Result<()>;
    // 批量建立关联，两个列表按下标一一对应
    async fn add_course_professors(
        &self,
        professor_ids: Vec<String>,
        course_codes: Vec<String>,
    ) -> Result<()>;
    // 指纹是否已有评分
    async fn is_graded(&self, fingerprint: &str) -> Result<bool>;
    // 写入一条评分
    async fn insert_grade(
        &self,
        fingerprint: &str,
        professor_id: &str,
        course_code: &str,
        scores: SubScores,
    ) -> Result<Grade>;
    // 按 (课程, 教师) 分组的评分汇总
    async fn list_scores(&self, filter: ScoreFilter) -> Result<Vec<ScoreAggregate>>;

    // 释放连接
    async fn close(&self) -> Result<()>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
