//! 课程、教师及其关联

use super::RatingEngine;
use crate::errors::Result;
use crate::models::{Course, CreateCourseRequest, Professor};

impl RatingEngine {
    pub async fn add_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.run(self.storage.add_course(course)).await
    }

    /// 逐行插入，中途失败时之前的行保留
    pub async fn add_courses(&self, courses: Vec<CreateCourseRequest>) -> Result<Vec<Course>> {
        self.run(self.storage.add_courses(courses)).await
    }

    pub async fn remove_course(&self, code: &str, cascade: bool) -> Result<()> {
        self.run(self.storage.remove_course(code, cascade)).await
    }

    pub async fn add_professor(&self, name: &str) -> Result<Professor> {
        self.run(self.storage.add_professor(name)).await
    }

    pub async fn add_professors(&self, names: Vec<String>) -> Result<Vec<Professor>> {
        self.run(self.storage.add_professors(names)).await
    }

    pub async fn remove_professor(&self, id: &str, cascade: bool) -> Result<()> {
        self.run(self.storage.remove_professor(id, cascade)).await
    }

    /// 建立教师与课程的关联（尚未评分）
    pub async fn add_course_professor(&self, professor_id: &str, course_code: &str) -> Result<()> {
        self.run(self.storage.add_course_professor(professor_id, course_code))
            .await
    }

    /// 两个列表按下标配对，长度必须一致
    pub async fn add_course_professors(
        &self,
        professor_ids: Vec<String>,
        course_codes: Vec<String>,
    ) -> Result<()> {
        self.run(
            self.storage
                .add_course_professors(professor_ids, course_codes),
        )
        .await
    }

    pub async fn list_last_courses(&self) -> Result<Vec<Course>> {
        self.cached("last_courses", "", self.storage.list_last_courses())
            .await
    }

    pub async fn list_courses_by_professor(&self, professor_id: &str) -> Result<Vec<Course>> {
        self.cached(
            "courses_by_professor",
            professor_id,
            self.storage.list_courses_by_professor(professor_id),
        )
        .await
    }

    pub async fn search_courses(&self, pattern: &str) -> Result<Vec<Course>> {
        self.cached("search_courses", pattern, self.storage.search_courses(pattern))
            .await
    }

    pub async fn list_last_professors(&self) -> Result<Vec<Professor>> {
        self.cached("last_professors", "", self.storage.list_last_professors())
            .await
    }

    pub async fn list_professors_by_course(&self, course_code: &str) -> Result<Vec<Professor>> {
        self.cached(
            "professors_by_course",
            course_code,
            self.storage.list_professors_by_course(course_code),
        )
        .await
    }

    pub async fn get_professor_id_by_name(&self, name: &str) -> Result<String> {
        self.cached(
            "professor_id_by_name",
            name,
            self.storage.get_professor_id_by_name(name),
        )
        .await
    }

    pub async fn search_professors(&self, pattern: &str) -> Result<Vec<Professor>> {
        self.cached(
            "search_professors",
            pattern,
            self.storage.search_professors(pattern),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::{CacheAside, create_cache};
    use crate::config::{CacheBackend, CacheConfig, MemoryConfig, RedisConfig};
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    fn cache_config(backend: CacheBackend, url: &str) -> CacheConfig {
        CacheConfig {
            backend,
            default_ttl: 60,
            redis: RedisConfig {
                url: url.to_string(),
                key_prefix: "ratings-test:".to_string(),
            },
            memory: MemoryConfig { max_capacity: 100 },
        }
    }

    async fn engine(cache: CacheAside) -> RatingEngine {
        let storage = Arc::new(SeaOrmStorage::in_memory().await);
        RatingEngine::new(storage, cache, None)
    }

    #[tokio::test]
    async fn test_cached_read_is_stale_until_ttl() {
        let engine = engine(create_cache(&cache_config(CacheBackend::Moka, ""))).await;
        assert!(engine.list_last_courses().await.unwrap().is_empty());

        engine
            .add_course(CreateCourseRequest::new("S209", "How to replace head gaskets"))
            .await
            .unwrap();

        // 写操作不失效缓存
        assert!(engine.list_last_courses().await.unwrap().is_empty());
        // 不同操作名的键互不影响
        assert_eq!(engine.search_courses("S209").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_read_expires_after_ttl() {
        let mut config = cache_config(CacheBackend::Moka, "");
        config.default_ttl = 1;
        let engine = engine(create_cache(&config)).await;
        assert!(engine.list_last_courses().await.unwrap().is_empty());

        engine
            .add_course(CreateCourseRequest::new("S209", "How to replace head gaskets"))
            .await
            .unwrap();
        assert!(engine.list_last_courses().await.unwrap().is_empty());

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        let courses = engine.list_last_courses().await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "S209");
    }

    #[tokio::test]
    async fn test_uncached_read_sees_writes() {
        let engine = engine(CacheAside::Disabled).await;
        assert!(engine.list_last_professors().await.unwrap().is_empty());
        engine.add_professor("Keiichi Tsuchiya").await.unwrap();
        assert_eq!(engine.list_last_professors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails_open() {
        let cache = create_cache(&cache_config(CacheBackend::Redis, "redis://127.0.0.1:1/"));
        assert!(cache.is_enabled());
        let engine = engine(cache).await;

        let professor = engine.add_professor("Keiichi Tsuchiya").await.unwrap();
        assert_eq!(
            engine
                .get_professor_id_by_name("Keiichi Tsuchiya")
                .await
                .unwrap(),
            professor.id
        );
        assert_eq!(engine.list_last_professors().await.unwrap().len(), 1);
        engine.add_professor("Great Teacher Onizuka").await.unwrap();
        assert_eq!(engine.list_last_professors().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_relations_through_engine() {
        let engine = engine(CacheAside::Disabled).await;
        engine
            .add_courses(vec![
                CreateCourseRequest::new("S209", "How to replace head gaskets"),
                CreateCourseRequest::new("CN9A", "Controlling the Anti Lag System"),
            ])
            .await
            .unwrap();
        let professors = engine
            .add_professors(vec!["Great Teacher Onizuka".into(), "Keiichi Tsuchiya".into()])
            .await
            .unwrap();

        engine
            .add_course_professors(
                vec![professors[0].id.clone(), professors[1].id.clone()],
                vec!["S209".into(), "S209".into()],
            )
            .await
            .unwrap();

        let courses = engine
            .list_courses_by_professor(&professors[1].id)
            .await
            .unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "S209");
        assert_eq!(engine.list_professors_by_course("S209").await.unwrap().len(), 2);
        assert!(engine.list_professors_by_course("CN9A").await.unwrap().is_empty());

        let err = engine
            .remove_course("S209", false)
            .await
            .expect_err("associations reference S209");
        assert_eq!(err.code(), "E005");
        engine.remove_course("S209", true).await.unwrap();
        assert!(engine.list_professors_by_course("S209").await.unwrap().is_empty());
    }
}
