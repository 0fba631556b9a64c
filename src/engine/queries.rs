//! 评分汇总查询

use super::RatingEngine;
use crate::errors::Result;
use crate::models::{ScoreAggregate, ScoreFilter};

impl RatingEngine {
    /// 按 (课程, 教师) 分组的评分汇总，缓存键由查询条件决定
    pub async fn list_scores(&self, filter: ScoreFilter) -> Result<Vec<ScoreAggregate>> {
        let operation = filter.operation();
        let argument = filter.argument().to_string();
        self.cached(operation, &argument, self.storage.list_scores(filter))
            .await
    }

    /// 最近的 100 组
    pub async fn last_scores(&self) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::Latest).await
    }

    pub async fn scores_by_professor_id(&self, id: &str) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::ProfessorId(id.to_string()))
            .await
    }

    pub async fn scores_by_professor_name(&self, name: &str) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::ProfessorName(name.to_string()))
            .await
    }

    pub async fn scores_by_professor_name_like(&self, name: &str) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::ProfessorNameLike(name.to_string()))
            .await
    }

    pub async fn scores_by_course_code(&self, code: &str) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::CourseCode(code.to_string()))
            .await
    }

    pub async fn scores_by_course_code_like(&self, code: &str) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::CourseCodeLike(code.to_string()))
            .await
    }

    pub async fn scores_by_course_name(&self, name: &str) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::CourseName(name.to_string()))
            .await
    }

    pub async fn scores_by_course_name_like(&self, name: &str) -> Result<Vec<ScoreAggregate>> {
        self.list_scores(ScoreFilter::CourseNameLike(name.to_string()))
            .await
    }
}
