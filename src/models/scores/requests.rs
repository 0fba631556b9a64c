use serde::{Deserialize, Serialize};

use super::entities::SubScores;

/// 学生对某位教师在某门课程上的评分请求
///
/// `username` 只用于计算指纹，不会写入评分表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRequest {
    pub professor_id: String,
    pub course_code: String,
    pub username: String,
    pub scores: SubScores,
}

/// 评分汇总的查询条件
///
/// `Latest` 与各 `*Like` 子串匹配结果最多返回 100 组，精确匹配不限条数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreFilter {
    Latest,
    ProfessorId(String),
    ProfessorName(String),
    ProfessorNameLike(String),
    CourseCode(String),
    CourseCodeLike(String),
    CourseName(String),
    CourseNameLike(String),
}

impl ScoreFilter {
    /// 操作名，同时用作缓存键前缀
    pub fn operation(&self) -> &'static str {
        match self {
            ScoreFilter::Latest => "last_scores",
            ScoreFilter::ProfessorId(_) => "scores_by_professor_id",
            ScoreFilter::ProfessorName(_) => "scores_by_professor_name",
            ScoreFilter::ProfessorNameLike(_) => "scores_by_professor_name_like",
            ScoreFilter::CourseCode(_) => "scores_by_course_code",
            ScoreFilter::CourseCodeLike(_) => "scores_by_course_code_like",
            ScoreFilter::CourseName(_) => "scores_by_course_name",
            ScoreFilter::CourseNameLike(_) => "scores_by_course_name_like",
        }
    }

    /// 查询参数，`Latest` 没有参数
    pub fn argument(&self) -> &str {
        match self {
            ScoreFilter::Latest => "",
            ScoreFilter::ProfessorId(arg)
            | ScoreFilter::ProfessorName(arg)
            | ScoreFilter::ProfessorNameLike(arg)
            | ScoreFilter::CourseCode(arg)
            | ScoreFilter::CourseCodeLike(arg)
            | ScoreFilter::CourseName(arg)
            | ScoreFilter::CourseNameLike(arg) => arg,
        }
    }

    pub fn is_substring_match(&self) -> bool {
        matches!(
            self,
            ScoreFilter::ProfessorNameLike(_)
                | ScoreFilter::CourseCodeLike(_)
                | ScoreFilter::CourseNameLike(_)
        )
    }

    /// 结果是否限制为最近 100 组
    pub fn is_capped(&self) -> bool {
        matches!(self, ScoreFilter::Latest) || self.is_substring_match()
    }
}
