use serde::{Deserialize, Serialize};

use super::entities::SubScores;

/// 按 (课程, 教师) 分组的评分汇总
///
/// 只有关联、尚无评分的分组各项为 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAggregate {
    pub course_code: String,
    pub course_name: String,
    pub professor_id: String,
    pub professor_name: String,
    pub teaching: f64,
    pub coursework: f64,
    pub learning: f64,
    // 由三项均值再求平均，保留两位小数
    pub average: f64,
}

impl ScoreAggregate {
    pub fn scores(&self) -> SubScores {
        SubScores::new(self.teaching, self.coursework, self.learning)
    }
}
