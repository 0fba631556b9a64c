use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::{score::average, validate::validate_score};

/// 三个分项评分，每项取值 [0, 5]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub teaching: f64,
    pub coursework: f64,
    pub learning: f64,
}

impl SubScores {
    pub fn new(teaching: f64, coursework: f64, learning: f64) -> Self {
        Self {
            teaching,
            coursework,
            learning,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_score("teaching", self.teaching)?;
        validate_score("coursework", self.coursework)?;
        validate_score("learning", self.learning)
    }

    /// 三项平均分（两位小数）
    pub fn average(&self) -> f64 {
        average(&[self.teaching, self.coursework, self.learning])
    }
}

/// 一次已记录的评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    // 评分指纹，不含评分人身份
    pub fingerprint: String,
    pub professor_id: String,
    pub course_code: String,
    pub scores: SubScores,
    pub average: f64,
    pub inserted_at: chrono::DateTime<chrono::Utc>,
}
