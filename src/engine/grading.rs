//! 重复评分检查

use tracing::debug;

use super::RatingEngine;
use crate::errors::{RatingsError, Result};
use crate::models::{Grade, GradeRequest};
use crate::utils::fingerprint;
use crate::utils::validate::require_non_empty;

impl RatingEngine {
    /// 指纹是否已有评分，不经过缓存
    pub async fn is_graded(&self, fingerprint: &str) -> Result<bool> {
        self.run(self.storage.is_graded(fingerprint)).await
    }

    /// 记录一次评分
    ///
    /// 同一 (用户, 课程, 教师) 只能评分一次，重复评分返回 `AlreadyGraded` 且不写入。
    /// 检查与写入之间没有锁，并发的同一评分可能都通过检查。
    pub async fn grade_course_professor(&self, req: GradeRequest) -> Result<Grade> {
        require_non_empty("username", &req.username)?;
        require_non_empty("professor_id", &req.professor_id)?;
        require_non_empty("course_code", &req.course_code)?;

        let fingerprint = fingerprint(&req.username, &req.course_code, &req.professor_id);

        self.run(async {
            if self.storage.is_graded(&fingerprint).await? {
                debug!("Fingerprint {} already graded", fingerprint);
                return Err(RatingsError::already_graded(format!(
                    "course {} / professor {} already graded by this user",
                    req.course_code, req.professor_id
                )));
            }

            self.storage
                .insert_grade(&fingerprint, &req.professor_id, &req.course_code, req.scores)
                .await
        })
        .await
    }
}
