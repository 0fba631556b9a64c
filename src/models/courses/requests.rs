use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::validate::require_non_empty;

/// 新建课程请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
}

impl CreateCourseRequest {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty("course code", &self.code)?;
        require_non_empty("course name", &self.name)
    }
}
