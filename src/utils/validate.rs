use crate::errors::{RatingsError, Result};

/// 分项评分下限
pub const MIN_SCORE: f64 = 0.0;
/// 分项评分上限
pub const MAX_SCORE: f64 = 5.0;

/// 校验必填字段非空（忽略首尾空白）
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RatingsError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// 校验分项评分在 [0, 5] 闭区间内
pub fn validate_score(field: &str, value: f64) -> Result<()> {
    // NaN 不满足任何比较，会在这里被拒绝
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(RatingsError::validation(format!(
            "{field} must be between {MIN_SCORE} and {MAX_SCORE}, got {value}"
        )));
    }
    Ok(())
}

/// 校验批量输入长度一致
pub fn require_same_length(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(RatingsError::validation(format!(
            "bulk inputs must have the same length ({left} != {right})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert!(require_non_empty("code", "S209").is_ok());
        assert!(require_non_empty("code", "").is_err());
        assert!(require_non_empty("name", "   ").is_err());
    }

    #[test]
    fn test_score_range() {
        assert!(validate_score("teaching", 0.0).is_ok());
        assert!(validate_score("teaching", 5.0).is_ok());
        assert!(validate_score("teaching", 2.5).is_ok());
        assert!(validate_score("teaching", -0.1).is_err());
        assert!(validate_score("teaching", 5.01).is_err());
        assert!(validate_score("teaching", f64::NAN).is_err());
    }

    #[test]
    fn test_same_length() {
        assert!(require_same_length(2, 2).is_ok());
        let err = require_same_length(2, 3).expect_err("mismatch");
        assert_eq!(err.code(), "E001");
    }
}
