//! 评分聚合

/// 结果保留的小数位数
const PRECISION: f64 = 100.0;

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION
}

/// 求若干分项的算术平均值，保留两位小数
///
/// 调用方总是传入三个分项（教学、作业、收获），空切片不属于合法调用。
pub fn average(scores: &[f64]) -> f64 {
    debug_assert!(!scores.is_empty(), "average of an empty score set");
    if scores.is_empty() {
        return 0.0;
    }
    round2(scores.iter().sum::<f64>() / scores.len() as f64)
}
