/// LIKE 子句使用的转义字符，查询中需配合 `ESCAPE '\'`
pub const LIKE_ESCAPE: char = '\\';

/// 转义 LIKE 模式中的通配符，使用户输入按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// 构造子串匹配模式 `%input%`
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like_pattern(input))
}
