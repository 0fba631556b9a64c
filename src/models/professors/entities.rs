use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    // 唯一 ID（UUID v4）
    pub id: String,
    // 教师姓名（唯一）
    pub name: String,
    // 创建时间
    pub inserted_at: chrono::DateTime<chrono::Utc>,
}
