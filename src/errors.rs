//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 错误在服务层边界上的归类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 调用方输入或请求本身有问题（4xx）
    Client,
    /// 资源不存在（404）
    NotFound,
    /// 后端或瞬时故障（5xx）
    Server,
}

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - class() 方法 - 返回边界归类
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_ratings_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $class:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum RatingsError {
            $($variant(String),)*
        }

        impl RatingsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(RatingsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(RatingsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误在服务层边界上的归类
            pub fn class(&self) -> ErrorClass {
                match self {
                    $(RatingsError::$variant(_) => ErrorClass::$class,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(RatingsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl RatingsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        RatingsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_ratings_errors! {
    Validation("E001", "Validation Error", Client),
    Conflict("E002", "Conflict", Client),
    AlreadyGraded("E003", "Already Graded", Client),
    NotFound("E004", "Resource Not Found", NotFound),
    Integrity("E005", "Integrity Error", Client),
    DatabaseConfig("E006", "Database Configuration Error", Server),
    DatabaseConnection("E007", "Database Connection Error", Server),
    DatabaseOperation("E008", "Database Operation Error", Server),
    CacheConnection("E009", "Cache Connection Error", Server),
    Serialization("E010", "Serialization Error", Server),
    Timeout("E011", "Deadline Exceeded", Server),
    Config("E012", "Configuration Error", Server),
}

impl RatingsError {
    /// 是否为后端/瞬时故障（调用方可自行决定是否重试）
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RatingsError::DatabaseConnection(_)
                | RatingsError::DatabaseOperation(_)
                | RatingsError::CacheConnection(_)
                | RatingsError::Timeout(_)
        )
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RatingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RatingsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for RatingsError {
    fn from(err: sea_orm::DbErr) -> Self {
        RatingsError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for RatingsError {
    fn from(err: serde_json::Error) -> Self {
        RatingsError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for RatingsError {
    fn from(err: config::ConfigError) -> Self {
        RatingsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RatingsError>;
