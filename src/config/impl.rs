use config::{Config, ConfigError, Environment, File};

use super::AppConfig;
use super::structs::Environment as RunEnvironment;

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 默认值，保证空环境也能启动
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("database.url", "ratings.db")?
            .set_default("database.pool_size", 5)?
            .set_default("database.timeout", 10)?
            .set_default("database.operation_timeout", 0)?
            .set_default("cache.backend", "none")?
            .set_default("cache.default_ttl", 300)?
            .set_default("cache.redis.url", "")?
            .set_default("cache.redis.key_prefix", "ratings:")?
            .set_default("cache.memory.max_capacity", 10_000)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("RATINGS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("LOG_LEVEL").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("cache.default_ttl", std::env::var("CACHE_TTL").ok())?;

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验反序列化无法表达的取值约束
    pub fn validate(&self) -> Result<(), ConfigError> {
        // TTL 为 0 时 Redis 拒绝 SET EX，Moka 条目立即过期
        if self.cache.default_ttl == 0 {
            return Err(ConfigError::Message(
                "cache.default_ttl must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == RunEnvironment::Production
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == RunEnvironment::Development
    }

    /// 单次操作截止时间，未配置时为 None
    pub fn operation_timeout(&self) -> Option<std::time::Duration> {
        match self.database.operation_timeout {
            0 => None,
            ms => Some(std::time::Duration::from_millis(ms)),
        }
    }
}
