//! 课程评分服务的存储与缓存引擎
//!
//! 基于 SeaORM 与 Moka/Redis 构建，负责课程、教师与评分的持久化。
//!
//! # 架构
//! - `cache`: 读穿透缓存（Moka/Redis）
//! - `config`: 配置管理
//! - `engine`: 对外入口，组合存储与缓存
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod engine;
pub mod entity;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod storage;
pub mod utils;

pub use engine::RatingEngine;
pub use errors::{RatingsError, Result};
pub use utils::with_deadline;
