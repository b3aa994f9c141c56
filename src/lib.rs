//! Roster Console - 学校名册管理控制台网关
//!
//! 基于 Actix Web，位于管理前端与机构后端之间，负责批量导入、暂存预览与成员关系对账。
//!
//! # 架构
//! - `backend`: 上游机构后端的带标签请求与 HTTP 传输
//! - `cache`: 按控制台会话暂存的导入与成员计划（Moka）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `import`: 表格解析、校验去重、预览暂存与 CSV 导出
//! - `middlewares`: 限流中间件
//! - `models`: 数据模型定义
//! - `reconcile`: 成员差异与提交执行
//! - `roster`: 目录快照与名册聚合
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `utils`: 工具函数

pub mod backend;
pub mod cache;
pub mod config;
pub mod errors;
pub mod import;
pub mod middlewares;
pub mod models;
pub mod reconcile;
pub mod roster;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod utils;
