//! # 批量处理模块
//!
//! 目录级批量对齐流水线。
//!
//! ## 功能
//! - 收集目录下的点云文件
//! - 固定大小分批
//! - 每批独立线程池并行处理
//! - 已对齐文件自动跳过
//! - 逐文件结果汇总与错误策略
//!
//! ## 依赖关系
//! - 被 `commands/align.rs` 和 `commands/status.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod chunker;
pub mod collector;
pub mod driver;
pub mod runner;
pub mod worker;

pub use collector::FileCollector;
pub use driver::{RunDriver, RunSummary};
