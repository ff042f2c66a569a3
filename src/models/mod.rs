//! # 数据模型模块
//!
//! 定义点云表格数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`align/` 和 `batch/` 使用
//! - 子模块: table

pub mod table;

pub use table::{PointTable, COORDINATE_COLUMNS, MARKER_COLUMN};
