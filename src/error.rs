//! # 统一错误处理模块
//!
//! 定义 cloudalign 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// cloudalign 统一错误类型
#[derive(Error, Debug)]
pub enum AlignError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to list directory: {path}")]
    DirectoryReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    // ─────────────────────────────────────────────────────────────
    // 坐标变换错误
    // ─────────────────────────────────────────────────────────────
    #[error("Alignment failed: {0}")]
    TransformError(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 配置与参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid config file: {path}\nReason: {reason}")]
    ConfigError { path: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 执行错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to build worker pool: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    #[error("Batch {chunk} in '{dir}' had {failed} failed file(s); run aborted")]
    ChunkFailed {
        dir: String,
        chunk: usize,
        failed: usize,
    },

    #[error("Run finished with {failed} failed file(s) and {unreadable} unreadable director(ies)")]
    RunFailed { failed: usize, unreadable: usize },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, AlignError>;
