//! # status 子命令 CLI 定义
//!
//! 检查目录中的点云文件是否已对齐，不修改任何文件。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/status.rs`

use crate::config::DEFAULT_PATTERN;

use clap::Args;
use std::path::PathBuf;

/// status 子命令参数
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directories to inspect
    #[arg(required = true)]
    pub dirs: Vec<PathBuf>,

    /// Glob pattern for input files, comma separated
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Only list files that still need alignment or cannot be read
    #[arg(long, default_value_t = false)]
    pub pending_only: bool,
}
