//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `batch/`, `align/`, `utils/`
//! - 子模块: align, status

pub mod align;
pub mod status;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Align(args) => align::execute(args),
        Commands::Status(args) => status::execute(args),
    }
}
