//! # cloudalign - 生物结构点云批量对齐工具
//!
//! 将目录中的点云文件逐批并行对齐到结构自身的主轴坐标系，并原地写回。
//!
//! ## 子命令
//! - `align`  - 批量对齐（已对齐文件自动跳过）
//! - `status` - 查看各文件对齐状态（只读）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── config.rs   (运行配置)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (收集、分批、线程池、单文件任务)
//!   │     ├── align/     (坐标变换)
//!   │     ├── parsers/   (PSI / CSV 读写)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod align;
mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
