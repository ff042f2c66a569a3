//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `align`: 批量对齐目录中的点云文件
//! - `status`: 只读检查文件是否已对齐
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: align, status

pub mod align;
pub mod status;

use clap::{Parser, Subcommand};

/// cloudalign - 生物结构点云批量对齐工具
#[derive(Parser)]
#[command(name = "cloudalign")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch alignment of biological point-cloud tables", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Align every point-cloud file in one or more directories, in place
    Align(align::AlignArgs),

    /// Report which files are already aligned, without modifying anything
    Status(status::StatusArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorPolicy;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_align() {
        let cli = Cli::try_parse_from([
            "cloudalign",
            "align",
            "out/a",
            "out/b",
            "--batch-size",
            "3",
            "--on-error",
            "continue",
        ])
        .unwrap();

        match cli.command {
            Commands::Align(args) => {
                assert_eq!(args.dirs.len(), 2);
                assert_eq!(args.batch_size, Some(3));
                assert_eq!(args.on_error, Some(ErrorPolicy::Continue));
            }
            _ => panic!("expected align"),
        }
    }

    #[test]
    fn test_parse_status_requires_directory() {
        assert!(Cli::try_parse_from(["cloudalign", "status"]).is_err());
    }
}
