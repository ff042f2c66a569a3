//! # 美化输出工具
//!
//! 提供统一的终端输出样式。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;
use std::path::Path;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// `<path> starting`
pub fn format_file_start(path: &Path) -> String {
    format!("{} starting", path.display())
}

/// `<path> complete <elapsed_seconds>`
pub fn format_file_complete(path: &Path, elapsed_secs: f64) -> String {
    format!("{} complete {:.3}", path.display(), elapsed_secs)
}

/// 目录处理结束信号
pub fn format_directory_complete(dir: &Path, files: usize) -> String {
    format!("Processing complete: {} file(s) in '{}'", files, dir.display())
}

/// 文件开始处理
pub fn print_file_start(path: &Path) {
    println!("{}", format_file_start(path));
}

/// 文件处理结束
pub fn print_file_complete(path: &Path, elapsed_secs: f64) {
    println!("{}", format_file_complete(path, elapsed_secs));
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_lines() {
        let path = Path::new("output/wt/embryo_01.psi");
        assert_eq!(format_file_start(path), "output/wt/embryo_01.psi starting");
        assert_eq!(
            format_file_complete(path, 1.23456),
            "output/wt/embryo_01.psi complete 1.235"
        );
    }

    #[test]
    fn test_directory_complete_line() {
        let line = format_directory_complete(Path::new("output/wt"), 7);
        assert!(line.starts_with("Processing complete"));
        assert_eq!(line, "Processing complete: 7 file(s) in 'output/wt'");
    }
}
