//! # align 命令实现
//!
//! 批量对齐目录中的点云文件。
//!
//! ## 功能
//! - 合并配置文件与命令行参数
//! - 逐目录、逐批次并行对齐
//! - 打印每个目录的汇总表与失败详情
//!
//! ## 依赖关系
//! - 使用 `cli/align.rs` 定义的参数
//! - 使用 `batch/driver.rs` 执行
//! - 使用 `utils/output.rs` 输出

use crate::align::PrincipalAxisTransform;
use crate::batch::{RunDriver, RunSummary};
use crate::cli::align::AlignArgs;
use crate::config::RunConfig;
use crate::error::{AlignError, Result};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 失败详情最多显示条数
const MAX_LISTED_FAILURES: usize = 10;

/// 汇总表行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Directory")]
    directory: String,
    #[tabled(rename = "Files")]
    files: usize,
    #[tabled(rename = "Batches")]
    batches: usize,
    #[tabled(rename = "Aligned")]
    aligned: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
    #[tabled(rename = "Failed")]
    failed: String,
}

/// 执行 align 命令
pub fn execute(args: AlignArgs) -> Result<()> {
    output::print_header("Point-Cloud Alignment");

    let config = RunConfig::resolve(args.config.as_deref(), args.to_layer())?;

    output::print_info(&format!(
        "{} director(ies), batch size {}, pattern '{}', on error: {}",
        config.directories.len(),
        config.batch_size,
        config.pattern,
        config.error_policy
    ));

    let transform = PrincipalAxisTransform;
    let mut summary = RunSummary::default();
    let outcome = RunDriver::new(&config, &transform)
        .show_progress(!args.no_progress)
        .run(&mut summary);

    // 中止时同样打印已完成部分的汇总
    print_summary(&summary);
    outcome?;

    if summary.has_failures() {
        return Err(AlignError::RunFailed {
            failed: summary.failed(),
            unreadable: summary.unreadable(),
        });
    }

    output::print_success("All directories processed");
    Ok(())
}

fn summary_rows(summary: &RunSummary) -> Vec<SummaryRow> {
    summary
        .directories
        .iter()
        .map(|d| SummaryRow {
            directory: d.dir.display().to_string(),
            files: d.files,
            batches: d.chunks,
            aligned: d.result.success,
            skipped: d.result.skipped,
            failed: match &d.error {
                Some(_) => "unreadable".to_string(),
                None => d.result.failed.to_string(),
            },
        })
        .collect()
}

/// 打印汇总表与失败详情
fn print_summary(summary: &RunSummary) {
    output::print_separator();
    println!("{}", Table::new(summary_rows(summary)));

    let failures: Vec<_> = summary.failures().collect();
    if failures.is_empty() {
        return;
    }

    output::print_warning("Failed files:");
    for (path, err) in failures.iter().take(MAX_LISTED_FAILURES) {
        output::print_error(&format!("  {}: {}", path, err));
    }
    if failures.len() > MAX_LISTED_FAILURES {
        output::print_warning(&format!(
            "  ... and {} more",
            failures.len() - MAX_LISTED_FAILURES
        ));
    }
}
