//! # 运行驱动
//!
//! 依次处理每个目标目录：收集文件 → 分批 → 逐批并行对齐。
//!
//! ## 顺序保证
//! - 目录之间串行
//! - 批次之间串行，下一批在上一批线程池释放后才开始
//! - 批内文件并行，完成顺序不确定
//!
//! ## 错误策略
//! - `abort`: 某批出现失败文件时，报告该批全部结果后终止运行
//! - `continue`: 报告失败并继续，由调用方根据汇总决定退出码
//!
//! 两种策略下，已完成的目录和中止时的部分结果都保留在调用方的 `RunSummary` 中。
//!
//! ## 依赖关系
//! - 被 `commands/align.rs` 调用
//! - 使用 `batch/` 下的 collector, chunker, runner, worker
//! - 使用 `config.rs` 的 RunConfig

use super::chunker::Batcher;
use super::collector::FileCollector;
use super::runner::{BatchResult, BatchRunner};
use super::worker;
use crate::align::CoordinateTransform;
use crate::config::{ErrorPolicy, RunConfig};
use crate::error::{AlignError, Result};
use crate::utils::{output, progress};

use std::path::{Path, PathBuf};

/// 单个目录的处理报告
#[derive(Debug, Clone, Default)]
pub struct DirectoryReport {
    pub dir: PathBuf,
    /// 发现的文件数
    pub files: usize,
    /// 批次数
    pub chunks: usize,
    pub result: BatchResult,
    /// 目录无法读取时的错误信息
    pub error: Option<String>,
    /// 是否已发出 "Processing complete" 信号
    pub completed: bool,
}

/// 整次运行的汇总
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub directories: Vec<DirectoryReport>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.directories.iter().map(|d| d.result.failed).sum()
    }

    pub fn unreadable(&self) -> usize {
        self.directories.iter().filter(|d| d.error.is_some()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || self.unreadable() > 0
    }

    /// 所有目录的失败详情
    pub fn failures(&self) -> impl Iterator<Item = &(String, String)> {
        self.directories.iter().flat_map(|d| d.result.failures.iter())
    }
}

/// 运行驱动
pub struct RunDriver<'a> {
    config: &'a RunConfig,
    transform: &'a dyn CoordinateTransform,
    show_progress: bool,
}

impl<'a> RunDriver<'a> {
    pub fn new(config: &'a RunConfig, transform: &'a dyn CoordinateTransform) -> Self {
        RunDriver {
            config,
            transform,
            show_progress: false,
        }
    }

    /// 是否显示进度条
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// 处理全部目录，结果逐目录追加到 `summary`
    ///
    /// 返回错误时 `summary` 仍包含中止前的全部结果。
    pub fn run(&self, summary: &mut RunSummary) -> Result<()> {
        let runner = BatchRunner::new(self.config.jobs.unwrap_or(0));
        let batcher = Batcher::new(self.config.batch_size);

        for dir in &self.config.directories {
            let mut report = DirectoryReport {
                dir: dir.clone(),
                ..DirectoryReport::default()
            };

            match self.run_directory(dir, &runner, &batcher, &mut report) {
                Ok(()) => summary.directories.push(report),
                Err(e @ AlignError::ChunkFailed { .. }) => {
                    summary.directories.push(report);
                    return Err(e);
                }
                Err(e) => {
                    report.error = Some(e.to_string());
                    summary.directories.push(report);
                    if self.config.error_policy == ErrorPolicy::Abort {
                        return Err(e);
                    }
                    output::print_error(&format!("{}: {}", dir.display(), e));
                }
            }
        }

        Ok(())
    }

    fn run_directory(
        &self,
        dir: &Path,
        runner: &BatchRunner,
        batcher: &Batcher,
        report: &mut DirectoryReport,
    ) -> Result<()> {
        output::print_info(&format!("Directory: '{}'", dir.display()));

        let files = FileCollector::new(dir)
            .with_pattern(&self.config.pattern)?
            .collect()?;
        let chunks = batcher.chunk_count(files.len());

        output::print_info(&format!(
            "Found {} file(s) in {} batch(es) of up to {}, {} worker(s) per batch",
            files.len(),
            chunks,
            batcher.size(),
            runner.jobs()
        ));

        report.files = files.len();
        report.chunks = chunks;

        let pb = progress::progress_bar_or_hidden(self.show_progress, files.len() as u64, "Aligning");

        for (index, chunk) in batcher.split(&files).enumerate() {
            let result = runner.run_chunk(chunk, &pb, |path| {
                worker::run_job(path, self.transform, &pb)
            })?;
            let failed = result.failed;
            report.result.absorb(result);

            if failed > 0 && self.config.error_policy == ErrorPolicy::Abort {
                pb.finish_and_clear();
                return Err(AlignError::ChunkFailed {
                    dir: dir.display().to_string(),
                    chunk: index + 1,
                    failed,
                });
            }
        }

        pb.finish_and_clear();
        output::print_done(&output::format_directory_complete(dir, report.result.total()));
        report.completed = true;

        Ok(())
    }
}
