//! # 批次执行器
//!
//! 为每个批次创建独立的线程池并行执行，批次结束后释放线程池。
//!
//! ## 功能
//! - 每批一个 rayon 线程池，池大小不超过批次长度
//! - 阻塞等待批内所有文件完成
//! - 逐文件结果收集与汇总
//!
//! ## 依赖关系
//! - 被 `batch/driver.rs` 调用
//! - 使用 `rayon` 进行并行计算，`num_cpus` 确定默认并行度

use crate::error::Result;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 单个文件处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（已带对齐标记）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并单个处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 合并另一批次的统计
    pub fn absorb(&mut self, other: BatchResult) {
        self.success += other.success;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.failures.extend(other.failures);
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批次执行器
pub struct BatchRunner {
    /// 每批最大并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批次执行器（0 表示使用全部逻辑 CPU）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理一个批次
    ///
    /// 返回时批内每个文件都已有结果，线程池已释放。
    pub fn run_chunk<F>(&self, chunk: &[PathBuf], pb: &ProgressBar, processor: F) -> Result<BatchResult>
    where
        F: Fn(&Path) -> ProcessResult + Sync + Send,
    {
        let mut batch_result = BatchResult::default();
        if chunk.is_empty() {
            return Ok(batch_result);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.min(chunk.len()))
            .thread_name(|i| format!("cloudalign-worker-{}", i))
            .build()?;

        let results: Vec<ProcessResult> = pool.install(|| {
            chunk
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        drop(pool);

        for result in results {
            batch_result.merge(result);
        }

        Ok(batch_result)
    }
}
