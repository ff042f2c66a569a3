//! # 分批器
//!
//! 将文件序列按固定大小切分为有序批次，最后一批可能不足。
//!
//! ## 依赖关系
//! - 被 `batch/driver.rs` 使用
//! - 无外部模块依赖

use std::num::NonZeroUsize;
use std::path::PathBuf;

/// 默认批次大小
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// 固定大小分批器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batcher {
    size: NonZeroUsize,
}

impl Batcher {
    pub fn new(size: NonZeroUsize) -> Self {
        Batcher { size }
    }

    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// 惰性切分，保持原有顺序
    pub fn split<'a>(&self, files: &'a [PathBuf]) -> std::slice::Chunks<'a, PathBuf> {
        files.chunks(self.size.get())
    }

    /// `n` 个文件产生的批次数，即 ceil(n / size)
    pub fn chunk_count(&self, n: usize) -> usize {
        n.div_ceil(self.size.get())
    }
}
