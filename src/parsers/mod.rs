//! # 解析器模块
//!
//! 提供点云表格文件的读写。
//!
//! ## 依赖关系
//! - 被 `batch/worker.rs` 和 `commands/status.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: psi, delimited

pub mod delimited;
pub mod psi;

use crate::error::{AlignError, Result};
use crate::models::PointTable;

use std::fs;
use std::path::{Path, PathBuf};

/// 支持的表格格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Psi,
    Csv,
}

impl TableFormat {
    /// 从文件扩展名推断格式（未知扩展名按 PSI 处理）
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => TableFormat::Csv,
            _ => TableFormat::Psi,
        }
    }
}

/// 从文件路径推断格式并读取
pub fn read_table(path: &Path) -> Result<PointTable> {
    match TableFormat::from_path(path) {
        TableFormat::Psi => psi::parse_psi_file(path),
        TableFormat::Csv => delimited::parse_csv_file(path),
    }
}

/// 覆盖写入表格
///
/// 先写入同目录下的隐藏临时文件，再重命名覆盖目标文件。
/// 符号链接写入其指向的文件，链接本身保留。格式按 `path` 的扩展名确定。
pub fn write_table(path: &Path, table: &PointTable) -> Result<()> {
    let target = resolve_target(path)?;
    let staging = staging_path(&target)?;

    let written = match TableFormat::from_path(path) {
        TableFormat::Psi => {
            fs::write(&staging, psi::to_psi_string(table)).map_err(|e| {
                AlignError::FileWriteError {
                    path: staging.display().to_string(),
                    source: e,
                }
            })
        }
        TableFormat::Csv => delimited::write_csv_file(table, &staging),
    };

    if let Err(e) = written {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    fs::rename(&staging, &target).map_err(|e| {
        let _ = fs::remove_file(&staging);
        AlignError::FileWriteError {
            path: target.display().to_string(),
            source: e,
        }
    })
}

/// 实际写入位置：符号链接解析到最终目标
fn resolve_target(path: &Path) -> Result<PathBuf> {
    if !path.is_symlink() {
        return Ok(path.to_path_buf());
    }
    fs::canonicalize(path).map_err(|e| AlignError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 临时文件路径: `dir/.name.partial`
fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AlignError::InvalidArgument(format!("not a file path: {}", path.display())))?;

    Ok(path.with_file_name(format!(".{}.partial", name)))
}
