//! # status 命令实现
//!
//! 只读检查目录中每个点云文件的对齐状态。
//!
//! ## 依赖关系
//! - 使用 `cli/status.rs` 定义的参数
//! - 使用 `batch/collector.rs` 收集文件，`parsers/` 读取
//! - 使用 `rayon` 并行读取，`tabled` 输出表格

use crate::batch::FileCollector;
use crate::cli::status::StatusArgs;
use crate::error::Result;
use crate::parsers;
use crate::utils::{output, progress};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 单个文件的对齐状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    Aligned { points: usize },
    Pending { points: usize },
    Unreadable(String),
}

impl FileState {
    fn label(&self) -> &'static str {
        match self {
            FileState::Aligned { .. } => "aligned",
            FileState::Pending { .. } => "pending",
            FileState::Unreadable(_) => "unreadable",
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct StatusRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Points")]
    points: String,
    #[tabled(rename = "State")]
    state: String,
}

/// 检查单个文件
pub fn inspect(path: &Path) -> FileState {
    match parsers::read_table(path) {
        Ok(table) if table.is_transformed() => FileState::Aligned {
            points: table.n_rows(),
        },
        Ok(table) => FileState::Pending {
            points: table.n_rows(),
        },
        Err(e) => FileState::Unreadable(e.to_string()),
    }
}

/// 执行 status 命令
pub fn execute(args: StatusArgs) -> Result<()> {
    output::print_header("Alignment Status");

    for dir in &args.dirs {
        let files = FileCollector::new(dir)
            .with_pattern(&args.pattern)?
            .collect()?;

        output::print_info(&format!(
            "Directory: '{}' ({} files)",
            dir.display(),
            files.len()
        ));

        let pb = progress::create_progress_bar(files.len() as u64, "Reading");
        let states: Vec<(PathBuf, FileState)> = files
            .into_par_iter()
            .map(|path| {
                let state = inspect(&path);
                pb.inc(1);
                (path, state)
            })
            .collect();
        pb.finish_and_clear();

        let (aligned, pending, unreadable) = count_states(&states);
        let rows = status_rows(&states, args.pending_only);
        if !rows.is_empty() {
            println!("{}", Table::new(rows));
        }

        output::print_done(&format!(
            "{}: {} aligned, {} pending, {} unreadable",
            dir.display(),
            aligned,
            pending,
            unreadable
        ));
    }

    Ok(())
}

fn count_states(states: &[(PathBuf, FileState)]) -> (usize, usize, usize) {
    states
        .iter()
        .fold((0, 0, 0), |(a, p, u), (_, state)| match state {
            FileState::Aligned { .. } => (a + 1, p, u),
            FileState::Pending { .. } => (a, p + 1, u),
            FileState::Unreadable(_) => (a, p, u + 1),
        })
}

fn status_rows(states: &[(PathBuf, FileState)], pending_only: bool) -> Vec<StatusRow> {
    states
        .iter()
        .filter(|(_, state)| !pending_only || !matches!(state, FileState::Aligned { .. }))
        .map(|(path, state)| StatusRow {
            file: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            points: match state {
                FileState::Aligned { points } | FileState::Pending { points } => {
                    points.to_string()
                }
                FileState::Unreadable(_) => "-".to_string(),
            },
            state: match state {
                FileState::Unreadable(reason) => format!("{}: {}", state.label(), reason),
                _ => state.label().to_string(),
            },
        })
        .collect()
}
