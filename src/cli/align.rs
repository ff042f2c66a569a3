//! # align 子命令 CLI 定义
//!
//! 批量对齐目录中的点云文件（原地覆盖）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/align.rs`
//! - 转换为 `config.rs` 的配置层

use crate::config::{ConfigLayer, ErrorPolicy};

use clap::Args;
use std::path::PathBuf;

/// align 子命令参数
#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Directories to process, one after another (may come from --config instead)
    pub dirs: Vec<PathBuf>,

    /// Files per batch; each batch gets its own worker pool [default: 5]
    #[arg(short, long, env = "CLOUDALIGN_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Worker threads per batch (0 = auto)
    #[arg(short, long, env = "CLOUDALIGN_JOBS")]
    pub jobs: Option<usize>,

    /// Glob pattern for input files, comma separated (e.g., "*.psi,*.csv") [default: *]
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// What to do when a file fails [default: abort]
    #[arg(long, value_enum)]
    pub on_error: Option<ErrorPolicy>,

    /// TOML config file; command-line values take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl AlignArgs {
    /// 命令行层配置（未给出的项留空，交由配置文件或默认值）
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            directories: (!self.dirs.is_empty()).then(|| self.dirs.clone()),
            batch_size: self.batch_size,
            jobs: self.jobs,
            pattern: self.pattern.clone(),
            on_error: self.on_error,
        }
    }
}
