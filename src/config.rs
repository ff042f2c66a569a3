//! # 运行配置
//!
//! 对齐任务的显式配置：目标目录、批次大小、并行度、文件模式和错误策略。
//!
//! ## 配置来源（优先级从高到低）
//! 1. 命令行参数 / 环境变量
//! 2. `--config` 指定的 TOML 文件
//! 3. 内置默认值
//!
//! ## TOML 示例
//! ```toml
//! directories = ["output/youtoo", "output/wildtype"]
//! batch_size = 5
//! jobs = 8
//! pattern = "*.psi"
//! on_error = "continue"
//! ```
//!
//! ## 依赖关系
//! - 被 `cli/align.rs`、`commands/align.rs` 和 `batch/driver.rs` 使用
//! - 使用 `serde` + `toml` 解析配置文件

use crate::batch::chunker::DEFAULT_BATCH_SIZE;
use crate::error::{AlignError, Result};

use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// 默认文件匹配模式
pub const DEFAULT_PATTERN: &str = "*";

/// 文件失败时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop after the batch in which a file failed
    #[default]
    Abort,
    /// Report failures and keep going
    Continue,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Abort => write!(f, "abort"),
            ErrorPolicy::Continue => write!(f, "continue"),
        }
    }
}

/// 一层可选配置（配置文件或命令行）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub directories: Option<Vec<PathBuf>>,
    pub batch_size: Option<usize>,
    pub jobs: Option<usize>,
    pub pattern: Option<String>,
    pub on_error: Option<ErrorPolicy>,
}

impl ConfigLayer {
    /// 从 TOML 文件读取
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AlignError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| AlignError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// 用 `over` 中已设置的值覆盖自身
    pub fn overlay(self, over: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            directories: over.directories.or(self.directories),
            batch_size: over.batch_size.or(self.batch_size),
            jobs: over.jobs.or(self.jobs),
            pattern: over.pattern.or(self.pattern),
            on_error: over.on_error.or(self.on_error),
        }
    }
}

/// 已校验的运行配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// 依次处理的目标目录
    pub directories: Vec<PathBuf>,
    /// 每批文件数
    pub batch_size: NonZeroUsize,
    /// 每批并行上限，`None` 表示全部逻辑 CPU
    pub jobs: Option<usize>,
    /// 文件名匹配模式（逗号分隔）
    pub pattern: String,
    /// 错误策略
    pub error_policy: ErrorPolicy,
}

impl RunConfig {
    /// 使用默认参数处理给定目录
    pub fn new(directories: Vec<PathBuf>) -> Self {
        RunConfig {
            directories,
            batch_size: DEFAULT_BATCH_SIZE,
            jobs: None,
            pattern: DEFAULT_PATTERN.to_string(),
            error_policy: ErrorPolicy::default(),
        }
    }

    /// 合并后的配置层 -> 校验后的配置
    pub fn from_layer(layer: ConfigLayer) -> Result<Self> {
        let directories = layer.directories.unwrap_or_default();
        if directories.is_empty() {
            return Err(AlignError::InvalidArgument(
                "no target directories given".to_string(),
            ));
        }

        let batch_size = match layer.batch_size {
            Some(n) => NonZeroUsize::new(n).ok_or_else(|| {
                AlignError::InvalidArgument("batch size must be at least 1".to_string())
            })?,
            None => DEFAULT_BATCH_SIZE,
        };

        let mut config = RunConfig::new(directories)
            .with_batch_size(batch_size)
            .with_jobs(layer.jobs.unwrap_or(0))
            .with_error_policy(layer.on_error.unwrap_or_default());
        if let Some(pattern) = layer.pattern {
            config.pattern = pattern;
        }

        Ok(config)
    }

    /// 读取可选配置文件并叠加命令行层
    pub fn resolve(config_file: Option<&Path>, cli: ConfigLayer) -> Result<Self> {
        let base = match config_file {
            Some(path) => ConfigLayer::load(path)?,
            None => ConfigLayer::default(),
        };
        Self::from_layer(base.overlay(cli))
    }

    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs).filter(|&j| j > 0);
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new(vec![PathBuf::from("out")]);
        assert_eq!(config.batch_size.get(), 5);
        assert_eq!(config.jobs, None);
        assert_eq!(config.pattern, "*");
        assert_eq!(config.error_policy, ErrorPolicy::Abort);
    }

    #[test]
    fn test_parse_toml_layer() {
        let layer: ConfigLayer = toml::from_str(
            r#"
directories = ["a", "b"]
batch_size = 3
on_error = "continue"
"#,
        )
        .unwrap();

        let config = RunConfig::from_layer(layer).unwrap();
        assert_eq!(config.directories, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(config.batch_size.get(), 3);
        assert_eq!(config.error_policy, ErrorPolicy::Continue);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<ConfigLayer>("batchsize = 3").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "directories = [\"from_file\"]\nbatch_size = 8\njobs = 2\n").unwrap();

        let cli = ConfigLayer {
            batch_size: Some(4),
            ..ConfigLayer::default()
        };
        let config = RunConfig::resolve(Some(&path), cli).unwrap();

        assert_eq!(config.directories, vec![PathBuf::from("from_file")]);
        assert_eq!(config.batch_size.get(), 4);
        assert_eq!(config.jobs, Some(2));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "batch_size = \"five\"").unwrap();

        let err = RunConfig::resolve(Some(&path), ConfigLayer::default()).unwrap_err();
        assert!(matches!(err, AlignError::ConfigError { .. }));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let layer = ConfigLayer {
            directories: Some(vec![PathBuf::from("a")]),
            batch_size: Some(0),
            ..ConfigLayer::default()
        };
        assert!(RunConfig::from_layer(layer).is_err());
    }

    #[test]
    fn test_missing_directories_rejected() {
        assert!(RunConfig::from_layer(ConfigLayer::default()).is_err());
    }

    #[test]
    fn test_zero_jobs_means_auto() {
        let layer = ConfigLayer {
            directories: Some(vec![PathBuf::from("a")]),
            jobs: Some(0),
            ..ConfigLayer::default()
        };
        assert_eq!(RunConfig::from_layer(layer).unwrap().jobs, None);
    }
}
