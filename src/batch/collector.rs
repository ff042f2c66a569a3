//! # 文件收集器
//!
//! 列出目标目录下待处理的点云文件。
//!
//! ## 功能
//! - 只列出目录第一层的普通文件（指向普通文件的符号链接同样列出）
//! - 忽略隐藏文件（包括写入中的临时文件）
//! - glob 模式过滤（逗号分隔的多模式）
//! - 按路径排序，保证每次运行顺序一致
//!
//! ## 依赖关系
//! - 被 `batch/driver.rs` 和 `commands/status.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{AlignError, Result};

use std::path::PathBuf;
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 目标目录
    dir: PathBuf,
    /// 匹配模式列表
    patterns: Vec<glob::Pattern>,
}

impl FileCollector {
    /// 创建新的文件收集器（默认匹配所有文件）
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            patterns: Vec::new(),
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "*")
            .map(|s| {
                glob::Pattern::new(s).map_err(|e| {
                    AlignError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Err(AlignError::DirectoryNotFound {
                path: self.dir.display().to_string(),
            });
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| AlignError::DirectoryReadError {
                path: self.dir.display().to_string(),
                source: e.into(),
            })?;

            // 符号链接按目标类型判断，悬空链接与子目录被忽略
            if !entry.path().is_file() {
                continue;
            }

            let name = match entry.file_name().to_str() {
                Some(name) => name,
                None => continue,
            };

            if name.starts_with('.') || !self.matches_patterns(name) {
                continue;
            }

            files.push(entry.into_path());
        }

        files.sort();
        Ok(files)
    }

    /// 检查文件名是否匹配任一模式
    fn matches_patterns(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_collect_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.psi");
        touch(dir.path(), "a.psi");
        touch(dir.path(), ".a.psi.partial");
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "c.psi");

        let files = FileCollector::new(dir.path()).collect().unwrap();
        assert_eq!(names(&files), vec!["a.psi", "b.psi"]);
        assert!(files.iter().all(|p| p.starts_with(dir.path())));
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_includes_symlinked_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.psi");
        touch(store.path(), "real.psi");
        std::os::unix::fs::symlink(store.path().join("real.psi"), dir.path().join("b.psi")).unwrap();
        std::os::unix::fs::symlink(store.path().join("gone.psi"), dir.path().join("c.psi")).unwrap();
        std::os::unix::fs::symlink(store.path(), dir.path().join("linked_dir")).unwrap();

        let files = FileCollector::new(dir.path()).collect().unwrap();
        assert_eq!(names(&files), vec!["a.psi", "b.psi"]);
    }

    #[test]
    fn test_collect_with_patterns() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["e1.psi", "e2.csv", "notes.txt"] {
            touch(dir.path(), name);
        }

        let files = FileCollector::new(dir.path())
            .with_pattern("*.psi, *.csv")
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(names(&files), vec!["e1.psi", "e2.csv"]);
    }

    #[test]
    fn test_collect_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileCollector::new(dir.path()).collect().unwrap().is_empty());
    }

    #[test]
    fn test_collect_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCollector::new(dir.path().join("missing"))
            .collect()
            .unwrap_err();
        assert!(matches!(err, AlignError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FileCollector::new(".").with_pattern("[").is_err());
    }
}
