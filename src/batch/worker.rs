//! # 单文件对齐任务
//!
//! 读取一个点云文件，若尚未对齐则执行坐标变换并原地覆盖写回。
//!
//! ## 流程
//! 1. 读取表格
//! 2. 存在 `ac` 列则跳过（幂等）
//! 3. 选取 x/y/z 列并执行坐标变换
//! 4. 覆盖写回原路径
//!
//! ## 依赖关系
//! - 被 `batch/driver.rs` 调用
//! - 使用 `parsers/` 读写，`align/` 变换
//! - 使用 `utils/output.rs` 打印逐文件进度

use crate::align::CoordinateTransform;
use crate::batch::runner::ProcessResult;
use crate::error::Result;
use crate::models::COORDINATE_COLUMNS;
use crate::parsers;
use crate::utils::output;

use indicatif::ProgressBar;
use std::path::Path;
use std::time::Instant;

/// 单文件处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// 已对齐并写回
    Transformed { points: usize },
    /// 已带标记列，未做任何修改
    AlreadyAligned,
}

/// 对齐单个文件
pub fn transform_file(path: &Path, transform: &dyn CoordinateTransform) -> Result<FileStatus> {
    let table = parsers::read_table(path)?;

    if table.is_transformed() {
        return Ok(FileStatus::AlreadyAligned);
    }

    let coords = table.select(&COORDINATE_COLUMNS)?;
    let aligned = transform.transform_coordinates(&coords)?;

    parsers::write_table(path, &aligned)?;

    Ok(FileStatus::Transformed {
        points: aligned.n_rows(),
    })
}

/// 在线程池中执行的单文件任务，负责计时和逐文件输出
pub fn run_job(path: &Path, transform: &dyn CoordinateTransform, pb: &ProgressBar) -> ProcessResult {
    pb.suspend(|| output::print_file_start(path));
    let tic = Instant::now();

    let result = transform_file(path, transform);
    let elapsed = tic.elapsed().as_secs_f64();

    match result {
        Ok(status) => {
            pb.suspend(|| output::print_file_complete(path, elapsed));
            match status {
                FileStatus::Transformed { points } => ProcessResult::Success(format!(
                    "{}: aligned {} points",
                    path.display(),
                    points
                )),
                FileStatus::AlreadyAligned => {
                    ProcessResult::Skipped(format!("{}: already aligned", path.display()))
                }
            }
        }
        Err(e) => {
            pb.suspend(|| output::print_error(&format!("{}: {}", path.display(), e)));
            ProcessResult::Failed(path.display().to_string(), e.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::align::PrincipalAxisTransform;
    use crate::error::AlignError;
    use crate::models::PointTable;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录调用次数的变换，输出时在原坐标后追加 `ac` 列
    #[derive(Default)]
    pub(crate) struct CountingTransform {
        pub calls: AtomicUsize,
    }

    impl CoordinateTransform for CountingTransform {
        fn transform_coordinates(&self, coords: &PointTable) -> Result<PointTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut columns = Vec::new();
            for name in coords.columns() {
                columns.push((name.clone(), coords.require(name)?.to_vec()));
            }
            columns.push(("ac".to_string(), vec![0.0; coords.n_rows()]));
            PointTable::from_columns(columns)
        }
    }

    pub(crate) fn raw_cloud() -> PointTable {
        let points: Vec<[f64; 3]> = (0..12)
            .map(|i| {
                let t = i as f64;
                [t, 0.3 * (t * 0.7).sin(), 0.02 * t * t]
            })
            .collect();
        PointTable::from_points(&points)
    }

    pub(crate) fn write_raw(path: &Path) {
        parsers::write_table(path, &raw_cloud()).unwrap();
    }

    #[test]
    fn test_transform_file_adds_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fish_01.psi");
        write_raw(&path);

        let status = transform_file(&path, &PrincipalAxisTransform).unwrap();
        assert_eq!(status, FileStatus::Transformed { points: 12 });
        assert!(parsers::read_table(&path).unwrap().is_transformed());
    }

    #[test]
    fn test_marked_file_is_skipped_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fish_02.psi");
        let marked = PointTable::from_columns(vec![
            ("x".to_string(), vec![1.0, 2.0, 3.0]),
            ("y".to_string(), vec![0.0, 1.0, 0.0]),
            ("z".to_string(), vec![5.0, 5.0, 5.0]),
            ("ac".to_string(), vec![0.1, 0.2, 0.3]),
        ])
        .unwrap();
        parsers::write_table(&path, &marked).unwrap();
        let before = fs::read(&path).unwrap();
        let mtime = fs::metadata(&path).unwrap().modified().unwrap();

        let counting = CountingTransform::default();
        let status = transform_file(&path, &counting).unwrap();

        assert_eq!(status, FileStatus::AlreadyAligned);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), mtime);
    }

    #[test]
    fn test_second_run_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fish_03.csv");
        write_raw(&path);

        transform_file(&path, &PrincipalAxisTransform).unwrap();
        let first = fs::read(&path).unwrap();

        let status = transform_file(&path, &PrincipalAxisTransform).unwrap();
        assert_eq!(status, FileStatus::AlreadyAligned);
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_missing_coordinates_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.csv");
        fs::write(&path, "x,y\n1,2\n3,4\n").unwrap();

        let err = transform_file(&path, &PrincipalAxisTransform).unwrap_err();
        assert!(matches!(err, AlignError::MissingColumn { column } if column == "z"));
    }

    #[test]
    fn test_run_job_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.psi");
        fs::write(&path, "not a table").unwrap();

        let result = run_job(&path, &PrincipalAxisTransform, &ProgressBar::hidden());
        assert!(matches!(result, ProcessResult::Failed(p, _) if p == path.display().to_string()));
    }

    #[test]
    fn test_run_job_reports_skip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.csv");
        fs::write(&path, "x,y,z,ac\n1,2,3,0\n").unwrap();

        let result = run_job(&path, &PrincipalAxisTransform, &ProgressBar::hidden());
        assert!(matches!(result, ProcessResult::Skipped(_)));
    }
}
