//! # 坐标对齐模块
//!
//! 将原始 x/y/z 点云对齐到结构自身的主轴坐标系，并计算相对中线的坐标。
//!
//! ## 输出列
//! - `x`, `y`, `z`: 主轴坐标系下的坐标
//! - `ac`: 自质心对应的中线点起算的有向弧长（同时作为已对齐标记）
//! - `r`: 到中线的距离
//! - `theta`: 绕中线的方位角
//!
//! ## 依赖关系
//! - 被 `batch/worker.rs` 调用
//! - 使用 `models/table.rs`
//! - 子模块: pca, midline

pub mod midline;
pub mod pca;

pub use midline::Midline;
pub use pca::PrincipalFrame;

use crate::error::Result;
use crate::models::{PointTable, MARKER_COLUMN};

/// 坐标变换接口
///
/// 输入至少包含 x/y/z 列的表，返回带对齐坐标的新表。
pub trait CoordinateTransform: Send + Sync {
    fn transform_coordinates(&self, coords: &PointTable) -> Result<PointTable>;
}

/// 主轴对齐 + 二次中线坐标
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalAxisTransform;

impl CoordinateTransform for PrincipalAxisTransform {
    fn transform_coordinates(&self, coords: &PointTable) -> Result<PointTable> {
        let points = coords.points()?;
        let frame = PrincipalFrame::fit(&points)?;
        let aligned: Vec<[f64; 3]> = points.iter().map(|p| frame.apply(p)).collect();

        let xs: Vec<f64> = aligned.iter().map(|p| p[0]).collect();
        let zs: Vec<f64> = aligned.iter().map(|p| p[2]).collect();
        let midline = Midline::fit(&xs, &zs)?;

        let n = aligned.len();
        let mut ac = Vec::with_capacity(n);
        let mut r = Vec::with_capacity(n);
        let mut theta = Vec::with_capacity(n);

        for p in &aligned {
            let [x, y, z] = *p;
            let t = midline.nearest(x, z);
            let dz = z - midline.eval(t);
            let dx = x - t;

            ac.push(midline.arc_length(0.0, t));
            r.push((dx * dx + y * y + dz * dz).sqrt());
            theta.push(y.atan2(dz));
        }

        PointTable::from_points(&aligned)
            .with_column(MARKER_COLUMN, ac)?
            .with_column("r", r)?
            .with_column("theta", theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 沿斜向弯曲的管状点云
    fn curved_tube(offset: [f64; 3]) -> PointTable {
        let mut points = Vec::new();
        for i in -12..=12 {
            let s = i as f64 * 0.5;
            for k in 0..6 {
                let phi = k as f64 * std::f64::consts::PI / 3.0;
                let (dy, dz) = (0.4 * phi.cos(), 0.4 * phi.sin());
                let bend = 0.05 * s * s;
                points.push([
                    s * 0.8 + offset[0],
                    s * 0.6 + dy + offset[1],
                    bend + dz + offset[2],
                ]);
            }
        }
        PointTable::from_points(&points)
    }

    #[test]
    fn test_transform_adds_marker_and_keeps_rows() {
        let table = curved_tube([0.0; 3]);
        let aligned = PrincipalAxisTransform.transform_coordinates(&table).unwrap();

        assert_eq!(aligned.n_rows(), table.n_rows());
        assert!(aligned.is_transformed());
        assert_eq!(aligned.columns(), &["x", "y", "z", "ac", "r", "theta"]);
    }

    #[test]
    fn test_transform_is_centered_and_elongated_along_x() {
        let table = curved_tube([0.0; 3]);
        let aligned = PrincipalAxisTransform.transform_coordinates(&table).unwrap();

        let n = aligned.n_rows() as f64;
        for axis in ["x", "y", "z"] {
            let mean: f64 = aligned.column(axis).unwrap().iter().sum::<f64>() / n;
            assert!(mean.abs() < 1e-9, "{} mean = {}", axis, mean);
        }

        let spread = |axis: &str| {
            let col = aligned.column(axis).unwrap();
            col.iter().cloned().fold(f64::MIN, f64::max) - col.iter().cloned().fold(f64::MAX, f64::min)
        };
        assert!(spread("x") > spread("y"));
        assert!(spread("x") > spread("z"));
    }

    #[test]
    fn test_transform_is_translation_invariant() {
        let a = PrincipalAxisTransform
            .transform_coordinates(&curved_tube([0.0; 3]))
            .unwrap();
        let b = PrincipalAxisTransform
            .transform_coordinates(&curved_tube([100.0, -40.0, 7.5]))
            .unwrap();

        for name in ["x", "ac", "r"] {
            for (u, v) in a.column(name).unwrap().iter().zip(b.column(name).unwrap()) {
                assert!((u - v).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_transform_requires_coordinates() {
        let table = PointTable::from_columns(vec![
            ("x".to_string(), vec![1.0, 2.0, 3.0]),
            ("y".to_string(), vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();
        assert!(PrincipalAxisTransform.transform_coordinates(&table).is_err());
    }
}
