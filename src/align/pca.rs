//! # 主轴坐标系
//!
//! 以质心为原点、协方差矩阵特征向量为坐标轴，建立点云的主轴坐标系。
//!
//! ## 功能
//! - 质心与协方差计算
//! - 3x3 对称矩阵 Jacobi 特征分解
//! - 右手系主轴（按方差从大到小排列）
//!
//! ## 依赖关系
//! - 被 `align/mod.rs` 使用
//! - 无外部模块依赖

use crate::error::{AlignError, Result};

/// Jacobi 迭代最大轮数
const MAX_SWEEPS: usize = 64;

type Mat3 = [[f64; 3]; 3];

/// 主轴坐标系
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalFrame {
    /// 质心
    pub centroid: [f64; 3],
    /// 主轴（行向量），按方差从大到小
    pub axes: Mat3,
    /// 各主轴方向上的方差
    pub variances: [f64; 3],
}

impl PrincipalFrame {
    /// 由点集拟合主轴坐标系
    pub fn fit(points: &[[f64; 3]]) -> Result<Self> {
        if points.len() < 3 {
            return Err(AlignError::TransformError(format!(
                "need at least 3 points, got {}",
                points.len()
            )));
        }

        let centroid = centroid(points);
        let cov = covariance(points, &centroid);
        let (values, vectors) = symmetric_eigen(cov);

        let mut order = [0usize, 1, 2];
        order.sort_by(|&i, &j| values[j].total_cmp(&values[i]));

        let mut axes = [[0.0; 3]; 3];
        for (row, &col) in order.iter().take(2).enumerate() {
            let mut axis = [vectors[0][col], vectors[1][col], vectors[2][col]];
            canonical_sign(&mut axis);
            axes[row] = axis;
        }
        axes[2] = cross(&axes[0], &axes[1]);

        let variances = [values[order[0]], values[order[1]], values[order[2]]];
        if variances[0] <= f64::EPSILON {
            return Err(AlignError::TransformError(
                "point cloud has no spatial extent".to_string(),
            ));
        }

        Ok(PrincipalFrame {
            centroid,
            axes,
            variances,
        })
    }

    /// 将点变换到主轴坐标系
    pub fn apply(&self, p: &[f64; 3]) -> [f64; 3] {
        let d = [
            p[0] - self.centroid[0],
            p[1] - self.centroid[1],
            p[2] - self.centroid[2],
        ];
        [
            dot(&self.axes[0], &d),
            dot(&self.axes[1], &d),
            dot(&self.axes[2], &d),
        ]
    }
}

pub fn centroid(points: &[[f64; 3]]) -> [f64; 3] {
    let n = points.len() as f64;
    let mut c = [0.0; 3];
    for p in points {
        for k in 0..3 {
            c[k] += p[k];
        }
    }
    c.map(|v| v / n)
}

/// 样本协方差矩阵（除以 n）
pub fn covariance(points: &[[f64; 3]], centroid: &[f64; 3]) -> Mat3 {
    let n = points.len() as f64;
    let mut m = [[0.0; 3]; 3];
    for p in points {
        let d = [p[0] - centroid[0], p[1] - centroid[1], p[2] - centroid[2]];
        for i in 0..3 {
            for j in i..3 {
                m[i][j] += d[i] * d[j];
            }
        }
    }
    for i in 0..3 {
        for j in i..3 {
            m[i][j] /= n;
            m[j][i] = m[i][j];
        }
    }
    m
}

/// 对称矩阵的 Jacobi 特征分解
///
/// 返回 (特征值, 特征向量矩阵)，第 k 列为第 k 个特征值对应的特征向量。
pub fn symmetric_eigen(m: Mat3) -> ([f64; 3], Mat3) {
    let mut a = m;
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    let scale: f64 = a.iter().flatten().map(|x| x * x).sum::<f64>().max(f64::MIN_POSITIVE);

    for _ in 0..MAX_SWEEPS {
        let off = a[0][1].powi(2) + a[0][2].powi(2) + a[1][2].powi(2);
        if off <= scale * 1e-30 {
            break;
        }

        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            if a[p][q] == 0.0 {
                continue;
            }

            let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            for k in 0..3 {
                let (akp, akq) = (a[k][p], a[k][q]);
                a[k][p] = c * akp - s * akq;
                a[k][q] = s * akp + c * akq;
            }
            for k in 0..3 {
                let (apk, aqk) = (a[p][k], a[q][k]);
                a[p][k] = c * apk - s * aqk;
                a[q][k] = s * apk + c * aqk;
            }
            for k in 0..3 {
                let (vkp, vkq) = (v[k][p], v[k][q]);
                v[k][p] = c * vkp - s * vkq;
                v[k][q] = s * vkp + c * vkq;
            }
        }
    }

    ([a[0][0], a[1][1], a[2][2]], v)
}

/// 使绝对值最大的分量为正，保证结果唯一
fn canonical_sign(v: &mut [f64; 3]) {
    let dominant = v
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);
    if dominant < 0.0 {
        for x in v.iter_mut() {
            *x = -*x;
        }
    }
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
