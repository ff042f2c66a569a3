//! # 中线拟合
//!
//! 在主轴坐标系的 x-z 平面内用二次曲线 `z = a·x² + b·x + c` 拟合结构中线，
//! 并提供最近点与弧长计算。
//!
//! 二次项相对数据范围可以忽略时按直线处理，使近乎笔直的结构得到连续的弧长。
//!
//! ## 依赖关系
//! - 被 `align/mod.rs` 使用
//! - 无外部模块依赖

use crate::error::{AlignError, Result};

/// 二次项贡献与一次项之比低于该值时按直线处理
const LINEAR_TOL: f64 = 1e-9;

/// Newton 迭代最大次数
const MAX_NEWTON_STEPS: usize = 32;

/// 二次中线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Midline {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// 拟合数据的 x 尺度（max |x|）
    pub scale: f64,
}

impl Midline {
    /// 最小二乘拟合
    pub fn fit(xs: &[f64], zs: &[f64]) -> Result<Self> {
        if xs.len() != zs.len() || xs.len() < 3 {
            return Err(AlignError::TransformError(format!(
                "midline fit needs at least 3 paired samples, got {}",
                xs.len().min(zs.len())
            )));
        }

        // 正规方程各阶矩
        let mut s = [0.0f64; 5];
        let mut t = [0.0f64; 3];
        for (&x, &z) in xs.iter().zip(zs) {
            let mut xp = 1.0;
            for k in 0..5 {
                s[k] += xp;
                if k < 3 {
                    t[k] += xp * z;
                }
                xp *= x;
            }
        }

        let m = [
            [s[4], s[3], s[2]],
            [s[3], s[2], s[1]],
            [s[2], s[1], s[0]],
        ];
        let [a, b, c] = solve3(m, [t[2], t[1], t[0]]).ok_or_else(|| {
            AlignError::TransformError("midline fit is degenerate".to_string())
        })?;

        let scale = xs.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
        Ok(Midline { a, b, c, scale })
    }

    /// |a|·s² 相对 |b|·s + 1 可以忽略
    pub fn is_linear(&self) -> bool {
        self.a.abs() * self.scale * self.scale <= LINEAR_TOL * (self.b.abs() * self.scale + 1.0)
    }

    pub fn eval(&self, t: f64) -> f64 {
        (self.a * t + self.b) * t + self.c
    }

    pub fn slope(&self, t: f64) -> f64 {
        2.0 * self.a * t + self.b
    }

    /// 点 (x, z) 在中线上的最近点参数 t
    pub fn nearest(&self, x: f64, z: f64) -> f64 {
        let mut t = x;
        for _ in 0..MAX_NEWTON_STEPS {
            let f = self.eval(t);
            let df = self.slope(t);
            let g = (t - x) + (f - z) * df;
            let dg = 1.0 + df * df + (f - z) * 2.0 * self.a;
            if dg.abs() < f64::EPSILON {
                break;
            }
            let step = g / dg;
            t -= step;
            if !t.is_finite() {
                return x;
            }
            if step.abs() <= 1e-12 * (1.0 + t.abs()) {
                break;
            }
        }
        t
    }

    /// 从 t0 到 t1 的有向弧长
    pub fn arc_length(&self, t0: f64, t1: f64) -> f64 {
        self.primitive(t1) - self.primitive(t0)
    }

    /// ∫ sqrt(1 + f'(t)²) dt 的原函数
    fn primitive(&self, t: f64) -> f64 {
        if self.is_linear() {
            return (1.0 + self.b * self.b).sqrt() * t;
        }
        let u = self.slope(t);
        (u * (1.0 + u * u).sqrt() + u.asinh()) / (4.0 * self.a)
    }
}

/// 部分主元 Gauss 消元求解 3x3 线性方程组
fn solve3(mut m: [[f64; 3]; 3], mut rhs: [f64; 3]) -> Option<[f64; 3]> {
    let scale = m.iter().flatten().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return None;
    }

    for col in 0..3 {
        let pivot = (col..3).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot][col].abs() <= scale * 1e-12 {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..3 {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = [0.0; 3];
    for row in (0..3).rev() {
        let tail: f64 = (row + 1..3).map(|k| m[row][k] * x[k]).sum();
        x[row] = (rhs[row] - tail) / m[row][row];
    }
    Some(x)
}
