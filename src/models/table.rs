//! # 点云表格数据模型
//!
//! 以具名列存储一个点云文件的全部内容。列按声明顺序保存，所有列长度一致。
//!
//! ## 约定
//! - 至少包含 `x`, `y`, `z` 三列坐标
//! - `ac` 列的存在表示该文件已完成对齐（幂等标记）
//!
//! ## 依赖关系
//! - 被 `parsers/`、`align/` 和 `batch/worker.rs` 使用
//! - 无外部模块依赖

use crate::error::{AlignError, Result};

/// 幂等标记列名
pub const MARKER_COLUMN: &str = "ac";

/// 坐标列名
pub const COORDINATE_COLUMNS: [&str; 3] = ["x", "y", "z"];

/// 具名列表格（列优先存储）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointTable {
    /// 列名，按文件中的顺序
    columns: Vec<String>,
    /// 列数据，与 `columns` 一一对应
    data: Vec<Vec<f64>>,
}

impl PointTable {
    /// 创建只有列名的空表，列名不可重复
    pub fn new(columns: Vec<String>) -> Result<Self> {
        columns
            .into_iter()
            .try_fold(PointTable::default(), |table, name| {
                table.with_column(&name, Vec::new())
            })
    }

    /// 从 (列名, 数据) 列表创建
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        columns
            .into_iter()
            .try_fold(PointTable::default(), |table, (name, values)| {
                table.with_column(&name, values)
            })
    }

    /// 从坐标点创建 x/y/z 三列表
    pub fn from_points(points: &[[f64; 3]]) -> Self {
        let mut data = vec![Vec::with_capacity(points.len()); 3];
        for p in points {
            for (axis, value) in p.iter().enumerate() {
                data[axis].push(*value);
            }
        }

        PointTable {
            columns: COORDINATE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            data,
        }
    }

    /// 追加一列
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Result<Self> {
        if self.has_column(name) {
            return Err(AlignError::InvalidArgument(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            return Err(AlignError::InvalidArgument(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.n_rows()
            )));
        }
        self.columns.push(name.to_string());
        self.data.push(values);
        Ok(self)
    }

    /// 追加一行
    pub fn push_row(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(AlignError::InvalidArgument(format!(
                "row has {} values, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        for (column, value) in self.data.iter_mut().zip(row) {
            column.push(*value);
        }
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.data.first().map_or(0, |c| c.len())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// 是否已带有幂等标记列
    pub fn is_transformed(&self) -> bool {
        self.has_column(MARKER_COLUMN)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
    }

    /// 获取必需列，缺失时报错
    pub fn require(&self, name: &str) -> Result<&[f64]> {
        self.column(name).ok_or_else(|| AlignError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// 按列名选取子表
    pub fn select(&self, names: &[&str]) -> Result<PointTable> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            columns.push((name.to_string(), self.require(name)?.to_vec()));
        }
        PointTable::from_columns(columns)
    }

    /// 第 `i` 行
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.data.iter().map(|c| c[i]).collect()
    }

    /// 逐行迭代
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// 提取 x/y/z 坐标点
    pub fn points(&self) -> Result<Vec<[f64; 3]>> {
        let x = self.require("x")?;
        let y = self.require("y")?;
        let z = self.require("z")?;

        Ok(x.iter()
            .zip(y)
            .zip(z)
            .map(|((x, y), z)| [*x, *y, *z])
            .collect())
    }
}
