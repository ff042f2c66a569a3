//! # PSI 点云格式解析器
//!
//! 读写显微图像分割导出的 PSI 点云文件。
//!
//! ## .psi 格式说明
//! ```text
//! # PSI Format 1.0
//! #
//! # column[0] = "x"
//! # column[1] = "y"
//! # column[2] = "z"
//! # end of header
//! N 0 0
//! 1 0 0
//! 0 1 0
//! 0 0 1
//! x1 y1 z1
//! x2 y2 z2
//! ...
//! ```
//! 首个非注释行以行数 N 开头，随后三行为基向量（读取时忽略），
//! 之后每行一个点，值的个数与声明的列数一致。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/table.rs`
//! - 使用 `regex` 解析列声明

use crate::error::{AlignError, Result};
use crate::models::PointTable;

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// 基向量行数
const BASIS_LINES: usize = 3;

fn column_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^#\s*column\[(\d+)\]\s*=\s*"([^"]+)""#).expect("valid column pattern")
    })
}

/// 解析 .psi 文件
pub fn parse_psi_file(path: &Path) -> Result<PointTable> {
    let content = fs::read_to_string(path).map_err(|e| AlignError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_psi_content(&content).map_err(|reason| AlignError::ParseError {
        format: "PSI".to_string(),
        path: path.display().to_string(),
        reason,
    })
}

/// 从字符串内容解析 .psi 格式
pub fn parse_psi_content(content: &str) -> std::result::Result<PointTable, String> {
    let mut declared: Vec<(usize, String)> = Vec::new();
    let mut body = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            if let Some(caps) = column_pattern().captures(trimmed) {
                let index: usize = caps[1]
                    .parse()
                    .map_err(|_| format!("bad column index in '{}'", trimmed))?;
                declared.push((index, caps[2].to_string()));
            }
            continue;
        }
        body.push(trimmed);
    }

    if declared.is_empty() {
        return Err("no column declarations in header".to_string());
    }

    // 列声明必须恰好覆盖 0..n
    declared.sort_by_key(|(i, _)| *i);
    for (expected, (index, name)) in declared.iter().enumerate() {
        if *index != expected {
            return Err(format!(
                "column '{}' declared at index {}, expected {}",
                name, index, expected
            ));
        }
    }
    let names: Vec<String> = declared.into_iter().map(|(_, name)| name).collect();

    let mut lines = body.into_iter();

    let count_line = lines.next().ok_or("missing point count line")?;
    let count: usize = count_line
        .split_whitespace()
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| format!("invalid point count line '{}'", count_line))?;

    for _ in 0..BASIS_LINES {
        lines.next().ok_or("truncated basis vectors")?;
    }

    let mut table = PointTable::new(names).map_err(|e| e.to_string())?;
    let width = table.n_cols();
    let mut row = Vec::with_capacity(width);

    for (n, line) in lines.enumerate() {
        row.clear();
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .map_err(|_| format!("invalid number '{}' in data row {}", token, n + 1))?;
            row.push(value);
        }
        if row.len() != width {
            return Err(format!(
                "data row {} has {} values, expected {}",
                n + 1,
                row.len(),
                width
            ));
        }
        table.push_row(&row).map_err(|e| e.to_string())?;
    }

    if table.n_rows() != count {
        return Err(format!(
            "header declares {} points, found {}",
            count,
            table.n_rows()
        ));
    }

    Ok(table)
}

/// 将表格写为 .psi 格式字符串
pub fn to_psi_string(table: &PointTable) -> String {
    let mut lines = Vec::with_capacity(table.n_rows() + table.n_cols() + 8);

    lines.push("# PSI Format 1.0".to_string());
    lines.push("#".to_string());
    for (i, name) in table.columns().iter().enumerate() {
        lines.push(format!("# column[{}] = \"{}\"", i, name));
    }
    lines.push("# end of header".to_string());

    lines.push(format!("{} 0 0", table.n_rows()));
    lines.push("1 0 0".to_string());
    lines.push("0 1 0".to_string());
    lines.push("0 0 1".to_string());

    for row in table.rows() {
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        lines.push(values.join(" "));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
