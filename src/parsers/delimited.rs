//! # CSV 点云表格
//!
//! 首行为列名，其余每行一个点。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `csv` 库读写

use crate::error::{AlignError, Result};
use crate::models::PointTable;

use std::fs;
use std::path::Path;

/// 解析 CSV 点云文件
pub fn parse_csv_file(path: &Path) -> Result<PointTable> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    parse_csv_reader(reader).map_err(|reason| AlignError::ParseError {
        format: "CSV".to_string(),
        path: path.display().to_string(),
        reason,
    })
}

fn parse_csv_reader<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> std::result::Result<PointTable, String> {
    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    if headers.is_empty() {
        return Err("missing header row".to_string());
    }

    let mut table = PointTable::new(headers.iter().map(|h| h.to_string()).collect())
        .map_err(|e| e.to_string())?;
    let mut row = Vec::with_capacity(headers.len());

    for (n, record) in reader.records().enumerate() {
        let record = record.map_err(|e| e.to_string())?;
        row.clear();
        for field in record.iter() {
            let value: f64 = field
                .parse()
                .map_err(|_| format!("invalid number '{}' in data row {}", field, n + 1))?;
            row.push(value);
        }
        table.push_row(&row).map_err(|e| e.to_string())?;
    }

    Ok(table)
}

/// 写入 CSV 点云文件
pub fn write_csv_file(table: &PointTable, path: &Path) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| AlignError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }

    wtr.flush().map_err(|e| AlignError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(content: &str) -> std::result::Result<PointTable, String> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        parse_csv_reader(reader)
    }

    #[test]
    fn test_parse_csv_basic() {
        let table = parse_str("x, y, z, ac\n1, 2, 3, 0.5\n4, 5, 6, 0.7\n").unwrap();
        assert_eq!(table.n_rows(), 2);
        assert!(table.is_transformed());
        assert_eq!(table.column("z").unwrap(), &[3.0, 6.0]);
    }

    #[test]
    fn test_parse_csv_bad_number() {
        let err = parse_str("x,y,z\n1,two,3\n").unwrap_err();
        assert!(err.contains("two"));
    }

    #[test]
    fn test_write_csv_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cloud.csv");
        let table = PointTable::from_points(&[[1.0, 2.0, 3.0]]);

        let err = write_csv_file(&table, &path).unwrap_err();
        assert!(matches!(err, AlignError::FileWriteError { path: p, .. } if p.ends_with("cloud.csv")));
    }

    #[test]
    fn test_parse_csv_duplicate_column() {
        let err = parse_str("x,y,z,x\n1,2,3,4\n").unwrap_err();
        assert!(err.contains("duplicate column 'x'"));
    }

    #[test]
    fn test_csv_file_write_then_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.csv");
        let table = PointTable::from_points(&[[1.5, 2.0, -3.25], [0.0, 0.0, 1.0]]);

        write_csv_file(&table, &path).unwrap();
        assert_eq!(parse_csv_file(&path).unwrap(), table);
    }
}
