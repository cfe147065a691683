//! IO helper: JSON text/file reading

use std::{fs::File, io::BufReader, path::Path};

use serde_json::Value;
use crate::model::data_core::AppError;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 解析JSON文本；格式错误时返回可区分的解析错误，不返回部分结构
pub fn parse_json_str(text: &str) -> Result<Value, AppError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_json_file() {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(br#"{"a": [1, 2]}"#).expect("写入临时文件失败");

        let value = read_json_file(file.path()).expect("读取应该成功");
        assert_eq!(value["a"][1], 2);
    }

    #[test]
    fn test_parse_errors_are_distinguishable() {
        assert!(matches!(parse_json_str("[1, 2"), Err(AppError::Parse(_))));
        assert!(matches!(parse_json_str(""), Err(AppError::Parse(_))));
        assert!(parse_json_str("null").is_ok());
    }
}
