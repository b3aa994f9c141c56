//! 上传文件的预检与解码

use crate::errors::{Result, RosterError};

/// 常见二进制表格/压缩格式的魔术字节
fn binary_kind(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
        // OOXML (xlsx) 或 zip
        Some("xlsx/zip")
    } else if data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]) {
        Some("xls")
    } else if data.starts_with(b"%PDF") {
        Some("pdf")
    } else if data.starts_with(&[0x1F, 0x8B]) {
        Some("gzip")
    } else {
        None
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// 校验扩展名与内容，并解码为文本（去除 BOM，非法 UTF-8 以替换字符代替）
pub fn decode_text_upload(data: &[u8], file_name: &str, allowed: &[String]) -> Result<String> {
    if data.is_empty() {
        return Err(RosterError::empty_input("Uploaded file is empty"));
    }

    if let Some(ext) = extension_of(file_name)
        && !allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
    {
        return Err(RosterError::validation(format!(
            "File type .{ext} is not allowed, expected one of: {}",
            allowed.join(", ")
        )));
    }

    if let Some(kind) = binary_kind(data) {
        return Err(RosterError::validation(format!(
            "Binary {kind} content is not supported, export the sheet as CSV first"
        )));
    }

    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    Ok(String::from_utf8_lossy(data).into_owned())
}
