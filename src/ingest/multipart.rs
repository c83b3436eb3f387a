// src/ingest/multipart.rs
//
// Just enough multipart/form-data to take the upload form: text fields
// plus one or more file parts. Anything that does not look like the
// browser-produced format is a BadRequest; there is no streaming, the
// whole body is already in memory.

use std::collections::HashMap;

use crate::errors::ServerError;

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

/// Extracts the boundary token from a `multipart/form-data` content type.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    if !content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return None;
    }

    content_type.split(';').find_map(|param| {
        let param = param.trim();
        let value = param.strip_prefix("boundary=")?;
        Some(value.trim_matches('"').to_string())
    })
}

pub fn parse(body: &[u8], boundary: &str) -> Result<UploadForm, ServerError> {
    let delimiter = format!("--{boundary}");
    let delim = delimiter.as_bytes();

    let mut form = UploadForm::default();
    let mut pos = find(body, delim, 0)
        .ok_or_else(|| ServerError::BadRequest("multipart 数据缺少起始边界".into()))?
        + delim.len();

    loop {
        // "--" after a delimiter closes the stream.
        if body[pos..].starts_with(b"--") {
            break;
        }
        let part_start = pos + skip_crlf(&body[pos..]);

        let part_end = match find(body, delim, part_start) {
            Some(idx) => idx,
            None => return Err(ServerError::BadRequest("multipart 数据缺少结束边界".into())),
        };
        pos = part_end + delim.len();

        // Delimiters are preceded by CRLF that belongs to the framing.
        let part = strip_trailing_crlf(&body[part_start..part_end]);
        parse_part(part, &mut form)?;

        if pos >= body.len() {
            break;
        }
    }

    Ok(form)
}

fn parse_part(part: &[u8], form: &mut UploadForm) -> Result<(), ServerError> {
    let header_end = find(part, b"\r\n\r\n", 0)
        .ok_or_else(|| ServerError::BadRequest("multipart 段缺少头部".into()))?;
    let headers = std::str::from_utf8(&part[..header_end])
        .map_err(|_| ServerError::BadRequest("multipart 头部不是合法 UTF-8".into()))?;
    let content = &part[header_end + 4..];

    let disposition = headers
        .lines()
        .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))
        .ok_or_else(|| ServerError::BadRequest("multipart 段缺少 Content-Disposition".into()))?;

    let name = quoted_param(disposition, "name")
        .ok_or_else(|| ServerError::BadRequest("multipart 段缺少字段名".into()))?;

    match quoted_param(disposition, "filename") {
        Some(file_name) => {
            // An empty filename means the user submitted without picking
            // a file; skip it rather than ingest an empty "file".
            if !file_name.is_empty() {
                form.files.push(UploadedFile {
                    file_name,
                    bytes: content.to_vec(),
                });
            }
        }
        None => {
            let value = String::from_utf8_lossy(content).into_owned();
            form.fields.insert(name, value);
        }
    }

    Ok(())
}

fn quoted_param(header: &str, key: &str) -> Option<String> {
    // Match whole `;`-separated parameters, so looking up `name` can
    // never land inside `filename="..."`.
    header.split(';').find_map(|param| {
        let value = param.trim().strip_prefix(key)?.strip_prefix("=\"")?;
        let end = value.find('"')?;
        Some(value[..end].to_string())
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

fn skip_crlf(bytes: &[u8]) -> usize {
    if bytes.starts_with(b"\r\n") {
        2
    } else {
        0
    }
}

fn strip_trailing_crlf(bytes: &[u8]) -> &[u8] {
    bytes.strip_suffix(b"\r\n").unwrap_or(bytes)
}
