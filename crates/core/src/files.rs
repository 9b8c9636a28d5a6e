//! Upload naming and content-type rules for client document files.

use uuid::Uuid;

/// File extensions accepted for document uploads (lowercase, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "csv", "txt", "jpg", "jpeg", "png",
];

/// Default upper bound on an uploaded file (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Longest original file name kept on the document row.
const MAX_FILE_NAME_LEN: usize = 255;

/// Lowercased extension of `file_name`, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Whether the file's extension is on the upload allow-list.
pub fn is_allowed_extension(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Infer a MIME type from a file name's extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Strip directory components and control characters from a client-supplied
/// file name. Returns `None` when nothing usable remains.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_FILE_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        None
    } else {
        Some(cleaned)
    }
}

/// Name under which an upload is written to disk: `{uuid}.{ext}`.
pub fn stored_file_name(original: &str) -> String {
    match extension_of(original) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}
