//! MIME type detection module
//!
//! Maps file extensions to Content-Type values. The table sits behind the
//! [`ContentTypes`] trait so asset serving can be given another lookup.

use std::path::Path;

/// Returned when no type can be inferred
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content-type inference for served assets
pub trait ContentTypes: Send + Sync {
    /// Infer the type of `path`, `None` when unknown
    fn lookup(&self, path: &Path) -> Option<String>;

    /// Infer the type of `path`, falling back to [`DEFAULT_CONTENT_TYPE`]
    fn content_type(&self, path: &Path) -> String {
        self.lookup(path)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
    }
}

/// Built-in extension table
///
/// # Examples
/// ```
/// use std::path::Path;
/// use guestbook::http::mime::{ContentTypes, ExtensionTable};
/// assert_eq!(ExtensionTable.content_type(Path::new("index.html")), "text/html; charset=utf-8");
/// assert_eq!(ExtensionTable.content_type(Path::new("favicon.ico")), "image/x-icon");
/// assert_eq!(ExtensionTable.content_type(Path::new("README")), "application/octet-stream");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionTable;

impl ContentTypes for ExtensionTable {
    fn lookup(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        lookup_extension(&ext).map(str::to_string)
    }
}

fn lookup_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(lookup_extension("html"), Some("text/html; charset=utf-8"));
        assert_eq!(lookup_extension("css"), Some("text/css"));
        assert_eq!(lookup_extension("js"), Some("application/javascript"));
        assert_eq!(lookup_extension("png"), Some("image/png"));
        assert_eq!(lookup_extension("ico"), Some("image/x-icon"));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(lookup_extension("xyz"), None);
        assert_eq!(lookup_extension(""), None);
        assert_eq!(
            ExtensionTable.content_type(Path::new("archive.xyz")),
            DEFAULT_CONTENT_TYPE
        );
    }

    #[test]
    fn test_table_by_path() {
        let table = ExtensionTable;
        assert_eq!(table.content_type(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(table.content_type(Path::new("css/STYLE.CSS")), "text/css");
        assert_eq!(table.lookup(Path::new("Makefile")), None);
        assert_eq!(table.content_type(Path::new("Makefile")), DEFAULT_CONTENT_TYPE);
    }
}
