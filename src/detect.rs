use http::header::{self, HeaderMap};
use std::path::{Path, PathBuf};

/// Content types that mark a response as CSS.
///
/// Static file services report either the extension or the media type.
pub const CSS_CONTENT_TYPES: [&str; 2] = [".css", "text/css"];

/// Content type written on every transformed response.
pub const CSS_CONTENT_TYPE: &str = "text/css";

/// Checks whether the response declares one of the recognized CSS types.
///
/// Media type parameters such as `; charset=utf-8` are ignored.
pub fn is_css_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type.split(';').next().unwrap_or("").trim();
    CSS_CONTENT_TYPES
        .iter()
        .any(|css| essence.eq_ignore_ascii_case(css))
}

/// Checks whether a request path names a CSS module (`*.module.css`).
///
/// The second-to-last `.`-separated segment of the whole path must be
/// exactly `module`.
pub fn is_module_file(path: &str) -> bool {
    path.split('.').nth_back(1) == Some("module")
}

/// Resolves a request path to the source file below `root`.
///
/// The request path is treated as relative to `root`. `.` segments are
/// dropped and `..` segments never climb above `root`.
pub fn source_path(root: &Path, request_path: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    let mut depth = 0usize;

    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if depth > 0 {
                    path.pop();
                    depth -= 1;
                }
            }
            segment => {
                path.push(segment);
                depth += 1;
            }
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with_type(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_css_media_type() {
        assert!(is_css_content_type(&headers_with_type("text/css")));
    }

    #[test]
    fn test_css_extension_token() {
        assert!(is_css_content_type(&headers_with_type(".css")));
    }

    #[test]
    fn test_css_with_charset() {
        assert!(is_css_content_type(&headers_with_type(
            "text/css; charset=utf-8"
        )));
    }

    #[test]
    fn test_css_case_insensitive() {
        assert!(is_css_content_type(&headers_with_type("Text/CSS")));
    }

    #[test]
    fn test_not_css() {
        assert!(!is_css_content_type(&headers_with_type("application/json")));
        assert!(!is_css_content_type(&headers_with_type("text/html")));
        assert!(!is_css_content_type(&headers_with_type("css")));
        assert!(!is_css_content_type(&headers_with_type("text/css-extra")));
    }

    #[test]
    fn test_missing_content_type() {
        assert!(!is_css_content_type(&HeaderMap::new()));
    }

    #[test]
    fn test_module_file() {
        assert!(is_module_file("/styles/app.module.css"));
        assert!(is_module_file("/x.module.css"));
    }

    #[test]
    fn test_not_module_file() {
        assert!(!is_module_file("/styles/app.css"));
        assert!(!is_module_file("/module.css"));
        assert!(!is_module_file("/app.modules.css"));
        assert!(!is_module_file("/a.module/app.css"));
        assert!(!is_module_file("/styles/app"));
    }

    #[test]
    fn test_source_path_joins_root() {
        assert_eq!(
            source_path(Path::new("/site"), "/styles/app.css"),
            PathBuf::from("/site/styles/app.css")
        );
    }

    #[test]
    fn test_source_path_normalizes_segments() {
        assert_eq!(
            source_path(Path::new("/site"), "/styles/./old/../app.css"),
            PathBuf::from("/site/styles/app.css")
        );
    }

    #[test]
    fn test_source_path_stays_below_root() {
        assert_eq!(
            source_path(Path::new("/site"), "/../../etc/app.css"),
            PathBuf::from("/site/etc/app.css")
        );
    }
}
