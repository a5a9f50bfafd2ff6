//! MIME type resolution by file extension.

use std::path::Path;

/// The MIME type used when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Resolves the MIME type registered for `extension`.
///
/// The extension may carry a leading dot and is matched case-insensitively.
/// Empty or unknown extensions resolve to `application/octet-stream`.
pub fn mime_type_for(extension: &str) -> String {
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    if extension.is_empty() {
        return OCTET_STREAM.to_string();
    }

    mime_guess::from_ext(extension)
        .first()
        .map_or_else(|| OCTET_STREAM.to_string(), |mime| mime.essence_str().to_string())
}

/// Resolves the MIME type for the extension of `path`.
pub fn mime_type_for_path<P: AsRef<Path>>(path: P) -> String {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some(extension) => mime_type_for(extension),
        None => OCTET_STREAM.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_for("txt"), mime::TEXT_PLAIN.essence_str());
        assert_eq!(mime_type_for(".txt"), "text/plain");
        assert_eq!(mime_type_for("PNG"), mime::IMAGE_PNG.essence_str());
        assert_eq!(mime_type_for("json"), mime::APPLICATION_JSON.essence_str());
    }

    #[test]
    fn test_unknown_extensions() {
        assert_eq!(mime_type_for(""), OCTET_STREAM);
        assert_eq!(mime_type_for("."), OCTET_STREAM);
        assert_eq!(mime_type_for("definitely-not-an-extension"), OCTET_STREAM);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(mime_type_for_path("dir/a.txt"), "text/plain");
        assert_eq!(mime_type_for_path("dir/README"), OCTET_STREAM);
        assert_eq!(mime_type_for_path("archive.tar.gz"), mime_type_for("gz"));
    }
}
