use std::path::Path;

/// Type sent for files whose extension is not in the table.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for `path`, from its extension alone.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => content_type_for_extension(ext),
        None => DEFAULT_CONTENT_TYPE,
    }
}

/// Case-sensitive lookup, so `INDEX.HTML` is served as binary.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type_for(Path::new("static/index.html")), "text/html");
        assert_eq!(content_type_for(Path::new("a/b.htm")), "text/html");
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(content_type_for(Path::new("app.js")), "application/javascript");
        assert_eq!(content_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("test.txt")), "text/plain");
    }

    #[test]
    fn unknown_or_missing_extension_is_binary() {
        assert_eq!(content_type_for(Path::new("archive.tar.gz")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("Makefile")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("INDEX.HTML")), DEFAULT_CONTENT_TYPE);
    }
}
