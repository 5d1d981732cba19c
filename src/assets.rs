//! Sample content for a fresh static root.

use std::io;
use std::path::{Path, PathBuf};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Static File Server</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <div class="container">
        <header>
            <h1>Static File Server</h1>
            <p>Architecture: worker pool + poll()</p>
        </header>
        <main>
            <section class="features">
                <h2>Features</h2>
                <ul>
                    <li>GET and HEAD requests</li>
                    <li>Files up to 128 MB</li>
                    <li>Multiplexing with poll()</li>
                    <li>Path traversal protection</li>
                    <li>Request logging</li>
                </ul>
            </section>
            <section class="demo">
                <h2>Test files</h2>
                <ul>
                    <li><a href="/test.txt">test.txt</a></li>
                    <li><a href="/style.css">style.css</a></li>
                </ul>
            </section>
        </main>
    </div>
</body>
</html>
"#;

const STYLE_CSS: &str = r#"* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    line-height: 1.6;
    color: #333;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
}

.container {
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
}

header, section {
    background: rgba(255, 255, 255, 0.95);
    padding: 30px;
    border-radius: 15px;
    margin-bottom: 30px;
}

h2 {
    color: #2c3e50;
    margin-bottom: 20px;
    border-bottom: 2px solid #3498db;
}

a {
    color: #3498db;
    text-decoration: none;
}
"#;

const TEST_TXT: &str = "This is a test text file.\nThe server is up and serving static content!\n";

const SAMPLES: &[(&str, &str)] = &[
    ("index.html", INDEX_HTML),
    ("style.css", STYLE_CSS),
    ("test.txt", TEST_TXT),
];

/// Creates `root` and writes the sample files that do not exist yet.
/// Existing files are left alone. Returns the paths written.
pub fn seed_static_root(root: &Path) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(root)?;

    let mut written = Vec::new();
    for (name, contents) in SAMPLES {
        let path = root.join(name);
        if path.exists() {
            continue;
        }
        std::fs::write(&path, contents)?;
        tracing::info!("Created {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Makes sure the directory holding the log file exists.
pub fn ensure_log_dir(log_file: &Path) -> io::Result<()> {
    match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
