/// Language hint handed to the editing surface when a buffer is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageHint {
    Rust,
    Go,
    Python,
    JavaScript,
    TypeScript,
    Json,
    Markdown,
    Html,
    Css,
    Toml,
    Yaml,
    PlainText,
}

impl LanguageHint {
    pub fn from_path(path: &str) -> Self {
        let name = super::path::file_name(path);
        let Some((stem, ext)) = name.rsplit_once('.') else {
            return Self::PlainText;
        };
        if stem.is_empty() {
            return Self::PlainText;
        }
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Self::Rust,
            "go" => Self::Go,
            "py" | "pyi" => Self::Python,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "mts" | "cts" | "tsx" => Self::TypeScript,
            "json" => Self::Json,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "toml" => Self::Toml,
            "yaml" | "yml" => Self::Yaml,
            _ => Self::PlainText,
        }
    }

    pub fn language_id(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Css => "css",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::PlainText => "plaintext",
        }
    }
}
