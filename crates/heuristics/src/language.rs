use std::path::Path;

/// Language inferred from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    TypeScript,
    Tsx,
    JavaScript,
    C,
    Cpp,
    Cuda,
    Go,
    Java,
    Ruby,
    Rust,
    Php,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" => Language::Python,
            "ts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "js" | "mjs" | "cjs" => Language::JavaScript,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" => Language::Cpp,
            "cu" => Language::Cuda,
            "go" => Language::Go,
            "java" => Language::Java,
            "rb" => Language::Ruby,
            "rs" => Language::Rust,
            "php" => Language::Php,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Fence label for the pack document; empty when unknown.
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::JavaScript => "javascript",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Cuda => "cuda",
            Language::Go => "go",
            Language::Java => "java",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Unknown => "",
        }
    }
}
