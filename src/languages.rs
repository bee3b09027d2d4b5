//! Language classification and per-language lexical profiles.
//!
//! A profile describes just enough syntax (comment delimiters, string
//! delimiters, decision keywords, function boundaries) to drive the lexical
//! scanner and the complexity analyzer without a real parser. Unknown
//! extensions map to [`Language::Generic`], which still receives raw-line
//! style checks but no token-based analysis.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// How function-like units are delimited in a language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Units are brace-delimited blocks (C family, Go, Rust, ...).
    Brace,
    /// Units end when indentation returns to the level of the definition
    /// line (Python; also the best-effort heuristic for Ruby and Lua).
    Indent,
    /// No unit detection; metrics are computed at file scope only.
    None,
}

/// Static lexical metadata for one language family.
#[derive(Debug)]
pub struct LanguageProfile {
    pub name: &'static str,
    pub line_comments: &'static [&'static str],
    pub block_comments: &'static [(&'static str, &'static str)],
    /// Delimiters for single-line string literals.
    pub string_delimiters: &'static [char],
    /// Delimiters for strings that may span lines (triple quotes, backticks).
    pub multiline_strings: &'static [(&'static str, &'static str)],
    pub escape_char: Option<char>,
    /// Keywords counted as decision points and weighted by nesting for
    /// cognitive complexity.
    pub decision_keywords: &'static [&'static str],
    /// Short-circuit operators and word-operators counted as flat decision
    /// points (`&&`, `||`, `and`, `or`, ternary `?` where unambiguous).
    pub boolean_operators: &'static [&'static str],
    /// Keywords that introduce a function definition, used for unit naming.
    /// Empty for brace languages without one (Java, C); those fall back to
    /// top-level brace-group detection.
    pub function_keywords: &'static [&'static str],
    pub boundary: BoundaryKind,
}

impl LanguageProfile {
    /// Generic profiles carry no decision keywords, which disables
    /// complexity and token-based security analysis.
    pub fn supports_tokens(&self) -> bool {
        !self.decision_keywords.is_empty()
    }
}

macro_rules! profile {
    ($name:ident, $display:expr, $line:expr, $block:expr, $strings:expr,
     $multi:expr, $esc:expr, $decisions:expr, $bools:expr, $funcs:expr, $boundary:expr) => {
        static $name: LanguageProfile = LanguageProfile {
            name: $display,
            line_comments: &$line,
            block_comments: &$block,
            string_delimiters: &$strings,
            multiline_strings: &$multi,
            escape_char: $esc,
            decision_keywords: &$decisions,
            boolean_operators: &$bools,
            function_keywords: &$funcs,
            boundary: $boundary,
        };
    };
}

profile!(
    PYTHON,
    "Python",
    ["#"],
    [],
    ['"', '\''],
    [("\"\"\"", "\"\"\""), ("'''", "'''")],
    Some('\\'),
    ["if", "elif", "for", "while", "except", "case"],
    ["and", "or"],
    ["def"],
    BoundaryKind::Indent
);

profile!(
    JAVASCRIPT,
    "JavaScript",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [("`", "`")],
    Some('\\'),
    ["if", "for", "while", "case", "catch"],
    ["&&", "||"],
    ["function"],
    BoundaryKind::Brace
);

profile!(
    TYPESCRIPT,
    "TypeScript",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [("`", "`")],
    Some('\\'),
    ["if", "for", "while", "case", "catch"],
    ["&&", "||"],
    ["function"],
    BoundaryKind::Brace
);

profile!(
    GO,
    "Go",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [("`", "`")],
    Some('\\'),
    ["if", "for", "case", "select"],
    ["&&", "||"],
    ["func"],
    BoundaryKind::Brace
);

profile!(
    JAVA,
    "Java",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "while", "case", "catch"],
    ["&&", "||", "?"],
    [],
    BoundaryKind::Brace
);

profile!(
    C_LANG,
    "C",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "while", "case"],
    ["&&", "||", "?"],
    [],
    BoundaryKind::Brace
);

profile!(
    CPP,
    "C++",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "while", "case", "catch"],
    ["&&", "||", "?"],
    [],
    BoundaryKind::Brace
);

profile!(
    CSHARP,
    "C#",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "foreach", "while", "case", "catch"],
    ["&&", "||"],
    [],
    BoundaryKind::Brace
);

// Ruby's `=begin`/`=end` is valid only at column 0; the scanner has no
// column awareness, so the pair is omitted and `#` covers comments.
profile!(
    RUBY,
    "Ruby",
    ["#"],
    [],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "elsif", "unless", "for", "while", "until", "when", "rescue"],
    ["&&", "||", "and", "or"],
    ["def"],
    BoundaryKind::Indent
);

profile!(
    PHP,
    "PHP",
    ["//", "#"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "elseif", "for", "foreach", "while", "case", "catch"],
    ["&&", "||", "and", "or"],
    ["function"],
    BoundaryKind::Brace
);

profile!(
    RUST_LANG,
    "Rust",
    ["//"],
    [("/*", "*/")],
    ['"'],
    [],
    Some('\\'),
    ["if", "for", "while", "match"],
    ["&&", "||"],
    ["fn"],
    BoundaryKind::Brace
);

profile!(
    KOTLIN,
    "Kotlin",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "while", "when", "catch"],
    ["&&", "||"],
    ["fun"],
    BoundaryKind::Brace
);

profile!(
    SWIFT,
    "Swift",
    ["//"],
    [("/*", "*/")],
    ['"'],
    [],
    Some('\\'),
    ["if", "guard", "for", "while", "case", "catch"],
    ["&&", "||"],
    ["func"],
    BoundaryKind::Brace
);

profile!(
    SCALA,
    "Scala",
    ["//"],
    [("/*", "*/")],
    ['"'],
    [],
    Some('\\'),
    ["if", "for", "while", "case", "catch"],
    ["&&", "||"],
    ["def"],
    BoundaryKind::Brace
);

profile!(
    SHELL,
    "Shell",
    ["#"],
    [],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "elif", "for", "while", "until", "case"],
    ["&&", "||"],
    [],
    BoundaryKind::Brace
);

profile!(
    PERL,
    "Perl",
    ["#"],
    [],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "elsif", "unless", "for", "foreach", "while", "until"],
    ["&&", "||", "and", "or"],
    ["sub"],
    BoundaryKind::Brace
);

profile!(
    LUA,
    "Lua",
    ["--"],
    [("--[[", "]]")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "elseif", "for", "while", "repeat"],
    ["and", "or"],
    ["function"],
    BoundaryKind::Indent
);

profile!(
    R_LANG,
    "R",
    ["#"],
    [],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "while", "repeat"],
    ["&&", "||"],
    ["function"],
    BoundaryKind::Brace
);

profile!(
    DART,
    "Dart",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "while", "case", "catch"],
    ["&&", "||"],
    [],
    BoundaryKind::Brace
);

profile!(
    OBJECTIVE_C,
    "Objective-C",
    ["//"],
    [("/*", "*/")],
    ['"', '\''],
    [],
    Some('\\'),
    ["if", "for", "while", "case", "catch"],
    ["&&", "||", "?"],
    [],
    BoundaryKind::Brace
);

profile!(
    HASKELL,
    "Haskell",
    ["--"],
    [("{-", "-}")],
    ['"'],
    [],
    Some('\\'),
    ["if", "case"],
    ["&&", "||"],
    [],
    BoundaryKind::None
);

profile!(
    GENERIC,
    "Generic",
    ["#"],
    [],
    [],
    [],
    None,
    [],
    [],
    [],
    BoundaryKind::None
);

/// Supported language families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Php,
    Rust,
    Kotlin,
    Swift,
    Scala,
    Shell,
    Perl,
    Lua,
    R,
    Dart,
    ObjectiveC,
    Haskell,
    /// Sentinel for unrecognized extensions; style checks only.
    Generic,
}

static EXTENSION_MAP: Lazy<HashMap<&'static str, Language>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for lang in Language::all() {
        for ext in lang.extensions() {
            map.insert(*ext, *lang);
        }
    }
    map
});

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Go,
            Language::Java,
            Language::C,
            Language::Cpp,
            Language::CSharp,
            Language::Ruby,
            Language::Php,
            Language::Rust,
            Language::Kotlin,
            Language::Swift,
            Language::Scala,
            Language::Shell,
            Language::Perl,
            Language::Lua,
            Language::R,
            Language::Dart,
            Language::ObjectiveC,
            Language::Haskell,
        ]
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyw"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Go => &["go"],
            Language::Java => &["java"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            Language::CSharp => &["cs"],
            Language::Ruby => &["rb", "rake"],
            Language::Php => &["php"],
            Language::Rust => &["rs"],
            Language::Kotlin => &["kt", "kts"],
            Language::Swift => &["swift"],
            Language::Scala => &["scala", "sc"],
            Language::Shell => &["sh", "bash", "zsh"],
            Language::Perl => &["pl", "pm"],
            Language::Lua => &["lua"],
            Language::R => &["r"],
            Language::Dart => &["dart"],
            Language::ObjectiveC => &["m", "mm"],
            Language::Haskell => &["hs"],
            Language::Generic => &[],
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.profile().name
    }

    /// Parse a user-supplied language name (`python`, `c++`, `shell`) or
    /// extension (`py`, `rs`).
    pub fn from_name(name: &str) -> Option<Language> {
        let lowered = name.to_ascii_lowercase();
        Language::all()
            .iter()
            .find(|l| l.display_name().to_ascii_lowercase() == lowered)
            .copied()
            .or_else(|| match EXTENSION_MAP.get(lowered.as_str()) {
                Some(lang) => Some(*lang),
                None => None,
            })
    }

    pub fn from_extension(ext: &str) -> Language {
        let lowered = ext.to_ascii_lowercase();
        EXTENSION_MAP
            .get(lowered.as_str())
            .copied()
            .unwrap_or(Language::Generic)
    }

    /// Classify a file by extension. Files without an extension (or with an
    /// unknown one) get the generic profile rather than an error.
    pub fn from_path(path: &Path) -> Language {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Language::from_extension)
            .unwrap_or(Language::Generic)
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        match self {
            Language::Python => &PYTHON,
            Language::JavaScript => &JAVASCRIPT,
            Language::TypeScript => &TYPESCRIPT,
            Language::Go => &GO,
            Language::Java => &JAVA,
            Language::C => &C_LANG,
            Language::Cpp => &CPP,
            Language::CSharp => &CSHARP,
            Language::Ruby => &RUBY,
            Language::Php => &PHP,
            Language::Rust => &RUST_LANG,
            Language::Kotlin => &KOTLIN,
            Language::Swift => &SWIFT,
            Language::Scala => &SCALA,
            Language::Shell => &SHELL,
            Language::Perl => &PERL,
            Language::Lua => &LUA,
            Language::R => &R_LANG,
            Language::Dart => &DART,
            Language::ObjectiveC => &OBJECTIVE_C,
            Language::Haskell => &HASKELL,
            Language::Generic => &GENERIC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn known_extensions_classify() {
        assert_eq!(Language::from_path(&PathBuf::from("a/b/main.py")), Language::Python);
        assert_eq!(Language::from_path(&PathBuf::from("lib.rs")), Language::Rust);
        assert_eq!(Language::from_path(&PathBuf::from("App.TSX")), Language::TypeScript);
    }

    #[test]
    fn unknown_extension_falls_back_to_generic() {
        let lang = Language::from_path(&PathBuf::from("data.xyz"));
        assert_eq!(lang, Language::Generic);
        assert!(!lang.profile().supports_tokens());
    }

    #[test]
    fn at_least_twenty_language_families() {
        assert!(Language::all().len() >= 20);
    }

    #[test]
    fn extension_map_has_no_collisions() {
        let mut seen = HashMap::new();
        for lang in Language::all() {
            for ext in lang.extensions() {
                if let Some(prev) = seen.insert(*ext, *lang) {
                    panic!("extension {ext} mapped to both {prev:?} and {lang:?}");
                }
            }
        }
    }
}
