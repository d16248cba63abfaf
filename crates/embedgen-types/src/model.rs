//! Data model for the embedding pipeline.
//!
//! ```text
//! Resource → encoded body + identifier → Declaration → OutputUnit → header text
//! ```
//!
//! Every value here is immutable once built; stages hand ownership forward.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EmbedError;

// ══════════════════════════════════════════════════════════════════════════════
// Resource
// ══════════════════════════════════════════════════════════════════════════════

/// One input file: its logical name and raw content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Resource {
    /// Create a resource from raw bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Create a resource from text content.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The last path component of `name` without its final extension.
    pub fn file_stem(&self) -> &str {
        file_stem(&self.name)
    }
}

/// The last path component of `name` without its final extension.
///
/// `assets/logo.min.svg` → `logo.min`, `.gitignore` → `.gitignore`.
pub fn file_stem(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// EncodingStyle
// ══════════════════════════════════════════════════════════════════════════════

/// How a resource is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStyle {
    /// `const char name[N + 1] = "...";`
    StringLiteral,
    /// `constexpr std::string_view name{"...", N};`
    TypedConstant,
    /// `constexpr unsigned char name[N] = {...};` plus a size constant.
    ByteArray,
    /// `#define NAME "..."`
    PreprocessorDefine,
}

impl EncodingStyle {
    /// All styles, in declaration order.
    pub const ALL: [EncodingStyle; 4] = [
        EncodingStyle::StringLiteral,
        EncodingStyle::TypedConstant,
        EncodingStyle::ByteArray,
        EncodingStyle::PreprocessorDefine,
    ];

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StringLiteral => "string_literal",
            Self::TypedConstant => "typed_constant",
            Self::ByteArray => "byte_array",
            Self::PreprocessorDefine => "preprocessor_define",
        }
    }

    /// Human-readable description used in log output.
    pub fn describe(self) -> &'static str {
        match self {
            Self::StringLiteral => "char literal",
            Self::TypedConstant => "typed constant",
            Self::ByteArray => "byte array",
            Self::PreprocessorDefine => "preprocessor macro",
        }
    }

    /// Whether the declaration grammar of this style can live in a namespace.
    pub fn supports_namespace(self) -> bool {
        !matches!(self, Self::PreprocessorDefine)
    }

    /// Whether the encoded body is a (sequence of) quoted string literal(s).
    pub fn is_string(self) -> bool {
        !matches!(self, Self::ByteArray)
    }
}

impl fmt::Display for EncodingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingStyle {
    type Err = EmbedError;

    /// Accepts canonical names plus the build-helper aliases
    /// `const_char`, `constexpr_auto` and `define_constant`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "string_literal" | "const_char" | "char_literal" => Ok(Self::StringLiteral),
            "typed_constant" | "constexpr_auto" | "auto_literal" => Ok(Self::TypedConstant),
            "byte_array" | "bytes" => Ok(Self::ByteArray),
            "preprocessor_define" | "define_constant" | "define" => {
                Ok(Self::PreprocessorDefine)
            }
            _ => Err(EmbedError::UnknownStyle(s.to_string())),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Placement
// ══════════════════════════════════════════════════════════════════════════════

/// Where a declaration lives: its namespace nesting and whether it shares the
/// output unit with other declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub namespace_path: Vec<String>,
    #[serde(default)]
    pub is_multi: bool,
}

impl Placement {
    /// File scope, single declaration.
    pub fn root() -> Self {
        Self::default()
    }

    /// Nested namespaces, outermost first.
    pub fn in_namespace<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace_path: path.into_iter().map(Into::into).collect(),
            is_multi: false,
        }
    }

    /// Parse a `a::b::c` path. Empty segments are dropped.
    pub fn from_path(path: &str) -> Self {
        Self::in_namespace(path.split("::").map(str::trim).filter(|s| !s.is_empty()))
    }

    /// Set the multi-declaration flag.
    pub fn multi(mut self, is_multi: bool) -> Self {
        self.is_multi = is_multi;
        self
    }

    pub fn is_namespaced(&self) -> bool {
        !self.namespace_path.is_empty()
    }

    /// The same placement at file scope.
    pub fn at_file_scope(&self) -> Self {
        Self {
            namespace_path: Vec::new(),
            is_multi: self.is_multi,
        }
    }

    /// `a::b::identifier`, or just `identifier` at file scope.
    pub fn qualify(&self, identifier: &str) -> String {
        let mut key = String::new();
        for segment in &self.namespace_path {
            key.push_str(segment);
            key.push_str("::");
        }
        key.push_str(identifier);
        key
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Declaration / OutputUnit
// ══════════════════════════════════════════════════════════════════════════════

/// One rendered declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Legalized identifier (uppercased for macros).
    pub identifier: String,
    pub style: EncodingStyle,
    /// The encoder output the declaration was built from.
    pub encoded_body: String,
    /// Effective placement; macros are always at file scope.
    pub placement: Placement,
    /// Byte count of the embedded content.
    pub byte_len: usize,
    /// Name of the resource this came from.
    pub source_name: String,
    /// Namespace openings followed by the declaration itself.
    ///
    /// Namespace closings are left to the emitter.
    pub rendered: String,
}

impl Declaration {
    /// The uniqueness key within one output unit.
    pub fn qualified_name(&self) -> String {
        self.placement.qualify(&self.identifier)
    }

    /// Record which resource produced this declaration.
    pub fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }
}

/// The aggregated, collision-free set of declarations for one header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputUnit {
    pub declarations: Vec<Declaration>,
    pub include_guard_token: String,
}

impl OutputUnit {
    /// Whether any declaration uses `style`.
    pub fn uses_style(&self, style: EncodingStyle) -> bool {
        self.declarations.iter().any(|d| d.style == style)
    }
}
