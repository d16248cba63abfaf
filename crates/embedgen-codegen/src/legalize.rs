//! Identifier legalization.
//!
//! Turns arbitrary resource names (`my-file.bin`, `3d/model.obj`, ``) into
//! C-family identifiers. Each byte outside `[A-Za-z0-9_]` becomes `_`, a
//! leading digit gets a `_` prefix, and reserved words get a `_` suffix.
//! Names with no letter or digit left fall back to [`PLACEHOLDER_IDENTIFIER`].

/// Identifier used when a name legalizes to nothing meaningful.
pub const PLACEHOLDER_IDENTIFIER: &str = "embedded_resource";

/// Suffix appended to include guard tokens.
pub const GUARD_SUFFIX: &str = "_H";

/// C and C++ keywords that cannot be used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "restrict", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Outcome of legalizing one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legalized {
    pub identifier: String,
    /// `true` when the placeholder was substituted.
    pub degenerate: bool,
}

/// Legalize `raw` into an identifier.
pub fn legalize(raw: &str) -> String {
    legalize_name(raw).identifier
}

/// Legalize `raw`, reporting whether the placeholder had to be used.
pub fn legalize_name(raw: &str) -> Legalized {
    let mut identifier: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if !identifier.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Legalized {
            identifier: PLACEHOLDER_IDENTIFIER.to_string(),
            degenerate: true,
        };
    }

    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    if is_reserved(&identifier) {
        identifier.push('_');
    }

    Legalized {
        identifier,
        degenerate: false,
    }
}

/// Whether `s` is already a usable identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_reserved(s)
}

/// Whether `s` is a C or C++ keyword.
pub fn is_reserved(s: &str) -> bool {
    RESERVED_WORDS.contains(&s)
}

/// Macro name for an identifier: legalized and uppercased.
pub fn macro_name(identifier: &str) -> String {
    legalize(identifier).to_ascii_uppercase()
}

/// Include guard token for an output seed such as `assets.h`.
///
/// `assets.h` → `ASSETS_H`, `my-res` → `MY_RES_H`, `` → `EMBEDDED_RESOURCE_H`.
pub fn guard_token(seed: &str) -> String {
    let mut token = legalize(seed).to_ascii_uppercase();
    if !token.ends_with(GUARD_SUFFIX) {
        token.push_str(GUARD_SUFFIX);
    }
    token
}
