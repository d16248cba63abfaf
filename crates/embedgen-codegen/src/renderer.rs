//! Declaration rendering.
//!
//! Wraps an encoded body in the declaration grammar of its style and opens
//! the namespaces of its placement. The matching closings come from
//! [`namespace_close`] and are written by the emitter after the declaration.
//!
//! | Style                | Declaration                                           |
//! |----------------------|-------------------------------------------------------|
//! | `StringLiteral`      | `const char name[N + 1] = "...";`                     |
//! | `TypedConstant`      | `constexpr std::string_view name{"...", N};`          |
//! | `ByteArray`          | `constexpr unsigned char name[N] = {...};` + `name_size` |
//! | `PreprocessorDefine` | `#define NAME "..."` (always at file scope)           |
//!
//! Declarations placed in a multi-declaration unit are `inline` so the header
//! may be included from several translation units.

use embedgen_types::{Declaration, EmbedError, EncodingStyle, Placement, Result};

use crate::legalize::{is_identifier, legalize, macro_name};

/// Indentation for continuation lines and array bodies.
pub const INDENT: &str = "    ";

/// Suffix of the size constant that accompanies byte arrays.
pub const SIZE_SUFFIX: &str = "_size";

/// Render one declaration.
///
/// `identifier` is legalized again (legalization is idempotent) and
/// uppercased for macros. `byte_len` is the size of the original content.
pub fn render(
    identifier: &str,
    encoded_body: &str,
    byte_len: usize,
    style: EncodingStyle,
    placement: &Placement,
) -> Result<Declaration> {
    let (identifier, placement) = match style {
        EncodingStyle::PreprocessorDefine => {
            if placement.is_namespaced() {
                tracing::warn!(
                    identifier,
                    namespace = %placement.namespace_path.join("::"),
                    "macros have no namespace; defining at file scope"
                );
            }
            (macro_name(identifier), placement.at_file_scope())
        }
        _ => {
            validate_namespace(placement)?;
            (legalize(identifier), placement.clone())
        }
    };

    let statement = match style {
        EncodingStyle::StringLiteral => {
            render_string_literal(&identifier, encoded_body, byte_len, &placement)
        }
        EncodingStyle::TypedConstant => {
            render_typed_constant(&identifier, encoded_body, byte_len, &placement)
        }
        EncodingStyle::ByteArray => {
            render_byte_array(&identifier, encoded_body, byte_len, &placement)
        }
        EncodingStyle::PreprocessorDefine => render_define(&identifier, encoded_body),
    };

    let mut rendered = namespace_open(&placement);
    rendered.push_str(&statement);
    rendered.push('\n');

    tracing::debug!(
        identifier = %identifier,
        style = %style,
        bytes = byte_len,
        "rendered declaration"
    );

    Ok(Declaration {
        identifier,
        style,
        encoded_body: encoded_body.to_string(),
        placement,
        byte_len,
        source_name: String::new(),
        rendered,
    })
}

/// Every symbol a declaration introduces into its scope.
///
/// Byte arrays also define `<identifier>_size`.
pub fn declared_symbols(declaration: &Declaration) -> Vec<String> {
    let mut symbols = vec![declaration.qualified_name()];
    if declaration.style == EncodingStyle::ByteArray {
        symbols.push(
            declaration
                .placement
                .qualify(&format!("{}{SIZE_SUFFIX}", declaration.identifier)),
        );
    }
    symbols
}

/// `namespace a {` … lines for a placement, outermost first.
pub fn namespace_open(placement: &Placement) -> String {
    placement
        .namespace_path
        .iter()
        .map(|segment| format!("namespace {segment} {{\n"))
        .collect()
}

/// Closing lines matching [`namespace_open`], innermost first.
pub fn namespace_close(placement: &Placement) -> String {
    placement
        .namespace_path
        .iter()
        .rev()
        .map(|segment| format!("}} // namespace {segment}\n"))
        .collect()
}

fn validate_namespace(placement: &Placement) -> Result<()> {
    match placement
        .namespace_path
        .iter()
        .find(|segment| !is_identifier(segment))
    {
        Some(bad) => Err(EmbedError::InvalidNamespaceSegment(bad.clone())),
        None => Ok(()),
    }
}

fn linkage(placement: &Placement) -> &'static str {
    if placement.is_multi {
        "inline "
    } else {
        ""
    }
}

/// Indent every line after the first.
fn indent_continuations(body: &str) -> String {
    body.replace('\n', &format!("\n{INDENT}"))
}

fn render_string_literal(id: &str, body: &str, len: usize, placement: &Placement) -> String {
    format!(
        "{}const char {id}[{}] = {};",
        linkage(placement),
        len + 1,
        indent_continuations(body)
    )
}

fn render_typed_constant(id: &str, body: &str, len: usize, placement: &Placement) -> String {
    format!(
        "{}constexpr std::string_view {id}{{{}, {len}}};",
        linkage(placement),
        indent_continuations(body)
    )
}

fn render_byte_array(id: &str, body: &str, len: usize, placement: &Placement) -> String {
    let linkage = linkage(placement);
    // Zero-length arrays are ill-formed; keep one padding element.
    let values = if len == 0 {
        "{0}".to_string()
    } else {
        format!("{{\n{INDENT}{}\n}}", indent_continuations(body))
    };
    format!(
        "{linkage}constexpr unsigned char {id}[{}] = {values};\n\
         {linkage}constexpr std::size_t {id}{SIZE_SUFFIX} = {len};",
        len.max(1)
    )
}

fn render_define(id: &str, body: &str) -> String {
    format!("#define {id} {}", indent_continuations(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    fn render_bytes(bytes: &[u8], style: EncodingStyle, placement: &Placement) -> Declaration {
        render("data", &encode(bytes, style), bytes.len(), style, placement).unwrap()
    }

    #[test]
    fn string_literal_declares_explicit_length() {
        let decl = render_bytes(b"A\0B", EncodingStyle::StringLiteral, &Placement::root());
        assert_eq!(decl.rendered, "const char data[4] = \"A\\000B\";\n");
    }

    #[test]
    fn typed_constant_uses_string_view() {
        let decl = render_bytes(b"hi", EncodingStyle::TypedConstant, &Placement::root());
        assert_eq!(decl.rendered, "constexpr std::string_view data{\"hi\", 2};\n");
    }

    #[test]
    fn byte_array_declares_size() {
        let decl = render_bytes(b"A\0B", EncodingStyle::ByteArray, &Placement::root());
        assert_eq!(
            decl.rendered,
            "constexpr unsigned char data[3] = {\n    65, 0, 66\n};\n\
             constexpr std::size_t data_size = 3;\n"
        );
    }

    #[test]
    fn empty_byte_array_keeps_padding_element() {
        let decl = render_bytes(b"", EncodingStyle::ByteArray, &Placement::root());
        assert!(decl.rendered.contains("data[1] = {0};"));
        assert!(decl.rendered.contains("data_size = 0;"));
    }

    #[test]
    fn define_is_uppercase_and_ignores_namespace() {
        let placement = Placement::from_path("application::detail");
        let decl = render_bytes(b"1.2.3", EncodingStyle::PreprocessorDefine, &placement);
        assert_eq!(decl.identifier, "DATA");
        assert!(!decl.placement.is_namespaced());
        assert_eq!(decl.rendered, "#define DATA \"1.2.3\"\n");
    }

    #[test]
    fn namespaces_open_outermost_first() {
        let placement = Placement::from_path("application::detail");
        let decl = render_bytes(b"x", EncodingStyle::TypedConstant, &placement);
        assert!(decl
            .rendered
            .starts_with("namespace application {\nnamespace detail {\n"));
        assert_eq!(
            namespace_close(&placement),
            "} // namespace detail\n} // namespace application\n"
        );
        assert_eq!(decl.qualified_name(), "application::detail::data");
    }

    #[test]
    fn multi_declarations_are_inline() {
        let placement = Placement::root().multi(true);
        let decl = render_bytes(b"x", EncodingStyle::StringLiteral, &placement);
        assert!(decl.rendered.starts_with("inline const char data[2]"));
        let decl = render_bytes(b"x", EncodingStyle::PreprocessorDefine, &placement);
        assert!(decl.rendered.starts_with("#define DATA"));
    }

    #[test]
    fn invalid_namespace_segment_is_rejected() {
        let placement = Placement::in_namespace(["ok", "not-ok"]);
        let err = render("data", "\"x\"", 1, EncodingStyle::StringLiteral, &placement).unwrap_err();
        assert_eq!(err, EmbedError::InvalidNamespaceSegment("not-ok".into()));
    }

    #[test]
    fn byte_arrays_declare_size_symbol() {
        let decl = render_bytes(b"x", EncodingStyle::ByteArray, &Placement::from_path("ns"));
        assert_eq!(declared_symbols(&decl), vec!["ns::data", "ns::data_size"]);
    }
}
