//! Emission: output unit → header text.
//!
//! ```text
//! // Generated by embedgen. Do not edit.
//! #ifndef TOKEN
//! #define TOKEN
//!
//! #include <cstddef>
//! #include <string_view>
//!
//! <declaration>
//! <namespace closings>
//!
//! #endif // TOKEN
//! ```
//!
//! Purely textual: the aggregator has already rejected duplicate keys.

use embedgen_codegen::namespace_close;
use embedgen_types::{Declaration, EncodingStyle, OutputUnit};

use crate::config::{EmbedConfig, GuardStyle};

/// First line of every generated header when the banner is enabled.
pub const BANNER: &str = "// Generated by embedgen. Do not edit.";

/// Emit `unit` with the default configuration.
pub fn emit(unit: &OutputUnit) -> String {
    emit_with(unit, &EmbedConfig::default())
}

/// Emit `unit` as a complete header.
pub fn emit_with(unit: &OutputUnit, config: &EmbedConfig) -> String {
    let mut out = String::new();
    let token = &unit.include_guard_token;

    if config.banner {
        out.push_str(BANNER);
        out.push('\n');
    }

    match config.guard {
        GuardStyle::Ifndef => {
            out.push_str(&format!("#ifndef {token}\n#define {token}\n"));
        }
        GuardStyle::PragmaOnce => out.push_str("#pragma once\n"),
    }

    let includes = required_includes(unit);
    if !includes.is_empty() {
        out.push('\n');
        for include in includes {
            out.push_str(&format!("#include <{include}>\n"));
        }
    }

    for declaration in &unit.declarations {
        out.push('\n');
        emit_declaration(&mut out, declaration);
    }

    if config.guard == GuardStyle::Ifndef {
        out.push_str(&format!("\n#endif // {token}\n"));
    }
    out
}

fn emit_declaration(out: &mut String, declaration: &Declaration) {
    if declaration.placement.is_multi {
        out.push_str(&format!(
            "// {} ({})\n",
            comment_safe(&declaration.source_name),
            byte_count(declaration.byte_len)
        ));
    }
    out.push_str(&declaration.rendered);
    out.push_str(&namespace_close(&declaration.placement));
}

/// Standard headers needed by the declarations in `unit`.
fn required_includes(unit: &OutputUnit) -> Vec<&'static str> {
    let mut includes = Vec::new();
    if unit.uses_style(EncodingStyle::ByteArray) {
        includes.push("cstddef");
    }
    if unit.uses_style(EncodingStyle::TypedConstant) {
        includes.push("string_view");
    }
    includes
}

fn byte_count(len: usize) -> String {
    match len {
        1 => "1 byte".to_string(),
        n => format!("{n} bytes"),
    }
}

/// Keep a resource name from ending or continuing a `//` comment.
fn comment_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' => '/',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use embedgen_codegen::{encode, render};
    use embedgen_types::Placement;

    fn unit_of(items: &[(&str, EncodingStyle, Placement)]) -> OutputUnit {
        let declarations = items
            .iter()
            .map(|(id, style, placement)| {
                render(id, &encode(b"v", *style), 1, *style, placement)
                    .unwrap()
                    .with_source(format!("{id}.txt"))
            })
            .collect();
        aggregate(declarations, "resources.h").unwrap()
    }

    #[test]
    fn empty_unit_is_just_the_guard() {
        let unit = unit_of(&[]);
        assert_eq!(
            emit(&unit),
            "// Generated by embedgen. Do not edit.\n\
             #ifndef RESOURCES_H\n#define RESOURCES_H\n\
             \n#endif // RESOURCES_H\n"
        );
    }

    #[test]
    fn single_declaration_layout() {
        let unit = unit_of(&[("greeting", EncodingStyle::StringLiteral, Placement::root())]);
        assert_eq!(
            emit(&unit),
            "// Generated by embedgen. Do not edit.\n\
             #ifndef RESOURCES_H\n#define RESOURCES_H\n\
             \nconst char greeting[2] = \"v\";\n\
             \n#endif // RESOURCES_H\n"
        );
    }

    #[test]
    fn includes_follow_styles() {
        let unit = unit_of(&[
            ("a", EncodingStyle::ByteArray, Placement::root()),
            ("b", EncodingStyle::TypedConstant, Placement::root()),
        ]);
        let text = emit(&unit);
        assert!(text.contains("#include <cstddef>\n#include <string_view>\n"));

        let unit = unit_of(&[("c", EncodingStyle::PreprocessorDefine, Placement::root())]);
        assert!(!emit(&unit).contains("#include"));
    }

    #[test]
    fn namespace_closes_after_each_declaration() {
        let unit = unit_of(&[
            ("a", EncodingStyle::StringLiteral, Placement::from_path("app::detail")),
            ("b", EncodingStyle::StringLiteral, Placement::root()),
        ]);
        let text = emit(&unit);
        assert!(text.contains(
            "namespace app {\nnamespace detail {\nconst char a[2] = \"v\";\n\
             } // namespace detail\n} // namespace app\n\nconst char b[2]"
        ));
    }

    #[test]
    fn pragma_once_without_banner() {
        let config = EmbedConfig {
            guard: GuardStyle::PragmaOnce,
            banner: false,
            ..EmbedConfig::default()
        };
        let unit = unit_of(&[("a", EncodingStyle::PreprocessorDefine, Placement::root())]);
        assert_eq!(emit_with(&unit, &config), "#pragma once\n\n#define A \"v\"\n");
    }

    #[test]
    fn multi_declarations_carry_provenance() {
        let unit = unit_of(&[("a", EncodingStyle::StringLiteral, Placement::root().multi(true))]);
        assert!(emit(&unit).contains("// a.txt (1 byte)\ninline const char a[2]"));
    }

    #[test]
    fn byte_counts_are_pluralized() {
        assert_eq!(byte_count(0), "0 bytes");
        assert_eq!(byte_count(1), "1 byte");
        assert_eq!(byte_count(42), "42 bytes");
    }

    #[test]
    fn comment_safe_neutralizes_continuations() {
        assert_eq!(comment_safe("dir\\name\n"), "dir/name ");
    }
}
