//! Aggregation: rendered declarations → one collision-free output unit.

use std::collections::HashMap;

use embedgen_codegen::{declared_symbols, guard_token};
use embedgen_types::{Declaration, EmbedError, EncodingStyle, OutputUnit, Result};

/// Label used for the include guard in collision reports.
pub const GUARD_OWNER: &str = "<include guard>";

/// Combine `declarations` into one [`OutputUnit`], keeping their order.
///
/// Every symbol a declaration introduces (including a byte array's
/// `_size` constant) must be unique by its fully-qualified name. Macros are
/// not scoped, so a macro name must also differ from the include guard
/// token and from every unqualified name and namespace segment used by the
/// other declarations. The first clash aborts the whole aggregation;
/// nothing is dropped or renamed.
///
/// The include guard token is derived from `seed`, usually the output
/// file name.
pub fn aggregate(declarations: Vec<Declaration>, seed: &str) -> Result<OutputUnit> {
    let include_guard_token = guard_token(seed);
    check_qualified_names(&declarations)?;
    check_macro_names(&declarations, &include_guard_token)?;

    tracing::debug!(
        guard = %include_guard_token,
        declarations = declarations.len(),
        "aggregated output unit"
    );

    Ok(OutputUnit {
        declarations,
        include_guard_token,
    })
}

fn check_qualified_names(declarations: &[Declaration]) -> Result<()> {
    let mut owners: HashMap<String, usize> = HashMap::new();

    for (index, declaration) in declarations.iter().enumerate() {
        for symbol in declared_symbols(declaration) {
            if let Some(&first) = owners.get(&symbol) {
                return Err(EmbedError::IdentifierCollision {
                    key: symbol,
                    first_index: first,
                    first_name: display_name(&declarations[first]),
                    second_index: index,
                    second_name: display_name(declaration),
                });
            }
            owners.insert(symbol, index);
        }
    }
    Ok(())
}

/// Reject macro names that would rewrite the guard or another declaration.
fn check_macro_names(declarations: &[Declaration], guard: &str) -> Result<()> {
    // Unqualified spellings of every non-macro name, with their first owner.
    let mut spellings: HashMap<String, usize> = HashMap::new();
    for (index, declaration) in declarations.iter().enumerate() {
        if declaration.style == EncodingStyle::PreprocessorDefine {
            continue;
        }
        let names = declared_symbols(declaration)
            .into_iter()
            .map(|symbol| unqualified(&symbol).to_string())
            .chain(declaration.placement.namespace_path.iter().cloned());
        for name in names {
            spellings.entry(name).or_insert(index);
        }
    }

    if let Some(&index) = spellings.get(guard) {
        return Err(guard_collision(guard, index, &declarations[index]));
    }

    for (index, declaration) in declarations.iter().enumerate() {
        if declaration.style != EncodingStyle::PreprocessorDefine {
            continue;
        }
        if declaration.identifier == guard {
            return Err(guard_collision(guard, index, declaration));
        }
        if let Some(&other) = spellings.get(&declaration.identifier) {
            let (first, second) = (other.min(index), other.max(index));
            return Err(EmbedError::IdentifierCollision {
                key: declaration.identifier.clone(),
                first_index: first,
                first_name: display_name(&declarations[first]),
                second_index: second,
                second_name: display_name(&declarations[second]),
            });
        }
    }
    Ok(())
}

/// The include guard has no resource index; both sides name the declaration.
fn guard_collision(guard: &str, index: usize, declaration: &Declaration) -> EmbedError {
    EmbedError::IdentifierCollision {
        key: guard.to_string(),
        first_index: index,
        first_name: GUARD_OWNER.to_string(),
        second_index: index,
        second_name: display_name(declaration),
    }
}

fn unqualified(symbol: &str) -> &str {
    symbol.rsplit("::").next().unwrap_or(symbol)
}

fn display_name(declaration: &Declaration) -> String {
    if declaration.source_name.is_empty() {
        declaration.identifier.clone()
    } else {
        declaration.source_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedgen_codegen::{encode, render};
    use embedgen_types::Placement;

    fn decl(identifier: &str, style: EncodingStyle, placement: Placement, source: &str) -> Declaration {
        render(identifier, &encode(b"x", style), 1, style, &placement)
            .unwrap()
            .with_source(source)
    }

    #[test]
    fn preserves_order() {
        let unit = aggregate(
            vec![
                decl("b", EncodingStyle::StringLiteral, Placement::root(), "b.txt"),
                decl("a", EncodingStyle::ByteArray, Placement::root(), "a.txt"),
            ],
            "out.h",
        )
        .unwrap();
        let names: Vec<_> = unit.declarations.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(unit.include_guard_token, "OUT_H");
    }

    #[test]
    fn same_identifier_in_different_namespaces_is_fine() {
        let unit = aggregate(
            vec![
                decl("logo", EncodingStyle::StringLiteral, Placement::from_path("a"), "1"),
                decl("logo", EncodingStyle::StringLiteral, Placement::from_path("b"), "2"),
            ],
            "out.h",
        );
        assert!(unit.is_ok());
    }

    #[test]
    fn collision_reports_both_resources() {
        let err = aggregate(
            vec![
                decl("logo", EncodingStyle::StringLiteral, Placement::from_path("app"), "logo.png"),
                decl("other", EncodingStyle::TypedConstant, Placement::root(), "other.txt"),
                decl("logo", EncodingStyle::ByteArray, Placement::from_path("app"), "logo.svg"),
            ],
            "out.h",
        )
        .unwrap_err();
        assert_eq!(
            err,
            EmbedError::IdentifierCollision {
                key: "app::logo".into(),
                first_index: 0,
                first_name: "logo.png".into(),
                second_index: 2,
                second_name: "logo.svg".into(),
            }
        );
    }

    #[test]
    fn size_constant_participates_in_collisions() {
        let err = aggregate(
            vec![
                decl("data", EncodingStyle::ByteArray, Placement::root(), "data.bin"),
                decl("data_size", EncodingStyle::StringLiteral, Placement::root(), "data_size.txt"),
            ],
            "out.h",
        )
        .unwrap_err();
        assert!(matches!(err, EmbedError::IdentifierCollision { ref key, .. } if key == "data_size"));
    }

    #[test]
    fn macro_matching_guard_is_rejected() {
        let err = aggregate(
            vec![decl("resources_h", EncodingStyle::PreprocessorDefine, Placement::root(), "r")],
            "resources.h",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EmbedError::IdentifierCollision { ref key, ref first_name, .. }
                if key == "RESOURCES_H" && first_name == GUARD_OWNER
        ));
    }

    #[test]
    fn variable_matching_guard_is_rejected() {
        let err = aggregate(
            vec![decl("OUT_H", EncodingStyle::StringLiteral, Placement::from_path("ns"), "o")],
            "out.h",
        )
        .unwrap_err();
        assert!(matches!(err, EmbedError::IdentifierCollision { ref key, .. } if key == "OUT_H"));
    }

    #[test]
    fn macro_rewriting_namespaced_name_is_rejected() {
        let err = aggregate(
            vec![
                decl("LOGO", EncodingStyle::StringLiteral, Placement::from_path("app"), "logo.txt"),
                decl("logo", EncodingStyle::PreprocessorDefine, Placement::root(), "logo.def"),
            ],
            "out.h",
        )
        .unwrap_err();
        assert_eq!(
            err,
            EmbedError::IdentifierCollision {
                key: "LOGO".into(),
                first_index: 0,
                first_name: "logo.txt".into(),
                second_index: 1,
                second_name: "logo.def".into(),
            }
        );
    }

    #[test]
    fn macro_rewriting_byte_array_or_namespace_is_rejected() {
        let array = aggregate(
            vec![
                decl("BLOB", EncodingStyle::ByteArray, Placement::from_path("ns"), "blob.bin"),
                decl("blob", EncodingStyle::PreprocessorDefine, Placement::root(), "blob.def"),
            ],
            "out.h",
        );
        assert!(matches!(array, Err(EmbedError::IdentifierCollision { ref key, .. }) if key == "BLOB"));

        let namespace = aggregate(
            vec![
                decl("x", EncodingStyle::StringLiteral, Placement::from_path("APP"), "x"),
                decl("app", EncodingStyle::PreprocessorDefine, Placement::root(), "app"),
            ],
            "out.h",
        );
        assert!(namespace.is_err());
    }

    #[test]
    fn macro_and_variable_with_different_case_do_not_collide() {
        let unit = aggregate(
            vec![
                decl("version", EncodingStyle::StringLiteral, Placement::root(), "v"),
                decl("version", EncodingStyle::PreprocessorDefine, Placement::root(), "v"),
            ],
            "out.h",
        )
        .unwrap();
        assert_eq!(unit.declarations[1].identifier, "VERSION");
    }
}
