//! embedgen code generator: turns one resource into one C++ declaration.
//!
//! # Architecture
//!
//! ```text
//! name  ──→ legalize ──┐
//!                      ├─→ render ──→ Declaration
//! bytes ──→ encode  ───┘
//! ```
//!
//! All three stages are pure functions with no shared state, so independent
//! resources may be processed in any order or in parallel. Collision checking
//! and header assembly happen later, in `embedgen-compiler`.
//!
//! ## Styles
//!
//! - `StringLiteral` — `const char name[N + 1]`, length known without a
//!   terminator scan
//! - `TypedConstant` — `constexpr std::string_view` with explicit length
//! - `ByteArray` — `constexpr unsigned char[]` plus `name_size`
//! - `PreprocessorDefine` — object-like macro, always at file scope

pub mod encoder;
pub mod legalize;
pub mod renderer;

pub use embedgen_types::{EmbedError, Result};
pub use encoder::{decode, encode, encode_with, EncodeOptions, DEFAULT_BYTES_PER_LINE};
pub use legalize::{
    guard_token, is_identifier, legalize, legalize_name, macro_name, Legalized,
    PLACEHOLDER_IDENTIFIER,
};
pub use renderer::{declared_symbols, namespace_close, namespace_open, render};
