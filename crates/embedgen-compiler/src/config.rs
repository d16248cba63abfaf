//! Output configuration.

use embedgen_codegen::{EncodeOptions, DEFAULT_BYTES_PER_LINE};
use serde::{Deserialize, Serialize};

/// Once-only inclusion mechanism for the generated header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardStyle {
    /// `#ifndef TOKEN` / `#define TOKEN` / `#endif`.
    #[default]
    Ifndef,
    /// `#pragma once`.
    PragmaOnce,
}

/// Knobs for header generation. Every field has a default, so partial JSON
/// such as `{"guard": "pragma_once"}` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub guard: GuardStyle,
    /// Byte-array values per line; `0` keeps each array on one line.
    pub bytes_per_line: usize,
    /// Emit the "generated file" banner comment.
    pub banner: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            guard: GuardStyle::Ifndef,
            bytes_per_line: DEFAULT_BYTES_PER_LINE,
            banner: true,
        }
    }
}

impl EmbedConfig {
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            bytes_per_line: self.bytes_per_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: EmbedConfig = serde_json::from_str(r#"{"guard": "pragma_once"}"#).unwrap();
        assert_eq!(config.guard, GuardStyle::PragmaOnce);
        assert_eq!(config.bytes_per_line, DEFAULT_BYTES_PER_LINE);
        assert!(config.banner);
    }

    #[test]
    fn empty_json_is_default() {
        let config: EmbedConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EmbedConfig::default());
    }
}
