//! Content encoding: raw bytes → embeddable literal text.
//!
//! String styles share one escaping scheme:
//! - printable ASCII is copied, except `"`, `\` and `?` which are escaped
//!   (`?` so that no trigraph can form);
//! - newline, tab and carriage return use their short escapes;
//! - every other byte, NUL included, is a three-digit octal escape, which can
//!   never absorb a following digit.
//!
//! The literal is split into adjacent string literals after each escaped
//! newline. Adjacent literals concatenate, so the runtime value is unchanged.
//! Macro bodies join the pieces with a line continuation so the `#define`
//! stays one logical line.
//!
//! Byte arrays are comma-separated decimal numerals.
//!
//! [`decode`] inverts [`encode`] for every style.

use embedgen_types::{EmbedError, EncodingStyle, Result};

/// Default number of values per line in byte-array bodies.
pub const DEFAULT_BYTES_PER_LINE: usize = 16;

/// Separator between adjacent literals in string and typed-constant bodies.
const LITERAL_JOINER: &str = "\n";

/// Separator between adjacent literals in macro bodies.
const MACRO_JOINER: &str = " \\\n";

/// Tunables for [`encode_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Byte-array values per output line; `0` keeps all values on one line.
    pub bytes_per_line: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            bytes_per_line: DEFAULT_BYTES_PER_LINE,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Encoding
// ══════════════════════════════════════════════════════════════════════════════

/// Encode `bytes` for `style` with default options.
pub fn encode(bytes: &[u8], style: EncodingStyle) -> String {
    encode_with(bytes, style, &EncodeOptions::default())
}

/// Encode `bytes` for `style`.
pub fn encode_with(bytes: &[u8], style: EncodingStyle, options: &EncodeOptions) -> String {
    match style {
        EncodingStyle::StringLiteral | EncodingStyle::TypedConstant => {
            encode_literal(bytes, LITERAL_JOINER)
        }
        EncodingStyle::PreprocessorDefine => encode_literal(bytes, MACRO_JOINER),
        EncodingStyle::ByteArray => encode_byte_list(bytes, options.bytes_per_line),
    }
}

fn encode_literal(bytes: &[u8], joiner: &str) -> String {
    // Most input is printable; reserve a little headroom for escapes.
    let mut out = String::with_capacity(bytes.len() + bytes.len() / 8 + 2);
    out.push('"');
    for (i, &b) in bytes.iter().enumerate() {
        push_escaped(&mut out, b);
        if b == b'\n' && i + 1 < bytes.len() {
            out.push('"');
            out.push_str(joiner);
            out.push('"');
        }
    }
    out.push('"');
    out
}

fn push_escaped(out: &mut String, b: u8) {
    match b {
        b'"' => out.push_str("\\\""),
        b'\\' => out.push_str("\\\\"),
        b'?' => out.push_str("\\?"),
        b'\n' => out.push_str("\\n"),
        b'\t' => out.push_str("\\t"),
        b'\r' => out.push_str("\\r"),
        0x20..=0x7e => out.push(b as char),
        _ => {
            out.push('\\');
            out.push(char::from(b'0' + (b >> 6)));
            out.push(char::from(b'0' + ((b >> 3) & 0o7)));
            out.push(char::from(b'0' + (b & 0o7)));
        }
    }
}

fn encode_byte_list(bytes: &[u8], per_line: usize) -> String {
    let per_line = if per_line == 0 {
        bytes.len().max(1)
    } else {
        per_line
    };
    bytes
        .chunks(per_line)
        .map(|chunk| {
            chunk
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

// ══════════════════════════════════════════════════════════════════════════════
// Decoding
// ══════════════════════════════════════════════════════════════════════════════

/// Recover the original bytes from an encoded (or rendered) body.
///
/// Whitespace between literals or values, including indentation added by
/// the renderer, is ignored.
pub fn decode(body: &str, style: EncodingStyle) -> Result<Vec<u8>> {
    match style {
        EncodingStyle::ByteArray => decode_byte_list(body),
        _ => LiteralReader::new(body).read_all(),
    }
}

fn decode_byte_list(body: &str) -> Result<Vec<u8>> {
    body.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let parsed = match item.strip_prefix("0x").or_else(|| item.strip_prefix("0X")) {
                Some(hex) => u8::from_str_radix(hex, 16),
                None => item.parse::<u8>(),
            };
            parsed.map_err(|_| EmbedError::MalformedBody(format!("invalid byte value `{item}`")))
        })
        .collect()
}

/// Reads a sequence of adjacent C string literals.
struct LiteralReader<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> LiteralReader<'a> {
    fn new(body: &'a str) -> Self {
        Self {
            src: body.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn malformed(&self, what: &str) -> EmbedError {
        EmbedError::MalformedBody(format!("{what} at offset {}", self.pos))
    }

    fn read_all(mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut literals = 0usize;
        loop {
            self.skip_separators();
            match self.peek() {
                None => break,
                Some(b'"') => {
                    self.pos += 1;
                    self.read_literal(&mut out)?;
                    literals += 1;
                }
                Some(_) => return Err(self.malformed("expected string literal")),
            }
        }
        if literals == 0 {
            return Err(self.malformed("no string literal"));
        }
        Ok(out)
    }

    /// Skip whitespace and line continuations between literals.
    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'\\' if matches!(self.src.get(self.pos + 1), Some(b'\n' | b'\r')) => {
                    self.pos += 1
                }
                _ => break,
            }
        }
    }

    fn read_literal(&mut self, out: &mut Vec<u8>) -> Result<()> {
        loop {
            match self.bump() {
                None => return Err(self.malformed("unterminated string literal")),
                Some(b'"') => return Ok(()),
                Some(b'\n') => return Err(self.malformed("raw newline in string literal")),
                Some(b'\\') => {
                    let b = self.read_escape()?;
                    out.push(b);
                }
                Some(b) => out.push(b),
            }
        }
    }

    fn read_escape(&mut self) -> Result<u8> {
        let Some(c) = self.bump() else {
            return Err(self.malformed("dangling backslash"));
        };
        let b = match c {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'\\' | b'"' | b'\'' | b'?' => c,
            b'0'..=b'7' => {
                let mut value = u32::from(c - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                u8::try_from(value).map_err(|_| self.malformed("octal escape out of range"))?
            }
            b'x' => {
                let start = self.pos;
                while self.peek().is_some_and(|d| d.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
                let digits = std::str::from_utf8(&self.src[start..self.pos])
                    .map_err(|_| self.malformed("invalid hex escape"))?;
                u8::from_str_radix(digits, 16)
                    .map_err(|_| self.malformed("invalid hex escape"))?
            }
            _ => return Err(self.malformed("unknown escape")),
        };
        Ok(b)
    }
}
