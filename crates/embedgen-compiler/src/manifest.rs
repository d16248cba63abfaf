//! JSON manifests describing a whole embedding run.
//!
//! ```json
//! {
//!   "output": "resources.h",
//!   "config": { "guard": "pragma_once" },
//!   "resources": [
//!     { "name": "version.txt", "style": "define_constant", "content": "1.2.3" },
//!     { "name": "logo.png", "style": "byte_array", "namespace": "app::detail",
//!       "bytes": [137, 80, 78, 71] },
//!     { "name": "licenses", "style": "const_char", "parts": [
//!       { "name": "MIT.txt", "content": "..." },
//!       { "name": "APACHE.txt", "content": "..." }
//!     ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use embedgen_types::model::file_stem;
use embedgen_types::{EmbedError, EncodingStyle, Placement, Resource, Result};

use crate::config::EmbedConfig;
use crate::EmbedRequest;

/// A complete run: output seed, configuration and resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Seed for the include guard, usually the output file name.
    pub output: String,
    #[serde(default)]
    pub config: EmbedConfig,
    pub resources: Vec<ManifestEntry>,
}

/// One declaration in a manifest.
///
/// Its content is either inline (exactly one of `content` and `bytes`) or
/// the concatenation of `parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    /// Defaults to the file stem of `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Style name; aliases such as `constexpr_auto` are accepted.
    pub style: String,
    /// `a::b` namespace path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// UTF-8 text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Raw byte content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,
    /// Resources embedded back to back under this entry's identifier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ManifestPart>,
}

/// One resource of a concatenated entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPart {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,
}

impl Manifest {
    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Turn every entry into an [`EmbedRequest`], in manifest order.
    pub fn requests(&self) -> Result<Vec<EmbedRequest>> {
        self.resources.iter().map(ManifestEntry::to_request).collect()
    }
}

impl ManifestEntry {
    fn to_request(&self) -> Result<EmbedRequest> {
        let style: EncodingStyle = self.style.parse()?;
        let resources = if self.parts.is_empty() {
            vec![resource(&self.name, &self.content, &self.bytes)?]
        } else if self.content.is_some() || self.bytes.is_some() {
            return Err(EmbedError::ManifestInvalid(format!(
                "resource `{}` sets `parts` together with inline content",
                self.name
            )));
        } else {
            self.parts
                .iter()
                .map(|part| resource(&part.name, &part.content, &part.bytes))
                .collect::<Result<Vec<_>>>()?
        };

        let identifier = match &self.identifier {
            Some(identifier) => identifier.clone(),
            None => file_stem(&self.name).to_string(),
        };
        let mut request = EmbedRequest::concat(resources, style).with_identifier(identifier);
        if let Some(path) = &self.namespace {
            request = request.with_placement(Placement::from_path(path));
        }
        Ok(request)
    }
}

fn resource(name: &str, content: &Option<String>, bytes: &Option<Vec<u8>>) -> Result<Resource> {
    match (content, bytes) {
        (Some(text), None) => Ok(Resource::from_text(name, text)),
        (None, Some(bytes)) => Ok(Resource::new(name, bytes.clone())),
        (Some(_), Some(_)) => Err(EmbedError::ManifestInvalid(format!(
            "resource `{name}` sets both `content` and `bytes`"
        ))),
        (None, None) => Err(EmbedError::ManifestInvalid(format!(
            "resource `{name}` has neither `content` nor `bytes`"
        ))),
    }
}
