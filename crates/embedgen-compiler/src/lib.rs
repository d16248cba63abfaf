//! embedgen compiler: orchestrates the full embedding pipeline.
//!
//! ```text
//! (Resource+, style, placement, identifier)*
//!     → legalize + encode + render   (per request, independent)
//!     → aggregate                    (collision check, guard token)
//!     → emit                         → header text
//! ```
//!
//! Failures are synchronous return values. Degradations that do not stop
//! generation (placeholder identifiers, namespaces dropped from macros,
//! empty guard seeds) are logged and collected as warnings.

pub mod aggregator;
pub mod config;
pub mod emitter;
pub mod manifest;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use embedgen_codegen::{encode_with, legalize_name, render};
use embedgen_types::{
    Declaration, Diagnostic, Diagnostics, EmbedError, EncodingStyle, ErrorCode, OutputUnit,
    Placement, Resource, Result,
};

pub use aggregator::aggregate;
pub use config::{EmbedConfig, GuardStyle};
pub use emitter::{emit, emit_with};
pub use manifest::{Manifest, ManifestEntry, ManifestPart};

// ══════════════════════════════════════════════════════════════════════════════
// Requests
// ══════════════════════════════════════════════════════════════════════════════

/// Resources to embed under one identifier, with how and where to declare it.
///
/// Several resources are concatenated in order into a single body; the
/// declared length is their combined byte count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRequest {
    pub resources: Vec<Resource>,
    pub style: EncodingStyle,
    pub placement: Placement,
    /// Raw identifier; legalized during rendering.
    pub identifier: String,
}

impl EmbedRequest {
    /// Request at file scope, named after the resource's file stem.
    pub fn new(resource: Resource, style: EncodingStyle) -> Self {
        Self::concat(vec![resource], style)
    }

    /// Request embedding `resources` back to back, named after the first.
    pub fn concat(resources: Vec<Resource>, style: EncodingStyle) -> Self {
        let identifier = resources
            .first()
            .map(|resource| resource.file_stem().to_string())
            .unwrap_or_default();
        Self {
            resources,
            style,
            placement: Placement::root(),
            identifier,
        }
    }

    /// Append another resource to the concatenated body.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// The concatenated content of every resource.
    pub fn bytes(&self) -> Vec<u8> {
        self.resources
            .iter()
            .flat_map(|resource| resource.bytes.iter().copied())
            .collect()
    }

    pub fn byte_len(&self) -> usize {
        self.resources.iter().map(Resource::len).sum()
    }

    /// Resource names joined for provenance and diagnostics.
    pub fn source_name(&self) -> String {
        self.resources
            .iter()
            .map(|resource| resource.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether more than one resource feeds this declaration.
    pub fn is_concatenation(&self) -> bool {
        self.resources.len() > 1
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Results
// ══════════════════════════════════════════════════════════════════════════════

/// Successful pipeline output.
#[derive(Debug, Clone)]
pub struct Embedded {
    pub header: String,
    pub unit: OutputUnit,
    pub diagnostics: Diagnostics,
}

/// Serializable outcome for build tooling.
///
/// On failure `success` is `false`, `header` and `sha256` are `null`, and
/// `diagnostics.errors` holds the fatal error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResult {
    pub success: bool,
    pub header: Option<String>,
    /// Lowercase hex SHA-256 of `header`.
    pub sha256: Option<String>,
    pub diagnostics: Diagnostics,
}

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Embed `requests` into one header keyed by `seed`, using defaults.
pub fn embed(requests: &[EmbedRequest], seed: &str) -> Result<String> {
    embed_with(requests, seed, &EmbedConfig::default()).map(|embedded| embedded.header)
}

/// Run the full pipeline.
///
/// When more than one request is given, or a request concatenates several
/// resources, the affected declarations are placed in multi mode.
pub fn embed_with(requests: &[EmbedRequest], seed: &str, config: &EmbedConfig) -> Result<Embedded> {
    let mut diagnostics = Diagnostics::empty();
    let multi = requests.len() > 1;

    let declarations = requests
        .iter()
        .map(|request| declare(request, multi, config, &mut diagnostics))
        .collect::<Result<Vec<_>>>()?;

    if legalize_name(seed).degenerate {
        tracing::warn!(seed, "output seed has no usable characters; using placeholder guard");
        diagnostics.push_warning(
            Diagnostic::warning(
                ErrorCode::EMPTY_GUARD_SEED,
                "output seed legalizes to nothing; placeholder guard token used",
            )
            .with_subject(seed),
        );
    }

    let unit = aggregate(declarations, seed)?;
    let header = emit_with(&unit, config);

    tracing::info!(
        guard = %unit.include_guard_token,
        declarations = unit.declarations.len(),
        bytes = header.len(),
        "generated output unit"
    );

    Ok(Embedded {
        header,
        unit,
        diagnostics,
    })
}

/// Run the pipeline and package the outcome for serialization.
pub fn embed_to_result(requests: &[EmbedRequest], seed: &str, config: &EmbedConfig) -> EmbedResult {
    match embed_with(requests, seed, config) {
        Ok(embedded) => EmbedResult {
            success: true,
            sha256: Some(sha256_hex(&embedded.header)),
            header: Some(embedded.header),
            diagnostics: embedded.diagnostics,
        },
        Err(err) => failure(&err),
    }
}

/// Parse a JSON [`Manifest`] and run it.
pub fn embed_manifest(json: &str) -> EmbedResult {
    let run = Manifest::from_json(json).and_then(|manifest| {
        let requests = manifest.requests()?;
        Ok((manifest, requests))
    });
    match run {
        Ok((manifest, requests)) => embed_to_result(&requests, &manifest.output, &manifest.config),
        Err(err) => failure(&err),
    }
}

/// Hex SHA-256 of generated text.
pub fn sha256_hex(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

// ══════════════════════════════════════════════════════════════════════════════
// Internals
// ══════════════════════════════════════════════════════════════════════════════

fn declare(
    request: &EmbedRequest,
    multi: bool,
    config: &EmbedConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Declaration> {
    let source = request.source_name();
    tracing::info!(
        resource = %source,
        parts = request.resources.len(),
        style = %request.style,
        "defining {}",
        request.style.describe()
    );

    let legalized = legalize_name(&request.identifier);
    if legalized.degenerate {
        tracing::warn!(
            resource = %source,
            identifier = %request.identifier,
            placeholder = %legalized.identifier,
            "identifier has no usable characters"
        );
        diagnostics.push_warning(
            Diagnostic::warning(
                ErrorCode::DEGENERATE_IDENTIFIER,
                format!(
                    "identifier `{}` legalizes to nothing; using `{}`",
                    request.identifier, legalized.identifier
                ),
            )
            .with_subject(&source),
        );
    }

    if !request.style.supports_namespace() && request.placement.is_namespaced() {
        diagnostics.push_warning(
            Diagnostic::warning(
                ErrorCode::NAMESPACE_IGNORED,
                format!(
                    "namespace `{}` ignored: {} is always declared at file scope",
                    request.placement.namespace_path.join("::"),
                    request.style.describe()
                ),
            )
            .with_subject(&source),
        );
    }

    let is_multi = request.placement.is_multi || multi || request.is_concatenation();
    let placement = request.placement.clone().multi(is_multi);
    let body = encode_with(&request.bytes(), request.style, &config.encode_options());
    let declaration = render(
        &legalized.identifier,
        &body,
        request.byte_len(),
        request.style,
        &placement,
    )?;
    Ok(declaration.with_source(source))
}

fn failure(err: &EmbedError) -> EmbedResult {
    let mut diagnostics = Diagnostics::empty();
    diagnostics.push_error(Diagnostic::from_error(err));
    EmbedResult {
        success: false,
        header: None,
        sha256: None,
        diagnostics,
    }
}
