//! Explicit decode/encode settings.
//!
//! Behaviour is configured per call by value; the codec holds no global state.

/// Default nesting limit for objects and arrays combined.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum nesting depth; the root object is depth 1.
    pub max_depth: usize,
    /// Maximum source length in bytes, unlimited when `None`.
    pub max_input_len: Option<usize>,
}

impl DecodeOptions {
    /// Tight limits for documents from untrusted sources.
    pub const fn strict() -> Self {
        Self {
            max_depth: 32,
            max_input_len: Some(1024 * 1024),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = Some(max_input_len);
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

/// Output layout for the canonical serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Per-level indent unit; `None` selects the compact single-line form.
    pub indent: Option<String>,
    /// Write `BigInt` values as `BN(...)` instead of plain decimal, so they
    /// decode back as `BigInt` rather than `Number`.
    pub bigint_constructor: bool,
}

impl EncodeOptions {
    /// Compact canonical form.
    pub fn compact() -> Self {
        Self::default()
    }

    /// Multi-line form with the given indent unit.
    pub fn pretty(indent: impl Into<String>) -> Self {
        Self {
            indent: Some(indent.into()),
            bigint_constructor: false,
        }
    }

    pub fn with_bigint_constructor(mut self, enabled: bool) -> Self {
        self.bigint_constructor = enabled;
        self
    }
}
