//! # Type Tags — Runtime Labels
//!
//! [`TypeTag`] is the runtime counterpart of the typestate markers in
//! `assume-chain`. It is what gets recorded next to every queued check and
//! every history event; the compile-time markers decide which methods exist,
//! this enum decides what the diagnostics say.

use serde::{Deserialize, Serialize};

/// The category a chain's subject has been narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// Not narrowed yet. Guard methods are available.
    Unknown,
    /// Narrowed to text.
    String,
    /// Narrowed to a number.
    Number,
    /// Narrowed to a sequence.
    Array,
    /// Narrowed to a record.
    Object,
    /// Narrowed to an element-like node.
    Element,
    /// Narrowed to an instant.
    #[serde(rename = "datetime")]
    DateTime,
    /// Narrowed to a boolean.
    Boolean,
    /// Narrowed to null.
    Null,
    /// Narrowed to undefined.
    Undefined,
    /// Known to be neither null nor undefined.
    Present,
}

impl TypeTag {
    /// Canonical lower-case label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::Element => "element",
            Self::DateTime => "datetime",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Present => "present",
        }
    }

    /// Whether a guard has already narrowed the chain.
    pub fn is_narrowed(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether this tag unlocks a specialized method group.
    pub fn has_specialized_group(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Number
                | Self::Array
                | Self::Object
                | Self::Element
                | Self::DateTime
        )
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
