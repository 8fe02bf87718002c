//! Configuration errors raised while loading and resolving presets.

use thiserror::Error;

use crate::Factor;

/// Errors raised by preset configuration.
///
/// A configuration error is fatal for the preset it concerns; callers
/// processing several presets carry on with the others.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    /// The preset document could not be found.
    #[error("preset configuration not found at {location}")]
    MissingDocument {
        /// Where the document was expected.
        location: String,
    },
    /// The document is not valid JSON or lacks the `presets` mapping.
    #[cfg(feature = "serde")]
    #[error("preset configuration is malformed")]
    Malformed {
        /// Source error from `serde_json`.
        #[source]
        source: std::sync::Arc<serde_json::Error>,
    },
    /// One preset entry has the wrong shape.
    #[cfg(feature = "serde")]
    #[error("preset '{key}' is malformed")]
    MalformedPreset {
        /// Key of the entry in the document.
        key: String,
        /// Source error from `serde_json`.
        #[source]
        source: std::sync::Arc<serde_json::Error>,
    },
    /// A preset weights a factor the engine does not know.
    #[error("preset {preset} references unknown factor '{name}'")]
    UnknownFactor {
        /// Preset identifier.
        preset: String,
        /// Unrecognised factor name.
        name: String,
    },
    /// A weight is negative or not finite.
    #[error("preset {preset} gives {factor} the invalid weight {weight}")]
    InvalidWeight {
        /// Preset identifier.
        preset: String,
        /// Affected factor.
        factor: Factor,
        /// Rejected weight.
        weight: f32,
    },
    /// Two presets share an identifier.
    #[error("preset id {id} is defined more than once")]
    DuplicatePreset {
        /// Repeated identifier.
        id: String,
    },
    /// No preset has the requested identifier.
    #[error("unknown preset id {id}")]
    UnknownPreset {
        /// Requested identifier.
        id: String,
    },
}
