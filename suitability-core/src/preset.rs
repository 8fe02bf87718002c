//! Named weighting profiles.
//!
//! A [`PresetRegistry`] is loaded once from configuration and never mutated
//! afterwards. Weights are kept exactly as configured: they must be finite
//! and non-negative but need not sum to one, and they are never
//! renormalized. A preset that fails validation stays in the registry as a
//! rejected entry so that only lookups of that id fail.

use crate::{ConfigurationError, Factor};

/// Weight applied to each factor by one preset, in configuration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightSet {
    weights: Vec<(Factor, f32)>,
}

impl WeightSet {
    /// Validate and collect weights for `preset`.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidWeight`] for negative or
    /// non-finite weights.
    ///
    /// # Examples
    /// ```
    /// use suitability_core::{Factor, WeightSet};
    ///
    /// let weights = WeightSet::new("A", [(Factor::Solar, 0.6), (Factor::Water, 0.6)]).unwrap();
    /// assert_eq!(weights.weight(Factor::Solar), Some(0.6));
    /// assert_eq!(weights.weight(Factor::Flood), None);
    /// ```
    pub fn new(
        preset: &str,
        weights: impl IntoIterator<Item = (Factor, f32)>,
    ) -> Result<Self, ConfigurationError> {
        let mut collected: Vec<(Factor, f32)> = Vec::new();
        for (factor, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigurationError::InvalidWeight {
                    preset: preset.to_owned(),
                    factor,
                    weight,
                });
            }
            let replaced = collected
                .iter_mut()
                .find(|(seen, _)| *seen == factor)
                .map(|entry| entry.1 = weight)
                .is_some();
            if !replaced {
                collected.push((factor, weight));
            }
        }
        Ok(Self { weights: collected })
    }

    /// Weight of `factor`, if the preset configures one.
    #[must_use]
    pub fn weight(&self, factor: Factor) -> Option<f32> {
        self.iter()
            .find_map(|(seen, weight)| (seen == factor).then_some(weight))
    }

    /// Iterate over configured weights in the order they were given.
    ///
    /// A repeated factor keeps its first position and its last weight.
    /// Combination sums terms in this order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, f32)> + '_ {
        self.weights.iter().copied()
    }

    /// Number of weighted factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Report whether no factor is weighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of the configured weights.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "reporting sums the weights")]
    pub fn total(&self) -> f32 {
        self.iter().map(|(_, weight)| weight).sum()
    }

    /// Multiply every weight by `factor`.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidWeight`] if scaling produces a
    /// negative or non-finite weight.
    #[expect(clippy::float_arithmetic, reason = "scaling multiplies weights")]
    pub fn scaled(&self, preset: &str, factor: f32) -> Result<Self, ConfigurationError> {
        Self::new(preset, self.iter().map(|(f, weight)| (f, weight * factor)))
    }
}

/// A named weighting profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    id: String,
    name: String,
    description: Option<String>,
    weights: WeightSet,
}

impl Preset {
    /// Construct a preset.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, weights: WeightSet) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            weights,
        }
    }

    /// Attach a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Identifier used to look the preset up and to name its output.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The preset's weights.
    #[must_use]
    pub const fn weights(&self) -> &WeightSet {
        &self.weights
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Valid(Preset),
    Rejected {
        id: String,
        error: ConfigurationError,
    },
}

impl Entry {
    fn id(&self) -> &str {
        match self {
            Self::Valid(preset) => preset.id(),
            Self::Rejected { id, .. } => id,
        }
    }
}

/// Ordered collection of presets.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    entries: Vec<Entry>,
}

impl PresetRegistry {
    /// Build a registry, rejecting duplicate identifiers.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::DuplicatePreset`] when two presets share
    /// an id.
    pub fn new(presets: Vec<Preset>) -> Result<Self, ConfigurationError> {
        Self::from_entries(presets.into_iter().map(Entry::Valid).collect())
    }

    fn from_entries(entries: Vec<Entry>) -> Result<Self, ConfigurationError> {
        for (position, entry) in entries.iter().enumerate() {
            let repeated = entries
                .iter()
                .take(position)
                .any(|earlier| earlier.id() == entry.id());
            if repeated {
                return Err(ConfigurationError::DuplicatePreset {
                    id: entry.id().to_owned(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// The production presets A, B and C.
    ///
    /// # Errors
    /// Never fails in practice; the weights are validated like any other.
    ///
    /// # Examples
    /// ```
    /// use suitability_core::{Factor, PresetRegistry};
    ///
    /// let registry = PresetRegistry::builtin().unwrap();
    /// let water_first = registry.get("B").unwrap();
    /// assert_eq!(water_first.weights().weight(Factor::Water), Some(0.40));
    /// ```
    pub fn builtin() -> Result<Self, ConfigurationError> {
        let table: [(&str, &str, &str, [f32; 5]); 3] = [
            (
                "A",
                "Balanced",
                "Even weighting across sun, water, remoteness, population and flood safety.",
                [0.25, 0.25, 0.20, 0.15, 0.15],
            ),
            (
                "B",
                "Water first",
                "Prioritizes low water stress for self-sufficient supply.",
                [0.20, 0.40, 0.15, 0.10, 0.15],
            ),
            (
                "C",
                "Remote living",
                "Prioritizes distance from cities and low population density.",
                [0.20, 0.20, 0.35, 0.15, 0.10],
            ),
        ];
        let presets = table
            .into_iter()
            .map(|(id, name, description, weights)| {
                let set = WeightSet::new(id, Factor::ALL.into_iter().zip(weights))?;
                Ok(Preset::new(id, name, set).with_description(description))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;
        Self::new(presets)
    }

    /// Look a preset up by id.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownPreset`] when no preset matches,
    /// or the error recorded when the preset with this id was rejected.
    pub fn get(&self, id: &str) -> Result<&Preset, ConfigurationError> {
        match self.entries.iter().find(|entry| entry.id() == id) {
            Some(Entry::Valid(preset)) => Ok(preset),
            Some(Entry::Rejected { error, .. }) => Err(error.clone()),
            None => Err(ConfigurationError::UnknownPreset { id: id.to_owned() }),
        }
    }

    /// Iterate over valid presets in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Valid(preset) => Some(preset),
            Entry::Rejected { .. } => None,
        })
    }

    /// Rejected presets with the reason each one failed validation.
    pub fn rejected(&self) -> impl Iterator<Item = (&str, &ConfigurationError)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Valid(_) => None,
            Entry::Rejected { id, error } => Some((id.as_str(), error)),
        })
    }

    /// Identifiers of every preset, rejected ones included, in
    /// configuration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Entry::id)
    }

    /// Number of presets, rejected ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(feature = "serde")]
mod document {
    //! Parsing of the `{"presets": {key: {id, name, weights}}}` document.

    use std::sync::Arc;

    use serde::Deserialize;
    use serde_json::{Map, Value};

    use super::{Entry, Preset, PresetRegistry, WeightSet};
    use crate::{ConfigurationError, Factor};

    #[derive(Deserialize)]
    struct RawDocument {
        presets: Map<String, Value>,
    }

    #[derive(Deserialize)]
    struct RawPreset {
        id: String,
        name: String,
        #[serde(default)]
        description: Option<String>,
        weights: Map<String, Value>,
    }

    fn malformed(key: &str) -> impl FnOnce(serde_json::Error) -> ConfigurationError + '_ {
        move |source| ConfigurationError::MalformedPreset {
            key: key.to_owned(),
            source: Arc::new(source),
        }
    }

    fn parse_entry(key: &str, value: Value) -> Entry {
        let fallback_id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(key)
            .to_owned();
        let parsed = serde_json::from_value::<RawPreset>(value)
            .map_err(malformed(key))
            .and_then(|raw| raw.into_preset(key));
        parsed.map_or_else(
            |error| Entry::Rejected {
                id: fallback_id,
                error,
            },
            Entry::Valid,
        )
    }

    impl RawPreset {
        fn into_preset(self, key: &str) -> Result<Preset, ConfigurationError> {
            let mut weights = Vec::with_capacity(self.weights.len());
            for (name, value) in self.weights {
                let factor = name.parse::<Factor>().map_err(|source| {
                    ConfigurationError::UnknownFactor {
                        preset: self.id.clone(),
                        name: source.name,
                    }
                })?;
                let weight = serde_json::from_value::<f32>(value).map_err(malformed(key))?;
                weights.push((factor, weight));
            }
            let set = WeightSet::new(&self.id, weights)?;
            let preset = Preset::new(self.id, self.name, set);
            Ok(match self.description {
                Some(description) => preset.with_description(description),
                None => preset,
            })
        }
    }

    impl PresetRegistry {
        /// Parse a preset document.
        ///
        /// Presets, and the weights within each preset, keep the order in
        /// which the document lists them. An entry that is malformed or fails
        /// validation is recorded under its id (or its key when the id is
        /// unreadable) and only [`PresetRegistry::get`] for that id fails.
        ///
        /// # Errors
        /// Returns [`ConfigurationError::Malformed`] for invalid JSON or a
        /// document without a `presets` mapping, and
        /// [`ConfigurationError::DuplicatePreset`] when two entries share an
        /// id.
        ///
        /// # Examples
        /// ```
        /// use suitability_core::PresetRegistry;
        ///
        /// let document = r#"{"presets": {"sunny": {
        ///     "id": "S", "name": "Sun seekers",
        ///     "weights": {"solar": 0.7, "water": 0.3}
        /// }}}"#;
        /// let registry = PresetRegistry::from_json_str(document).unwrap();
        /// assert_eq!(registry.get("S").unwrap().name(), "Sun seekers");
        /// ```
        pub fn from_json_str(document: &str) -> Result<Self, ConfigurationError> {
            let raw: RawDocument =
                serde_json::from_str(document).map_err(|source| ConfigurationError::Malformed {
                    source: Arc::new(source),
                })?;
            let entries = raw
                .presets
                .into_iter()
                .map(|(key, value)| parse_entry(&key, value))
                .collect();
            Self::from_entries(entries)
        }
    }
}
