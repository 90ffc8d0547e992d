//! Schema catalogue and factory.
//!
//! The registry covers both halves of schema resolution: a fixed table of
//! static shapes looked up by name, and a factory that builds
//! scenario-specific instances from parameters. The registry is a plain value
//! constructed once and passed in explicitly wherever schemas are resolved.

use std::collections::BTreeMap;

use super::{Schema, SchemaError, SchemaParams};

/// Static default bounds for the registry's `numeric_range` entry.
///
/// These apply only to the static table; a dynamically-requested range with
/// absent bounds is a configuration error, never silently defaulted.
const DEFAULT_RANGE: (i64, i64) = (0, 100);

/// Catalogue of named answer shapes.
pub struct SchemaRegistry {
    statics: BTreeMap<&'static str, Schema>,
}

impl SchemaRegistry {
    /// Create a registry with the full static catalogue.
    pub fn new() -> Self {
        let mut statics = BTreeMap::new();
        statics.insert("simple", Schema::Simple);
        statics.insert("numeric", Schema::Numeric);
        statics.insert("boolean", Schema::Boolean);
        statics.insert("explanation", Schema::Explanation);
        // Unconstrained selection: the degraded form used when a prompt
        // yields no extractable options.
        statics.insert("card_selection", Schema::CardSelection { options: Vec::new() });
        statics.insert("multiple_card_selection", Schema::MultipleCardSelection);
        statics.insert(
            "numeric_range",
            Schema::NumericRange {
                min: DEFAULT_RANGE.0,
                max: DEFAULT_RANGE.1,
            },
        );
        statics.insert("combat_assignment", Schema::CombatAssignment);
        statics.insert("draft_pick", Schema::DraftPick);
        statics.insert("mana_cost", Schema::ManaCost);
        statics.insert("phase", Schema::Phase);
        statics.insert("turn_step", Schema::TurnStep);
        statics.insert("card_type", Schema::CardType);
        statics.insert("zone", Schema::Zone);
        statics.insert("priority", Schema::Priority);

        Self { statics }
    }

    /// Look up a static schema by name.
    ///
    /// `multiple_choice` has no static form; looking it up reports the
    /// missing parameter rather than an unknown name, so a scenario that
    /// declares the type without choices fails with a configuration error.
    pub fn lookup(&self, name: &str) -> Result<Schema, SchemaError> {
        if name == "multiple_choice" {
            return Err(SchemaError::MissingParameter {
                schema: "multiple_choice",
                param: "choices",
            });
        }

        self.statics
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::Unknown(name.to_string()))
    }

    /// Build a scenario-specific schema from parameters.
    ///
    /// Parametric names require their parameters: `card_selection` needs
    /// `options`, `multiple_choice` needs `choices`, `numeric_range` needs
    /// both bounds. Non-parametric names fall through to the static table.
    pub fn build(&self, name: &str, params: &SchemaParams) -> Result<Schema, SchemaError> {
        match name {
            "card_selection" => match &params.options {
                Some(options) => Schema::card_selection(options.clone()),
                None => Err(SchemaError::MissingParameter {
                    schema: "card_selection",
                    param: "options",
                }),
            },
            "multiple_choice" => match &params.choices {
                Some(choices) => Schema::multiple_choice(choices.clone()),
                None => Err(SchemaError::MissingParameter {
                    schema: "multiple_choice",
                    param: "choices",
                }),
            },
            "numeric_range" => match (params.min_val, params.max_val) {
                (Some(min), Some(max)) => Schema::numeric_range(min, max),
                (None, _) => Err(SchemaError::MissingParameter {
                    schema: "numeric_range",
                    param: "min_val",
                }),
                (_, None) => Err(SchemaError::MissingParameter {
                    schema: "numeric_range",
                    param: "max_val",
                }),
            },
            other => self.lookup(other),
        }
    }

    /// Names in the static catalogue.
    pub fn static_names(&self) -> Vec<&'static str> {
        self.statics.keys().copied().collect()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
