//! Answer schemas.
//!
//! A schema is a machine-checkable constraint on the shape of an acceptable
//! answer: a type, plus an optional finite literal set or numeric range. The
//! catalogue of shapes is fixed; the constraint data inside a shape can be
//! built per scenario (e.g. a card selection limited to exactly the cards a
//! prompt mentions).
//!
//! Schemas are plain values. Constraint validation is a function over the
//! carried data, so no types are synthesized at runtime and every component
//! downstream can match on the variant directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod json;
mod registry;

pub use registry::SchemaRegistry;

/// Game phases, in turn order.
pub const PHASES: &[&str] = &[
    "untap",
    "upkeep",
    "draw",
    "main1",
    "combat",
    "beginning_of_combat",
    "declare_attackers",
    "declare_blockers",
    "combat_damage",
    "end_of_combat",
    "main2",
    "end",
    "cleanup",
];

/// Coarse turn steps.
pub const TURN_STEPS: &[&str] = &["beginning", "main", "combat", "ending"];

/// Card types.
pub const CARD_TYPES: &[&str] = &[
    "creature",
    "instant",
    "sorcery",
    "enchantment",
    "artifact",
    "land",
    "planeswalker",
    "tribal",
];

/// Game zones.
pub const ZONES: &[&str] = &[
    "hand",
    "battlefield",
    "graveyard",
    "exile",
    "library",
    "stack",
    "command",
];

/// Priority actions.
pub const PRIORITY_ACTIONS: &[&str] = &["pass", "cast", "activate", "trigger"];

/// Errors from schema lookup and construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Unknown schema: '{0}'")]
    Unknown(String),

    #[error("Missing required parameter '{param}' for schema '{schema}'")]
    MissingParameter {
        schema: &'static str,
        param: &'static str,
    },

    #[error("Schema '{0}' requires at least one option")]
    Unsatisfiable(&'static str),

    #[error("Invalid bounds for numeric_range: min {min} > max {max}")]
    InvalidBounds { min: i64, max: i64 },
}

/// A validated constraint on the shape of an acceptable answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Schema {
    /// Free string, short answer
    Simple,
    /// Signed integer, unbounded
    Numeric,
    /// Literal "yes" or "no"
    Boolean,
    /// Free string, long form
    Explanation,
    /// One card name; empty options means the unconstrained degraded form
    CardSelection { options: Vec<String> },
    /// One answer from a caller-supplied finite set
    MultipleChoice { choices: Vec<String> },
    /// One or more card names
    MultipleCardSelection,
    /// Integer within [min, max]
    NumericRange { min: i64, max: i64 },
    /// Damage total plus the blockers it assumes
    CombatAssignment,
    /// A draft pick, optionally with a reason
    DraftPick,
    /// Mana cost in standard notation (e.g. "2WW")
    ManaCost,
    /// One of the fixed game phases
    Phase,
    /// One of the coarse turn steps
    TurnStep,
    /// One of the card types
    CardType,
    /// One of the game zones
    Zone,
    /// One of the priority actions
    Priority,
}

impl Schema {
    /// Build a card selection constrained to the given options.
    pub fn card_selection(options: Vec<String>) -> Result<Self, SchemaError> {
        if options.is_empty() {
            return Err(SchemaError::Unsatisfiable("card_selection"));
        }
        Ok(Self::CardSelection { options })
    }

    /// Build a multiple choice constrained to the given choices.
    pub fn multiple_choice(choices: Vec<String>) -> Result<Self, SchemaError> {
        if choices.is_empty() {
            return Err(SchemaError::Unsatisfiable("multiple_choice"));
        }
        Ok(Self::MultipleChoice { choices })
    }

    /// Build a numeric range over [min, max].
    pub fn numeric_range(min: i64, max: i64) -> Result<Self, SchemaError> {
        if min > max {
            return Err(SchemaError::InvalidBounds { min, max });
        }
        Ok(Self::NumericRange { min, max })
    }

    /// The schema's registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Explanation => "explanation",
            Self::CardSelection { .. } => "card_selection",
            Self::MultipleChoice { .. } => "multiple_choice",
            Self::MultipleCardSelection => "multiple_card_selection",
            Self::NumericRange { .. } => "numeric_range",
            Self::CombatAssignment => "combat_assignment",
            Self::DraftPick => "draft_pick",
            Self::ManaCost => "mana_cost",
            Self::Phase => "phase",
            Self::TurnStep => "turn_step",
            Self::CardType => "card_type",
            Self::Zone => "zone",
            Self::Priority => "priority",
        }
    }

    /// The finite literal set this schema constrains to, if any.
    ///
    /// Returns `None` for free-form and numeric shapes, and for the degraded
    /// unconstrained card selection.
    pub fn literal_set(&self) -> Option<Vec<&str>> {
        match self {
            Self::CardSelection { options } if !options.is_empty() => {
                Some(options.iter().map(String::as_str).collect())
            }
            Self::MultipleChoice { choices } => {
                Some(choices.iter().map(String::as_str).collect())
            }
            Self::Phase => Some(PHASES.to_vec()),
            Self::TurnStep => Some(TURN_STEPS.to_vec()),
            Self::CardType => Some(CARD_TYPES.to_vec()),
            Self::Zone => Some(ZONES.to_vec()),
            Self::Priority => Some(PRIORITY_ACTIONS.to_vec()),
            _ => None,
        }
    }

    /// Whether the answer payload is an integer.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Numeric | Self::NumericRange { .. } | Self::CombatAssignment
        )
    }
}

/// Parameters for dynamically-built schemas, produced by the classifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaParams {
    /// Options for a constrained card selection
    pub options: Option<Vec<String>>,

    /// Choices for a multiple choice
    pub choices: Option<Vec<String>>,

    /// Lower bound for a numeric range
    pub min_val: Option<i64>,

    /// Upper bound for a numeric range
    pub max_val: Option<i64>,
}

impl SchemaParams {
    /// True when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.options.is_none()
            && self.choices.is_none()
            && self.min_val.is_none()
            && self.max_val.is_none()
    }

    /// Parameters carrying a set of card options.
    pub fn with_options(options: Vec<String>) -> Self {
        Self {
            options: Some(options),
            ..Default::default()
        }
    }

    /// Parameters carrying a set of choices.
    pub fn with_choices(choices: Vec<String>) -> Self {
        Self {
            choices: Some(choices),
            ..Default::default()
        }
    }

    /// Parameters carrying numeric bounds.
    pub fn with_bounds(min: i64, max: i64) -> Self {
        Self {
            min_val: Some(min),
            max_val: Some(max),
            ..Default::default()
        }
    }
}
