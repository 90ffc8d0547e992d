//! JSON Schema rendering and answer conformance checking.
//!
//! Every schema renders to a JSON Schema object. Backends consume that
//! document as their decoding constraint; the generation driver uses it to
//! verify that a structured result actually satisfies the schema it was
//! generated under before trusting it.

use serde_json::{json, Value};

use crate::answer::StructuredAnswer;

use super::Schema;

fn string_field(name: &str) -> Value {
    json!({
        "type": "object",
        "properties": { name: { "type": "string" } },
        "required": [name],
    })
}

fn enum_field(name: &str, literals: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": { name: { "type": "string", "enum": literals } },
        "required": [name],
    })
}

impl Schema {
    /// Render this schema as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::Simple | Self::MultipleChoice { .. } => match self.literal_set() {
                Some(literals) => enum_field("answer", &literals),
                None => string_field("answer"),
            },
            Self::Numeric => json!({
                "type": "object",
                "properties": { "value": { "type": "integer" } },
                "required": ["value"],
            }),
            Self::Boolean => enum_field("answer", &["yes", "no"]),
            Self::Explanation => string_field("explanation"),
            Self::CardSelection { .. } => match self.literal_set() {
                Some(literals) => enum_field("selected_card", &literals),
                None => string_field("selected_card"),
            },
            Self::MultipleCardSelection => json!({
                "type": "object",
                "properties": {
                    "selected_cards": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1,
                    }
                },
                "required": ["selected_cards"],
            }),
            Self::NumericRange { min, max } => json!({
                "type": "object",
                "properties": {
                    "value": { "type": "integer", "minimum": min, "maximum": max }
                },
                "required": ["value"],
            }),
            Self::CombatAssignment => json!({
                "type": "object",
                "properties": {
                    "damage_assignment": { "type": "integer", "minimum": 0 },
                    "blockers": { "type": "array", "items": { "type": "string" } },
                },
                "required": ["damage_assignment", "blockers"],
            }),
            Self::DraftPick => json!({
                "type": "object",
                "properties": {
                    "pick": { "type": "string" },
                    "reason": { "type": "string" },
                },
                "required": ["pick"],
            }),
            Self::ManaCost => string_field("mana_cost"),
            Self::Phase => enum_field("phase", &self.literal_set().unwrap_or_default()),
            Self::TurnStep => enum_field("step", &self.literal_set().unwrap_or_default()),
            Self::CardType => enum_field("card_type", &self.literal_set().unwrap_or_default()),
            Self::Zone => enum_field("zone", &self.literal_set().unwrap_or_default()),
            Self::Priority => enum_field("action", &self.literal_set().unwrap_or_default()),
        }
    }

    /// Check a structured answer against this schema.
    ///
    /// Returns `Ok(())` if the answer conforms, or the list of validation
    /// error messages.
    pub fn validate_answer(&self, answer: &StructuredAnswer) -> Result<(), Vec<String>> {
        let schema_value = self.to_json_schema();
        let validator = jsonschema::options()
            .build(&schema_value)
            .map_err(|e| vec![format!("Failed to compile schema: {}", e)])?;

        let instance = answer.to_json();
        let errors: Vec<String> = validator
            .iter_errors(&instance)
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
