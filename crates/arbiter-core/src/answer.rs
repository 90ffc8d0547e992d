//! Backend result types.
//!
//! A constrained backend returns a [`StructuredAnswer`] already tagged with
//! its shape, so extraction is a direct match on the variant instead of
//! probing an untyped object for whichever payload field happens to exist.
//! The unconstrained fallback returns plain text, carried as
//! [`RawResult::Text`] so the extractor knows to run its text heuristics.

use serde_json::{json, Value};

/// A schema-conformant answer from the generation backend.
///
/// Payload field names mirror the wire shape each schema kind declares; see
/// [`StructuredAnswer::to_json`].
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredAnswer {
    Simple { answer: String },
    Numeric { value: i64 },
    Boolean { answer: bool },
    Explanation { explanation: String },
    CardSelection { selected_card: String },
    MultipleChoice { answer: String },
    MultipleCardSelection { selected_cards: Vec<String> },
    NumericRange { value: i64 },
    CombatAssignment {
        damage_assignment: i64,
        blockers: Vec<String>,
    },
    DraftPick {
        pick: String,
        reason: Option<String>,
    },
    ManaCost { mana_cost: String },
    Phase { phase: String },
    TurnStep { step: String },
    CardType { card_type: String },
    Zone { zone: String },
    Priority { action: String },
}

impl StructuredAnswer {
    /// Render the answer as the JSON object its schema describes.
    ///
    /// Boolean payloads render as the canonical "yes"/"no" literals, matching
    /// the boolean schema's enum.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Simple { answer } => json!({ "answer": answer }),
            Self::Numeric { value } => json!({ "value": value }),
            Self::Boolean { answer } => {
                json!({ "answer": if *answer { "yes" } else { "no" } })
            }
            Self::Explanation { explanation } => json!({ "explanation": explanation }),
            Self::CardSelection { selected_card } => json!({ "selected_card": selected_card }),
            Self::MultipleChoice { answer } => json!({ "answer": answer }),
            Self::MultipleCardSelection { selected_cards } => {
                json!({ "selected_cards": selected_cards })
            }
            Self::NumericRange { value } => json!({ "value": value }),
            Self::CombatAssignment {
                damage_assignment,
                blockers,
            } => json!({
                "damage_assignment": damage_assignment,
                "blockers": blockers,
            }),
            Self::DraftPick { pick, reason } => match reason {
                Some(reason) => json!({ "pick": pick, "reason": reason }),
                None => json!({ "pick": pick }),
            },
            Self::ManaCost { mana_cost } => json!({ "mana_cost": mana_cost }),
            Self::Phase { phase } => json!({ "phase": phase }),
            Self::TurnStep { step } => json!({ "step": step }),
            Self::CardType { card_type } => json!({ "card_type": card_type }),
            Self::Zone { zone } => json!({ "zone": zone }),
            Self::Priority { action } => json!({ "action": action }),
        }
    }
}

/// What the generation driver hands to the extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// A structured, schema-conformant object from the constrained path
    Structured(StructuredAnswer),

    /// Raw text from the unconstrained fallback path
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_renders_canonical_literals() {
        let yes = StructuredAnswer::Boolean { answer: true };
        assert_eq!(yes.to_json(), json!({ "answer": "yes" }));

        let no = StructuredAnswer::Boolean { answer: false };
        assert_eq!(no.to_json(), json!({ "answer": "no" }));
    }

    #[test]
    fn test_draft_pick_reason_optional() {
        let bare = StructuredAnswer::DraftPick {
            pick: "Serra Angel".to_string(),
            reason: None,
        };
        assert_eq!(bare.to_json(), json!({ "pick": "Serra Angel" }));

        let reasoned = StructuredAnswer::DraftPick {
            pick: "Serra Angel".to_string(),
            reason: Some("best rare in the pack".to_string()),
        };
        assert_eq!(
            reasoned.to_json(),
            json!({ "pick": "Serra Angel", "reason": "best rare in the pack" })
        );
    }

    #[test]
    fn test_combat_assignment_fields() {
        let answer = StructuredAnswer::CombatAssignment {
            damage_assignment: 3,
            blockers: vec!["Llanowar Elves".to_string()],
        };
        let value = answer.to_json();
        assert_eq!(value["damage_assignment"], 3);
        assert_eq!(value["blockers"][0], "Llanowar Elves");
    }
}
