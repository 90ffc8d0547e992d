//! Instruction suffixes appended to prompts.
//!
//! Each schema kind has exactly one canonical suffix wording, appended to the
//! scenario prompt before either generation call. Grading is only
//! reproducible if every call site uses the same wording, so the table lives
//! here and nowhere else.

use arbiter_core::Schema;

pub const SIMPLE_SUFFIX: &str = "Answer with ONLY the answer, no explanation.";

pub const NUMERIC_SUFFIX: &str = "Answer with ONLY the number, no explanation.";

pub const BOOLEAN_SUFFIX: &str = "Answer with ONLY 'yes' or 'no'.";

pub const EXPLANATION_SUFFIX: &str = "Provide a clear, concise explanation.";

pub const CARD_SELECTION_SUFFIX: &str =
    "Choose exactly ONE card from the listed options; answer with ONLY the card name.";

pub const MULTIPLE_CHOICE_SUFFIX: &str =
    "Choose exactly ONE answer from the listed choices; answer with ONLY that choice.";

pub const MULTIPLE_CARD_SELECTION_SUFFIX: &str =
    "Answer with ONLY the card names, separated by commas.";

pub const NUMERIC_RANGE_SUFFIX: &str =
    "Answer with ONLY a number within the allowed range, no explanation.";

pub const COMBAT_ASSIGNMENT_SUFFIX: &str =
    "Answer with ONLY the damage total assigned to the defending player.";

pub const DRAFT_PICK_SUFFIX: &str = "Answer with ONLY the name of the card you pick.";

pub const MANA_COST_SUFFIX: &str =
    "Answer with ONLY the mana cost in standard notation (e.g. '2WW').";

pub const PHASE_SUFFIX: &str = "Answer with ONLY the name of the phase.";

pub const TURN_STEP_SUFFIX: &str = "Answer with ONLY the name of the turn step.";

pub const CARD_TYPE_SUFFIX: &str = "Answer with ONLY the card type.";

pub const ZONE_SUFFIX: &str = "Answer with ONLY the name of the zone.";

pub const PRIORITY_SUFFIX: &str = "Answer with ONLY the action you take.";

/// Get the canonical instruction suffix for a schema.
pub fn instruction_suffix(schema: &Schema) -> &'static str {
    match schema {
        Schema::Simple => SIMPLE_SUFFIX,
        Schema::Numeric => NUMERIC_SUFFIX,
        Schema::Boolean => BOOLEAN_SUFFIX,
        Schema::Explanation => EXPLANATION_SUFFIX,
        Schema::CardSelection { .. } => CARD_SELECTION_SUFFIX,
        Schema::MultipleChoice { .. } => MULTIPLE_CHOICE_SUFFIX,
        Schema::MultipleCardSelection => MULTIPLE_CARD_SELECTION_SUFFIX,
        Schema::NumericRange { .. } => NUMERIC_RANGE_SUFFIX,
        Schema::CombatAssignment => COMBAT_ASSIGNMENT_SUFFIX,
        Schema::DraftPick => DRAFT_PICK_SUFFIX,
        Schema::ManaCost => MANA_COST_SUFFIX,
        Schema::Phase => PHASE_SUFFIX,
        Schema::TurnStep => TURN_STEP_SUFFIX,
        Schema::CardType => CARD_TYPE_SUFFIX,
        Schema::Zone => ZONE_SUFFIX,
        Schema::Priority => PRIORITY_SUFFIX,
    }
}

/// Build the full prompt handed to the backend.
pub fn with_suffix(prompt: &str, schema: &Schema) -> String {
    format!("{}\n\n{}", prompt, instruction_suffix(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandated_wordings() {
        assert_eq!(
            instruction_suffix(&Schema::Numeric),
            "Answer with ONLY the number, no explanation."
        );
        assert_eq!(
            instruction_suffix(&Schema::Boolean),
            "Answer with ONLY 'yes' or 'no'."
        );
        assert_eq!(
            instruction_suffix(&Schema::CardSelection { options: Vec::new() }),
            "Choose exactly ONE card from the listed options; answer with ONLY the card name."
        );
    }

    #[test]
    fn test_suffix_independent_of_constraint_data() {
        let constrained = Schema::card_selection(vec!["Shock".to_string()]).unwrap();
        let degraded = Schema::CardSelection { options: Vec::new() };
        assert_eq!(
            instruction_suffix(&constrained),
            instruction_suffix(&degraded)
        );

        let narrow = Schema::numeric_range(0, 6).unwrap();
        let wide = Schema::numeric_range(0, 100).unwrap();
        assert_eq!(instruction_suffix(&narrow), instruction_suffix(&wide));
    }

    #[test]
    fn test_with_suffix_layout() {
        let prompt = with_suffix("Is Serra Angel a creature?", &Schema::Boolean);
        assert_eq!(
            prompt,
            "Is Serra Angel a creature?\n\nAnswer with ONLY 'yes' or 'no'."
        );
    }
}
