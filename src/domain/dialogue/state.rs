//! Dialogue turn state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where the orchestrator is within one conversational turn cycle.
///
/// Distinct from [`SessionStatus`](crate::domain::foundation::SessionStatus):
/// the session status describes the conversation's lifecycle, this enum
/// describes the mechanics of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    /// Choosing the next unanswered field by tab order.
    #[default]
    SelectingField,

    /// A prompt is out; waiting for exactly one utterance.
    AwaitingUtterance,

    /// Running the extractor and validator on an utterance.
    Validating,

    /// A rejection is being turned into a clarifying re-prompt.
    Clarifying,

    /// No fields remain; the completion assembler takes over.
    Complete,
}

impl StateMachine for DialogueState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialogueState::*;
        matches!(
            (self, target),
            (SelectingField, AwaitingUtterance)
                | (SelectingField, Complete)
                | (AwaitingUtterance, Validating)
                | (Validating, SelectingField)
                | (Validating, Clarifying)
                | (Clarifying, AwaitingUtterance)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialogueState::*;
        match self {
            SelectingField => vec![AwaitingUtterance, Complete],
            AwaitingUtterance => vec![Validating],
            Validating => vec![SelectingField, Clarifying],
            Clarifying => vec![AwaitingUtterance],
            Complete => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_cycles_through_selection_and_validation() {
        let state = DialogueState::SelectingField
            .transition_to(DialogueState::AwaitingUtterance)
            .and_then(|s| s.transition_to(DialogueState::Validating))
            .and_then(|s| s.transition_to(DialogueState::SelectingField))
            .unwrap();
        assert_eq!(state, DialogueState::SelectingField);
    }

    #[test]
    fn clarification_loops_back_to_awaiting_utterance() {
        let state = DialogueState::Validating
            .transition_to(DialogueState::Clarifying)
            .and_then(|s| s.transition_to(DialogueState::AwaitingUtterance))
            .unwrap();
        assert_eq!(state, DialogueState::AwaitingUtterance);
    }

    #[test]
    fn complete_is_terminal_and_only_reachable_from_selection() {
        assert!(DialogueState::Complete.is_terminal());
        assert!(!DialogueState::Validating.can_transition_to(&DialogueState::Complete));
        assert!(DialogueState::SelectingField.can_transition_to(&DialogueState::Complete));
    }

    #[test]
    fn utterances_cannot_skip_validation() {
        assert!(!DialogueState::AwaitingUtterance.can_transition_to(&DialogueState::SelectingField));
        assert!(!DialogueState::AwaitingUtterance.can_transition_to(&DialogueState::Clarifying));
    }
}
