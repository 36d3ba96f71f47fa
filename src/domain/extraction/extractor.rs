//! The answer extractor.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::schema::{Field, FieldType};
use crate::domain::validation::{
    normalize_date, normalize_email, normalize_number, normalize_phone,
};
use crate::ports::{InterpretationRequest, InterpretedValue, LanguageUnderstanding};

use super::{Candidate, ConversationContext, Extraction};

/// Filler tokens that never constitute an answer on their own.
const FILLER_WORDS: [&str; 13] = [
    "um", "umm", "uh", "uhh", "uhm", "er", "erm", "hm", "hmm", "like", "well", "so", "okay",
];

/// Extracts typed candidate values from free-form utterances.
///
/// Delegates interpretation to the language-understanding service under a
/// configurable deadline, then shape-checks the result against the target
/// field. The validator remains the final authority on acceptance; the
/// extractor only guarantees that candidates are plausibly typed.
#[derive(Clone)]
pub struct AnswerExtractor {
    interpreter: Arc<dyn LanguageUnderstanding>,
    timeout: Duration,
}

impl AnswerExtractor {
    /// Creates an extractor with the given interpreter and per-call
    /// deadline.
    pub fn new(interpreter: Arc<dyn LanguageUnderstanding>, timeout: Duration) -> Self {
        Self {
            interpreter,
            timeout,
        }
    }

    /// Extracts a candidate answer for `field` from `utterance`.
    ///
    /// A deadline overrun or interpreter failure is reported as
    /// [`Extraction::TimedOut`] / [`Extraction::NoMatch`] rather than an
    /// error: the conversation re-prompts instead of crashing.
    pub async fn extract(
        &self,
        field: &Field,
        utterance: &str,
        context: &ConversationContext,
    ) -> Extraction {
        if Self::is_non_answer(utterance) {
            tracing::debug!(field = %field.id(), "utterance pre-filtered as non-answer");
            return Extraction::NoMatch;
        }

        let request = InterpretationRequest::for_field(field, utterance, context.clone());
        let interpreted =
            match tokio::time::timeout(self.timeout, self.interpreter.interpret(request)).await {
                Err(_) => {
                    tracing::warn!(
                        field = %field.id(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "interpretation deadline exceeded"
                    );
                    return Extraction::TimedOut;
                }
                Ok(Err(err)) => {
                    tracing::warn!(field = %field.id(), error = %err, "interpretation failed");
                    return Extraction::NoMatch;
                }
                Ok(Ok(interpretation)) => interpretation.value,
            };

        match Self::shape_check(field, interpreted) {
            Some(candidate) => Extraction::Match(candidate),
            None => Extraction::NoMatch,
        }
    }

    /// Returns true for utterances that cannot contain an answer: empty
    /// input or pure filler ("um", "uh huh", ...). Saves an interpreter
    /// round-trip.
    fn is_non_answer(utterance: &str) -> bool {
        for token in utterance.split_whitespace() {
            let word: String = token
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();
            if !word.is_empty() && !FILLER_WORDS.contains(&word.as_str()) {
                return false;
            }
        }
        true
    }

    /// Checks that the interpreter's output is consistent with the
    /// field's type; anything malformed becomes a no-match.
    fn shape_check(field: &Field, value: InterpretedValue) -> Option<Candidate> {
        match value {
            InterpretedValue::None => None,
            InterpretedValue::Single(raw) => {
                let text = raw.trim();
                if text.is_empty() {
                    return None;
                }
                // Select answers pass through unchecked: the validator
                // rejects off-list values with the option set attached,
                // which makes for a far better re-prompt than a bare
                // no-match.
                let plausible = match field.field_type() {
                    FieldType::Text | FieldType::SingleSelect | FieldType::MultiSelect => true,
                    FieldType::Date => normalize_date(text).is_some(),
                    FieldType::Number => normalize_number(text).is_some(),
                    FieldType::Email => normalize_email(text).is_some(),
                    FieldType::Phone => normalize_phone(text).is_some(),
                };
                plausible.then(|| Candidate::Single(text.to_string()))
            }
            InterpretedValue::Multiple(values) => {
                if field.field_type() != FieldType::MultiSelect || values.is_empty() {
                    return None;
                }
                Some(Candidate::Multiple(values))
            }
        }
    }
}

impl std::fmt::Debug for AnswerExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerExtractor")
            .field("interpreter", &self.interpreter.info())
            .field("timeout", &self.timeout)
            .finish()
    }
}
