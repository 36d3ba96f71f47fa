//! Field Validator - checks candidate values against field constraints.
//!
//! The validator is the single source of truth for acceptance: everything
//! the extractor produces (including interpreter output) passes through
//! [`validate`] before it may touch session state.

mod normalize;
mod validator;

pub use normalize::{
    capitalize_words, normalize_date, normalize_email, normalize_number, normalize_phone,
    normalize_zip, words_to_digits,
};
pub use validator::{validate, GroupContext, RejectReason, Validation};
