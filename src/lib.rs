//! Formguide - Conversational Form-Filling Engine
//!
//! This crate drives structured form completion through free-form
//! conversation: given a declarative form schema and a stream of user
//! utterances (spoken or typed), it decides which field to ask about next,
//! extracts a typed value from each utterance, validates it against the
//! field's constraints, and assembles the completed form document once
//! every required field is satisfied.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
