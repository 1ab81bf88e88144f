//! Client code for biascheck.
//!
//! This crate provides the HTTP scorer that asks a Groq-hosted model for a
//! bias verdict, plugged into the evaluation pipeline through
//! [`biascheck_core::Scorer`].

pub mod groq;

pub use groq::{GroqClient, GroqConfig, ScorerError};
