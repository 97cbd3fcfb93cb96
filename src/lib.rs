//! Support ticket triage: embed a ticket, classify it, decode the labels.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod nlp;
