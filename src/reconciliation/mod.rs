//! Bank return-file reconciliation
//!
//! A return file is a fixed-width text file received back from the bank
//! describing the outcome of previously submitted charges. The parser turns
//! raw file bytes into a sequence of outcomes; the engine applies them to the
//! charge store and reports an aggregate tally.

pub mod engine;
pub mod parser;

pub use engine::*;
pub use parser::*;
