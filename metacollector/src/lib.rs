//! Build-time accessor generator for `PROPERTY`/`CLASSDATA` annotated
//! headers.
//!
//! `metacollector` scans header-like source files for two marker
//! pseudo-declarations and generates a companion header and translation
//! unit with the storage and forwarding boilerplate they imply: annotated
//! fields become either plain members or wrapper members that route every
//! assignment through a named write accessor on the owning class.
//!
//! The pipeline has three stages. [`extract`] turns each input's token
//! stream into class records inside a shared [`model::Registry`]; the
//! registry is validated as a whole (every annotated class must carry its
//! `CLASSDATA` marker); [`generate`] then renders it into the two output
//! texts in one deterministic pass. [`driver::Job`] ties the stages
//! together behind a modification-time staleness check.

pub mod driver;
pub mod errors;
pub mod extract;
pub mod generate;
pub mod lexer;
pub mod model;
pub mod token;

pub use driver::{Job, Outcome};
pub use errors::ScanError;
pub use generate::{GeneratedOutput, generate, redirector_name};
pub use lexer::TokenStream;
pub use model::{ClassRecord, Property, Registry};
pub use token::{Token, TokenKind};
