pub mod api;
pub mod ast;
pub mod clear;
pub mod config;
pub mod documentation;
pub mod error;
pub mod index;
pub mod pass;
pub mod serialization;
pub mod session;
pub mod utils;
pub mod visit;

pub use api::{document, document_with, AssociationReport};
pub use pass::{DocumentationPass, PassOutcome};
pub use session::{DocSession, DocState};
