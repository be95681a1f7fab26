// Hint DSL parser module

pub mod ast;
pub mod command;
pub mod lexer;
pub mod pipeline;

// Public API re-exports
pub use ast::{HintCommand, HintSpec};
pub use pipeline::{parse_hint_spec, parse_hints};
