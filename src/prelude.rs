//! Prelude module for convenient imports
//!
//! Re-exports the types needed to load a workflow, configure templates and compile it.
//!
//! # Example
//!
//! ```rust,no_run
//! use honyaku::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//! let graph = WorkflowGraph::from_json(&json)?;
//!
//! let compiler = Compiler::default();
//! for (language, result) in compiler.compile_all(&graph, &Language::ALL) {
//!     let unit = result?;
//!     println!("{} -> {}", language, unit.file_name());
//! }
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{Compiler, CompilerBuilder, GeneratedUnit};

// Workflow model
pub use crate::workflow::{IntoWorkflow, Node, WorkflowGraph};

// Targets and templates
pub use crate::inventory::ParameterInventory;
pub use crate::language::Language;
pub use crate::template::TemplateCatalogue;

// Error types
pub use crate::error::{CompileError, TemplateError, WorkflowError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
