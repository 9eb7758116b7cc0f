//! # Honyaku - Workflow Graph to Source Code Compiler
//!
//! **Honyaku** turns the declarative workflow graphs of a visual automation tool into
//! standalone, human-readable classes in PHP, Python or JavaScript. Every node becomes a
//! private method, the graph becomes a `run` method that calls those methods in order, and
//! every value the workflow reads from its trigger becomes a constructor parameter.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Workflow**: Parse an exported workflow with [`WorkflowGraph::from_json`](workflow::WorkflowGraph::from_json),
//!     or implement [`IntoWorkflow`](workflow::IntoWorkflow) for your own structs.
//! 2.  **Pick Templates**: Start from [`TemplateCatalogue::builtin`](template::TemplateCatalogue::builtin)
//!     and optionally overlay a directory of overrides.
//! 3.  **Compile**: Build a [`Compiler`](compiler::Compiler) and call `compile` once per target language.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use honyaku::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("workflow.json")?;
//!     let graph = WorkflowGraph::from_json(&json)?;
//!
//!     let compiler = Compiler::builder(TemplateCatalogue::builtin())
//!         .with_version("2.1.0")
//!         .with_credentials_dir("../credentials")
//!         .build();
//!
//!     let unit = compiler.compile(&graph, Language::Python)?;
//!     println!("// {}", unit.file_name());
//!     println!("{}", unit.source);
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod error;
pub mod expression;
pub mod identifier;
pub mod inventory;
pub mod language;
pub mod prelude;
pub mod template;
pub mod workflow;
