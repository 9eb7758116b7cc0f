use crate::error::CompileError;
use crate::identifier::{class_identifier, method_identifier};
use crate::inventory::ParameterInventory;
use crate::language::{ClassContext, Language};
use crate::template::{Placeholders, TemplateCatalogue};
use crate::workflow::WorkflowGraph;
use ahash::AHashSet;
use tracing::{debug, info, warn};

pub mod credentials;
pub mod linearizer;
pub mod parameters;
mod render;

use crate::expression::ExpressionResolver;
use render::NodeRenderer;

const DEFAULT_CREDENTIALS_DIR: &str = "../credentials";
const CREDENTIALS_FILE_STEM: &str = "Credentials";

/// One generated source file.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub language: Language,
    pub class_name: String,
    pub workflow_name: String,
    pub source: String,
    /// Every parameter the generated constructor accepts.
    pub inventory: ParameterInventory,
    /// Credential classes the source binds, sorted.
    pub credentials: Vec<&'static str>,
}

impl GeneratedUnit {
    /// Workflow name made filesystem-safe, plus the language extension.
    pub fn file_name(&self) -> String {
        let mut stem = String::with_capacity(self.workflow_name.len());
        for part in self.workflow_name.split_whitespace() {
            if !stem.is_empty() {
                stem.push('_');
            }
            stem.extend(part.chars().map(|c| match c {
                '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
                c => c,
            }));
        }
        if stem.is_empty() {
            stem.push_str("workflow");
        }
        format!("{}.{}", stem, self.language.backend().extension())
    }
}

pub struct Compiler {
    catalogue: TemplateCatalogue,
    version: String,
    credentials_dir: String,
}

pub struct CompilerBuilder {
    catalogue: TemplateCatalogue,
    version: String,
    credentials_dir: String,
}

impl CompilerBuilder {
    pub fn new(catalogue: TemplateCatalogue) -> Self {
        Self {
            catalogue,
            version: env!("CARGO_PKG_VERSION").to_string(),
            credentials_dir: DEFAULT_CREDENTIALS_DIR.to_string(),
        }
    }

    /// Version tag written into the generated class header.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Directory, relative to the generated file, holding the credential classes.
    pub fn with_credentials_dir(mut self, dir: &str) -> Self {
        self.credentials_dir = dir.trim_end_matches(['/', '\\']).to_string();
        self
    }

    /// Renders nodes of `user_type` with the templates of `builtin_type`.
    pub fn with_node_alias(mut self, user_type: &str, builtin_type: &str) -> Self {
        self.catalogue.alias(user_type, builtin_type);
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            catalogue: self.catalogue,
            version: self.version,
            credentials_dir: self.credentials_dir,
        }
    }
}

impl Compiler {
    pub fn builder(catalogue: TemplateCatalogue) -> CompilerBuilder {
        CompilerBuilder::new(catalogue)
    }

    pub fn catalogue(&self) -> &TemplateCatalogue {
        &self.catalogue
    }

    /// Path of the shared credentials file, as referenced from generated code.
    pub fn credentials_path(&self, language: Language) -> String {
        format!(
            "{}/{}.{}",
            self.credentials_dir,
            CREDENTIALS_FILE_STEM,
            language.backend().extension()
        )
    }

    /// Compiles `graph` into one class in `language`.
    ///
    /// Node-level problems never abort: unknown node types get the fallback stub and
    /// unparseable values degrade to literals. Only a missing class template or an empty
    /// graph fail.
    pub fn compile(
        &self,
        graph: &WorkflowGraph,
        language: Language,
    ) -> Result<GeneratedUnit, CompileError> {
        let class_template = self
            .catalogue
            .class_template(language)
            .ok_or(CompileError::MissingClassTemplate { language })?;
        if graph.is_empty() {
            return Err(CompileError::EmptyWorkflow {
                workflow: graph.name.clone(),
            });
        }

        let backend = language.backend();
        info!(workflow = %graph.name, %language, nodes = graph.nodes.len(), "Compiling workflow");

        let mut inventory = parameters::seed_inventory(graph);
        debug!(seeded = inventory.len(), "Seeded parameter inventory");

        let ordered = linearizer::linearize(graph);
        let mut methods = Vec::with_capacity(ordered.len());
        let mut calls = Vec::with_capacity(ordered.len());
        let mut seen_methods: AHashSet<String> = AHashSet::new();

        {
            let mut resolver = ExpressionResolver::new(backend, &mut inventory);
            let mut renderer = NodeRenderer::new(backend, &mut resolver);

            for node in ordered {
                let lookup = self.catalogue.node_template(&node.type_tag, language);
                if lookup.is_fallback() {
                    warn!(node = %node.name, node_type = %node.type_tag, "No template for node type; emitting stub");
                }

                let method_name = method_identifier(&node.name, language);
                if !seen_methods.insert(method_name.clone()) {
                    warn!(node = %node.name, method = %method_name, "Method name collides with an earlier node");
                }

                methods.push(renderer.render(node, lookup.template(), &method_name));
                calls.push(backend.method_call(&method_name));
            }
        }

        let credentials = credentials::credential_identifiers(graph);
        let credentials_path = self.credentials_path(language);
        let class_name = class_identifier(&graph.name);

        let mut values = Placeholders::new();
        values
            .set("class_name", class_name.as_str())
            .set("workflow_name", graph.name.as_str())
            .set("version", self.version.as_str())
            .set("credentials_path", credentials_path.as_str())
            .set(
                "credentials_imports",
                backend.credential_bindings(&credentials, &credentials_path),
            )
            .set("constructor", backend.constructor(&inventory))
            .set("steps_calls", calls.join("\n"))
            .set("steps_methods", methods.join("\n\n"));
        backend.class_placeholders(
            &ClassContext {
                class_name: &class_name,
                credentials_path: &credentials_path,
            },
            &mut values,
        );

        // Single pass: text coming from the workflow is never scanned for placeholders.
        let source = class_template.render(&values);

        info!(
            class = %class_name,
            parameters = inventory.len(),
            credentials = credentials.len(),
            "Generated workflow class"
        );

        Ok(GeneratedUnit {
            language,
            class_name,
            workflow_name: graph.name.clone(),
            source,
            inventory,
            credentials,
        })
    }

    /// Compiles `graph` once per language. Each language fails independently.
    pub fn compile_all(
        &self,
        graph: &WorkflowGraph,
        languages: &[Language],
    ) -> Vec<(Language, Result<GeneratedUnit, CompileError>)> {
        languages
            .iter()
            .map(|&language| (language, self.compile(graph, language)))
            .collect()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::builder(TemplateCatalogue::builtin()).build()
    }
}
