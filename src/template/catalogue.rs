use super::Template;
use crate::error::TemplateError;
use crate::language::Language;
use crate::workflow::short_type;
use ahash::AHashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const FALLBACK_FILE_STEM: &str = "_fallback";
const TEMPLATE_EXTENSION: &str = "tpl";

/// Result of a node template lookup.
#[derive(Debug, Clone, Copy)]
pub enum NodeTemplate<'a> {
    Specific(&'a Template),
    Fallback(&'a Template),
}

impl<'a> NodeTemplate<'a> {
    pub fn template(&self) -> &'a Template {
        match self {
            NodeTemplate::Specific(t) | NodeTemplate::Fallback(t) => t,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, NodeTemplate::Fallback(_))
    }
}

/// Read-only store of class skeletons (one per language) and method skeletons
/// (one per node type and language, plus one fallback per language).
#[derive(Debug, Clone)]
pub struct TemplateCatalogue {
    classes: AHashMap<Language, Template>,
    nodes: AHashMap<(String, Language), Template>,
    /// Node type -> type whose templates it borrows, resolved at lookup.
    aliases: AHashMap<String, String>,
    fallbacks: [Template; 3],
}

/// Defines the templates bundled with the crate.
macro_rules! builtin_templates {
    (
        classes { $( $class_lang:ident => $class_path:literal ),* $(,)? }
        nodes { $( ($node_type:literal, $node_lang:ident) => $node_path:literal ),* $(,)? }
        aliases { $( $alias:literal => $target:literal ),* $(,)? }
    ) => {
        fn register_builtin_templates(catalogue: &mut TemplateCatalogue) {
            $( catalogue.insert_class(Language::$class_lang, include_str!($class_path).trim_end()); )*
            $( catalogue.insert_node($node_type, Language::$node_lang, include_str!($node_path).trim_end()); )*
            $( catalogue.alias($alias, $target); )*
        }
    };
}

builtin_templates! {
    classes {
        Php => "../../templates/classes/php.tpl",
        Python => "../../templates/classes/python.tpl",
        JavaScript => "../../templates/classes/javascript.tpl",
    }
    nodes {
        ("webhook", Php) => "../../templates/nodes/php/webhook.tpl",
        ("httpRequest", Php) => "../../templates/nodes/php/httpRequest.tpl",
        ("aiAgent", Php) => "../../templates/nodes/php/aiAgent.tpl",
        ("webhook", Python) => "../../templates/nodes/python/webhook.tpl",
        ("httpRequest", Python) => "../../templates/nodes/python/httpRequest.tpl",
        ("aiAgent", Python) => "../../templates/nodes/python/aiAgent.tpl",
        ("webhook", JavaScript) => "../../templates/nodes/javascript/webhook.tpl",
        ("httpRequest", JavaScript) => "../../templates/nodes/javascript/httpRequest.tpl",
        ("aiAgent", JavaScript) => "../../templates/nodes/javascript/aiAgent.tpl",
    }
    aliases {
        "agent" => "aiAgent",
        "start" => "webhook",
    }
}

impl TemplateCatalogue {
    /// A catalogue holding only each language's generic fallback stub.
    pub fn new() -> Self {
        let fallbacks = Language::ALL.map(|l| Template::new(l.backend().fallback_stub()));
        Self {
            classes: AHashMap::new(),
            nodes: AHashMap::new(),
            aliases: AHashMap::new(),
            fallbacks,
        }
    }

    /// The templates bundled with the crate for every supported language.
    pub fn builtin() -> Self {
        let mut catalogue = Self::new();
        register_builtin_templates(&mut catalogue);
        catalogue
    }

    pub fn insert_class(&mut self, language: Language, text: impl Into<String>) -> &mut Self {
        self.classes.insert(language, Template::new(text));
        self
    }

    pub fn insert_node(
        &mut self,
        node_type: &str,
        language: Language,
        text: impl Into<String>,
    ) -> &mut Self {
        self.nodes
            .insert((node_type.to_string(), language), Template::new(text));
        self
    }

    pub fn insert_fallback(&mut self, language: Language, text: impl Into<String>) -> &mut Self {
        self.fallbacks[slot(language)] = Template::new(text);
        self
    }

    /// Makes `node_type` render with whatever templates `target_type` has when looked up,
    /// including ones loaded later. A template registered under `node_type` itself wins.
    pub fn alias(&mut self, node_type: &str, target_type: &str) -> &mut Self {
        self.aliases
            .insert(node_type.to_string(), target_type.to_string());
        self
    }

    pub fn class_template(&self, language: Language) -> Option<&Template> {
        self.classes.get(&language)
    }

    /// Looks up the exact type tag, then its short form, then the aliases of both, then the
    /// language fallback.
    pub fn node_template(&self, type_tag: &str, language: Language) -> NodeTemplate<'_> {
        let short = short_type(type_tag);
        let get = |node_type: &str| self.nodes.get(&(node_type.to_string(), language));
        let specific = get(type_tag).or_else(|| get(short)).or_else(|| {
            [type_tag, short]
                .into_iter()
                .filter_map(|t| self.aliases.get(t))
                .find_map(|target| get(target.as_str()))
        });
        match specific {
            Some(template) => NodeTemplate::Specific(template),
            None => NodeTemplate::Fallback(&self.fallbacks[slot(language)]),
        }
    }

    /// Languages that have a class template.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.classes.keys().copied().collect();
        languages.sort();
        languages
    }

    /// Overlays templates from `dir`:
    /// `classes/<language>.tpl` and `nodes/<language>/<node type>.tpl`
    /// (`_fallback.tpl` replaces the language fallback).
    ///
    /// Returns the number of templates read.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, TemplateError> {
        let dir = dir.as_ref();
        let mut loaded = 0;

        for language in Language::ALL {
            let path = dir
                .join("classes")
                .join(format!("{}.{}", language.code(), TEMPLATE_EXTENSION));
            if path.is_file() {
                self.insert_class(language, read_template(&path)?);
                loaded += 1;
            }
        }

        let nodes_dir = dir.join("nodes");
        if nodes_dir.is_dir() {
            for entry in read_dir(&nodes_dir)? {
                let language_dir = entry.path();
                if !language_dir.is_dir() {
                    continue;
                }
                let language: Language = entry.file_name().to_string_lossy().parse()?;

                for file in read_dir(&language_dir)? {
                    let path = file.path();
                    if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                        continue;
                    }
                    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    let text = read_template(&path)?;
                    if stem == FALLBACK_FILE_STEM {
                        self.insert_fallback(language, text);
                    } else {
                        self.insert_node(stem, language, text);
                    }
                    loaded += 1;
                }
            }
        }

        debug!(dir = %dir.display(), loaded, "Loaded templates from directory");
        Ok(loaded)
    }
}

impl Default for TemplateCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

fn slot(language: Language) -> usize {
    match language {
        Language::Php => 0,
        Language::Python => 1,
        Language::JavaScript => 2,
    }
}

fn read_template(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path)
        .map(|text| text.trim_end().to_string())
        .map_err(|e| io_error(path, e))
}

fn read_dir(path: &Path) -> Result<Vec<fs::DirEntry>, TemplateError> {
    let mut entries = fs::read_dir(path)
        .map_err(|e| io_error(path, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_error(path, e))?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn io_error(path: &Path, e: std::io::Error) -> TemplateError {
    TemplateError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
