//! Integration tests for Honyaku
//!
//! End-to-end tests: JSON intake, template directories and multi-language output.
//!
mod common;
use common::*;
use honyaku::prelude::*;
use std::fs;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_exported_workflow_intake() {
        let graph = WorkflowGraph::from_json(EXPORTED_WORKFLOW_JSON).expect("Failed to parse workflow");

        assert_eq!(graph.id.as_deref(), Some("42"));
        assert_eq!(graph.name, "Order Intake");
        assert_eq!(graph.nodes.len(), 3);

        let successors = |id: &str| -> Vec<String> {
            graph
                .node(id)
                .expect("node exists")
                .successor_ids()
                .map(str::to_string)
                .collect()
        };
        assert_eq!(successors("a1"), vec!["b2"]);
        assert_eq!(successors("b2"), vec!["c3"]);
        assert!(successors("c3").is_empty());
    }

    #[test]
    fn test_per_node_connection_shape() {
        let json = r#"{
            "name": "Inline",
            "nodes": [
                { "id": "n1", "name": "Start", "type": "n8n-nodes-base.manualTrigger",
                  "connections": { "main": [["n3"], [{ "node": "n2" }]] } },
                { "id": "n2", "name": "Second", "type": "n8n-nodes-base.set" },
                { "id": "n3", "name": "Third", "type": "n8n-nodes-base.set" }
            ]
        }"#;
        let graph = WorkflowGraph::from_json(json).expect("Failed to parse workflow");
        let first = graph.node("n1").expect("n1");
        assert_eq!(first.successor_ids().collect::<Vec<_>>(), vec!["n3", "n2"]);
        assert_eq!(first.connections[0].key, "main");
    }

    #[test]
    fn test_intake_defaults_and_fallback_ids() {
        let json = r#"{ "nodes": [
            { "name": "Named Only", "type": "n8n-nodes-base.set" },
            { "type": "n8n-nodes-base.set" }
        ] }"#;
        let graph = WorkflowGraph::from_json(json).expect("Failed to parse workflow");

        assert_eq!(graph.name, "Workflow");
        assert!(graph.id.is_none());
        assert_eq!(graph.nodes[0].id, "Named Only");
        assert_eq!(graph.nodes[1].id, "node-1");
        assert_eq!(graph.nodes[1].name, "node-1");
        assert!(graph.nodes[1].parameters.is_object());
    }

    #[test]
    fn test_intake_errors() {
        let err = WorkflowGraph::from_json("{ not json").unwrap_err();
        assert!(matches!(err, WorkflowError::JsonParseError(_)));
        assert!(err.to_string().starts_with("Failed to parse workflow JSON:"));

        let duplicate = r#"{ "nodes": [
            { "id": "x", "name": "One", "type": "t" },
            { "id": "x", "name": "Two", "type": "t" }
        ] }"#;
        let err = WorkflowGraph::from_json(duplicate).unwrap_err();
        assert_eq!(err.to_string(), "Invalid workflow data: duplicate node id 'x'");
    }

    #[test]
    fn test_custom_model_into_workflow() {
        struct Step {
            key: &'static str,
            kind: &'static str,
        }
        struct Pipeline {
            title: &'static str,
            steps: Vec<Step>,
        }

        impl IntoWorkflow for Pipeline {
            fn into_workflow(self) -> std::result::Result<WorkflowGraph, WorkflowError> {
                let count = self.steps.len();
                let nodes = self
                    .steps
                    .into_iter()
                    .enumerate()
                    .map(|(i, s)| {
                        let node = Node::new(s.key, s.key, s.kind);
                        if i + 1 < count {
                            node.connect("main", format!("step{}", i + 2))
                        } else {
                            node
                        }
                    })
                    .collect();
                Ok(WorkflowGraph::new(self.title, nodes))
            }
        }

        let pipeline = Pipeline {
            title: "Custom",
            steps: vec![
                Step { key: "step1", kind: "n8n-nodes-base.webhook" },
                Step { key: "step2", kind: "n8n-nodes-base.httpRequest" },
            ],
        };
        let graph = pipeline.into_workflow().expect("converts");
        let unit = Compiler::default().compile(&graph, Language::Php).expect("compiles");
        assert!(unit.source.contains("$this->step1();\n            $this->step2();"));
    }

    #[test]
    fn test_exported_workflow_all_languages() {
        let graph = WorkflowGraph::from_json(EXPORTED_WORKFLOW_JSON).expect("Failed to parse workflow");
        let compiler = Compiler::default();

        let results = compiler.compile_all(&graph, &Language::ALL);
        assert_eq!(results.len(), 3);

        for (language, result) in results {
            let unit = result.unwrap_or_else(|e| panic!("{} failed: {}", language, e));
            assert_eq!(unit.language, language);
            assert_eq!(unit.class_name, "OrderIntake");
            assert_eq!(unit.credentials, vec!["OpenRouterCredentials"]);
            assert_eq!(
                unit.inventory.names().collect::<Vec<_>>(),
                vec!["order_id", "amount", "note"]
            );
            assert!(unit.source.contains("https://openrouter.ai/api/v1/chat/completions"));
            assert!(unit.source.contains("\"openai/gpt-4o-mini\""));
            assert!(!unit.source.contains("{{"), "unresolved placeholder in {}:\n{}", language, unit.source);
        }
    }

    #[test]
    fn test_exported_workflow_php_body() {
        let graph = WorkflowGraph::from_json(EXPORTED_WORKFLOW_JSON).expect("Failed to parse workflow");
        let unit = Compiler::default().compile(&graph, Language::Php).expect("compiles");

        assert!(unit.source.contains("$body = ['order' => $this->params['order_id'], 'source' => \"webhook\"];"));
        assert!(unit.source.contains("CURLOPT_CUSTOMREQUEST, \"POST\""));
        assert!(unit.source.contains("'content' => $this->params['note']"));
        assert!(unit.source.contains("(new OpenRouterCredentials())->getApiKey()"));
        assert_eq!(unit.file_name(), "Order_Intake.php");
    }

    #[test]
    fn test_template_directory_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join("classes")).expect("mkdir");
        fs::create_dir_all(root.join("nodes").join("python")).expect("mkdir");

        fs::write(
            root.join("classes").join("python.tpl"),
            "class {{class_name}}:\n    {{steps_methods}}\n",
        )
        .expect("write");
        fs::write(
            root.join("nodes").join("python").join("httpRequest.tpl"),
            "def {{method_name}}(self):\n    return {{url}}\n",
        )
        .expect("write");
        fs::write(
            root.join("nodes").join("python").join("_fallback.tpl"),
            "def {{method_name}}(self):\n    pass  # {{node_type}}",
        )
        .expect("write");
        fs::write(root.join("nodes").join("python").join("notes.txt"), "ignored").expect("write");

        let mut catalogue = TemplateCatalogue::builtin();
        let loaded = catalogue.load_dir(root).expect("Failed to load templates");
        assert_eq!(loaded, 3);

        let graph = WorkflowGraph::new(
            "Override",
            vec![
                http_node("1", "Call", serde_json::json!({ "url": "={{ $json.query.target }}" }))
                    .connect("main", "2"),
                Node::new("2", "Other", "n8n-nodes-base.slack"),
            ],
        );
        let unit = Compiler::builder(catalogue)
            .build()
            .compile(&graph, Language::Python)
            .expect("compiles");

        assert_eq!(
            unit.source,
            "class Override:\n    def call(self):\n        return self.params['target']\n\n    def other(self):\n        pass  # n8n-nodes-base.slack"
        );
    }

    #[test]
    fn test_aliases_follow_directory_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nodes = dir.path().join("nodes").join("php");
        fs::create_dir_all(&nodes).expect("mkdir");
        fs::write(nodes.join("aiAgent.tpl"), "// custom agent {{method_name}}").expect("write");
        fs::write(nodes.join("webhook.tpl"), "// custom hook {{method_name}}").expect("write");

        let mut catalogue = TemplateCatalogue::builtin();
        catalogue.load_dir(dir.path()).expect("Failed to load templates");

        let graph = WorkflowGraph::new(
            "Aliased",
            vec![
                Node::new("1", "Begin", "n8n-nodes-base.start").connect("main", "2"),
                Node::new("2", "Plain", "aiAgent").connect("main", "3"),
                Node::new("3", "Chain", "@n8n/n8n-nodes-langchain.agent"),
            ],
        );
        let unit = Compiler::builder(catalogue)
            .build()
            .compile(&graph, Language::Php)
            .expect("compiles");

        assert!(unit.source.contains("// custom hook begin"));
        assert!(unit.source.contains("// custom agent plain"));
        assert!(unit.source.contains("// custom agent chain"));
        assert!(!unit.source.contains("curl_init"));
    }

    #[test]
    fn test_template_directory_unknown_language() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nodes = dir.path().join("nodes").join("cobol");
        fs::create_dir_all(&nodes).expect("mkdir");
        fs::write(nodes.join("webhook.tpl"), "X").expect("write");

        let mut catalogue = TemplateCatalogue::builtin();
        let err = catalogue.load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownLanguage(ref l) if l == "cobol"));
    }

    #[test]
    fn test_builtin_catalogue_covers_all_languages() {
        let catalogue = TemplateCatalogue::builtin();
        assert_eq!(catalogue.languages(), Language::ALL.to_vec());

        for language in Language::ALL {
            assert!(catalogue.class_template(language).is_some());
            for type_tag in [
                "n8n-nodes-base.webhook",
                "n8n-nodes-base.httpRequest",
                "@n8n/n8n-nodes-langchain.agent",
                "aiAgent",
                "n8n-nodes-base.start",
            ] {
                assert!(
                    !catalogue.node_template(type_tag, language).is_fallback(),
                    "{} should have a template for {}",
                    type_tag,
                    language
                );
            }
            assert!(catalogue.node_template("n8n-nodes-base.slack", language).is_fallback());
        }
    }
}
