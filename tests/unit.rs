//! Unit tests for identifiers, expressions, inventories and templates.
mod common;
use honyaku::expression::parsing::{parse_envelope, referenced_parameters};
use honyaku::expression::{ExpressionResolver, Resolved, SourceBucket};
use honyaku::identifier::{class_identifier, method_identifier};
use honyaku::inventory::ParamType;
use honyaku::prelude::*;
use honyaku::template::{Placeholders, Template};
use honyaku::workflow::short_type;
use serde_json::json;

#[test]
fn test_method_identifier_camel_case() {
    assert_eq!(method_identifier("HTTP Request", Language::Php), "httpRequest");
    assert_eq!(method_identifier("send_email-now", Language::Python), "sendEmailNow");
    assert_eq!(
        method_identifier("Conselheiro Bíblico", Language::JavaScript),
        "conselheiroBiblico"
    );
}

#[test]
fn test_method_identifier_fallbacks() {
    assert_eq!(method_identifier("", Language::Php), "node");
    assert_eq!(method_identifier("!!! ???", Language::Php), "node");
    assert_eq!(method_identifier("1st step", Language::Python), "node1stStep");
}

#[test]
fn test_method_identifier_avoids_reserved_words() {
    assert_eq!(method_identifier("Run", Language::Php), "runNode");
    assert_eq!(method_identifier("class", Language::Python), "classNode");
    assert_eq!(method_identifier("constructor", Language::JavaScript), "constructorNode");
    // Not reserved in PHP.
    assert_eq!(method_identifier("constructor", Language::Php), "constructor");
}

#[test]
fn test_class_identifier() {
    assert_eq!(class_identifier("support bot"), "SupportBot");
    assert_eq!(class_identifier("Café Órders v2"), "CafeOrdersV2");
    assert_eq!(class_identifier(""), "Workflow");
    assert_eq!(class_identifier("42"), "Workflow42");
    assert_eq!(class_identifier("class"), "ClassWorkflow");
}

#[test]
fn test_identifier_validity_property() {
    let names = [
        "HTTP Request",
        "Conselheiro Bíblico",
        "1st step",
        "",
        "   ",
        "run",
        "Return",
        "__construct",
        "getContext",
        "日本語",
        "a-b_c.d",
        "while",
        "null",
        "Params",
        "context",
    ];
    for language in Language::ALL {
        let backend = language.backend();
        for name in names {
            for ident in [method_identifier(name, language), class_identifier(name)] {
                assert!(
                    ident.starts_with(|c: char| c.is_ascii_alphabetic()),
                    "{:?} -> {:?} must start with a letter",
                    name,
                    ident
                );
                assert!(ident.chars().all(|c| c.is_ascii_alphanumeric()), "{:?}", ident);
                assert!(!backend.is_reserved(&ident), "{:?} is reserved in {}", ident, language);
            }
        }
    }
}

#[test]
fn test_parse_envelope_buckets() {
    let reference = parse_envelope("={{ $json.body.msg }}").expect("should parse");
    assert_eq!(reference.bucket, Some(SourceBucket::Body));
    assert_eq!(reference.parameter(), "msg");
    assert!(reference.rest().is_empty());

    let reference = parse_envelope("={{ $json.query.page.size }}").expect("should parse");
    assert_eq!(reference.bucket, Some(SourceBucket::Query));
    assert_eq!(reference.path, vec!["page", "size"]);
    assert_eq!(reference.to_string(), "$json.query.page.size");

    let reference = parse_envelope(r"={{ \$json.headers.token }}").expect("escaped sigil");
    assert_eq!(reference.bucket, Some(SourceBucket::Headers));
    assert_eq!(reference.parameter(), "token");
}

#[test]
fn test_parse_envelope_fallbacks() {
    // Node reference: the last bucket marker wins.
    let reference = parse_envelope("={{ $('Webhook').item.json.body.email }}").expect("should parse");
    assert_eq!(reference.bucket, Some(SourceBucket::Body));
    assert_eq!(reference.parameter(), "email");

    let reference = parse_envelope("={{ $json.customer.id }}").expect("bare path");
    assert_eq!(reference.bucket, None);
    assert_eq!(reference.path, vec!["customer", "id"]);

    assert!(parse_envelope("={{ $now.toISO() }}").is_none());
    assert!(parse_envelope("hello").is_none());
    assert!(parse_envelope("={{ $json.body. }}").is_none());
}

#[test]
fn test_referenced_parameters() {
    let text = "={{ $json.body.first }} and ={{ $json.query.second.deep }} and $json.other";
    let found: Vec<&str> = referenced_parameters(text).collect();
    assert_eq!(found, vec!["first", "second"]);
}

#[test]
fn test_resolve_scenario_a_body_accessor() {
    let mut inventory = ParameterInventory::new();
    let mut resolver = ExpressionResolver::new(Language::Php.backend(), &mut inventory);

    let resolved = resolver.resolve("={{ $json.body.msg }}");
    assert_eq!(resolved, Resolved::Accessor("$this->params['msg']".to_string()));
    assert_eq!(inventory.get("msg"), Some(ParamType::Dynamic));
    assert_eq!(ParamType::Dynamic.to_string(), "dynamic");
}

#[test]
fn test_resolve_scenario_b_nested_accessor() {
    let mut inventory = ParameterInventory::new();
    for (language, expected) in [
        (Language::Php, "$this->params['data']['name']"),
        (Language::Python, "self.params['data']['name']"),
        (Language::JavaScript, "this.params['data']['name']"),
    ] {
        let mut resolver = ExpressionResolver::new(language.backend(), &mut inventory);
        assert_eq!(
            resolver.resolve_embedded("={{ $json.body.data.name }}"),
            expected
        );
    }
    assert_eq!(inventory.names().collect::<Vec<_>>(), vec!["data"]);
}

#[test]
fn test_resolve_scenario_c_plain_literal() {
    let mut inventory = ParameterInventory::new();
    let mut resolver = ExpressionResolver::new(Language::Python.backend(), &mut inventory);

    assert_eq!(resolver.resolve("hello"), Resolved::Literal("hello".to_string()));
    assert_eq!(resolver.resolve_embedded("hello"), "\"hello\"");
    assert!(inventory.is_empty());
}

#[test]
fn test_resolve_unparseable_envelope_is_quoted() {
    let mut inventory = ParameterInventory::new();
    let mut resolver = ExpressionResolver::new(Language::JavaScript.backend(), &mut inventory);

    assert_eq!(
        resolver.resolve_embedded("={{ $now.toISO() }}"),
        "\"={{ $now.toISO() }}\""
    );
    assert!(inventory.is_empty());
}

#[test]
fn test_envelope_idempotence() {
    let mut inventory = ParameterInventory::new();
    let mut resolver = ExpressionResolver::new(Language::Php.backend(), &mut inventory);

    let first = resolver.resolve_embedded("just text");
    let second = resolver.resolve_embedded("just text");
    assert_eq!(first, second);

    let accessor = resolver.resolve_embedded("={{ $json.body.msg }}");
    assert!(!accessor.starts_with('"'), "single accessor must not be re-quoted: {}", accessor);
}

#[test]
fn test_resolve_composite_string() {
    let mut inventory = ParameterInventory::new();
    let mut resolver = ExpressionResolver::new(Language::Python.backend(), &mut inventory);

    let code = resolver.resolve_embedded("Hi ={{ $json.body.name }}, order ={{ $json.query.id }}");
    assert_eq!(code, "\"Hi self.params['name'], order self.params['id']\"");
    assert_eq!(inventory.names().collect::<Vec<_>>(), vec!["name", "id"]);
}

#[test]
fn test_render_value_tree() {
    let mut inventory = ParameterInventory::new();
    let mut resolver = ExpressionResolver::new(Language::Python.backend(), &mut inventory);

    let code = resolver.render_value(&json!({
        "user": "={{ $json.body.user }}",
        "active": true,
        "tags": ["a", null],
        "count": 3,
    }));
    assert_eq!(
        code,
        "{'user': self.params['user'], 'active': True, 'tags': [\"a\", None], 'count': 3}"
    );
}

#[test]
fn test_inventory_keeps_insertion_order() {
    let mut inventory = ParameterInventory::new();
    assert!(inventory.register("b"));
    assert!(inventory.register("a"));
    assert!(!inventory.register("b"));
    assert_eq!(inventory.names().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(inventory.len(), 2);

    let mut smaller = ParameterInventory::new();
    smaller.register("a");
    assert!(inventory.is_superset_of(&smaller));
    assert!(!smaller.is_superset_of(&inventory));
}

#[test]
fn test_template_substitution_reindents_and_keeps_unknown() {
    let template = Template::new("class X {\n    {{body}}\n    {{ other }}\n}");
    assert_eq!(template.placeholders(), vec!["body", "other"]);

    let mut values = Placeholders::new();
    values.set("body", "line1\nline2");
    let rendered = template.render(&values);
    assert_eq!(rendered, "class X {\n    line1\n    line2\n    {{ other }}\n}");
}

#[test]
fn test_template_values_are_not_rescanned() {
    let template = Template::new("a({{body}}) b({{other}})");
    let mut values = Placeholders::new();
    values.set("body", "{{other}}").set("other", "x");
    assert_eq!(template.render(&values), "a({{other}}) b(x)");
}

#[test]
fn test_short_type() {
    assert_eq!(short_type("n8n-nodes-base.httpRequest"), "httpRequest");
    assert_eq!(short_type("@n8n/n8n-nodes-langchain.agent"), "agent");
    assert_eq!(short_type("n8n-nodes-start"), "start");
    assert_eq!(short_type("webhook"), "webhook");
}

#[test]
fn test_language_parsing() {
    assert_eq!("php".parse::<Language>().ok(), Some(Language::Php));
    assert_eq!("PY".parse::<Language>().ok(), Some(Language::Python));
    assert_eq!("js".parse::<Language>().ok(), Some(Language::JavaScript));

    let err = "cobol".parse::<Language>().unwrap_err();
    assert!(matches!(err, TemplateError::UnknownLanguage(ref l) if l == "cobol"));
    assert_eq!(err.to_string(), "Unknown target language 'cobol'");
}

#[test]
fn test_error_display() {
    let err = CompileError::MissingClassTemplate {
        language: Language::Python,
    };
    assert_eq!(err.to_string(), "No class template is registered for language 'python'");

    let err = CompileError::EmptyWorkflow {
        workflow: "Empty".to_string(),
    };
    assert_eq!(err.to_string(), "Workflow 'Empty' contains no nodes");

    let err = WorkflowError::ValidationError("duplicate node id 'x'".to_string());
    assert_eq!(err.to_string(), "Invalid workflow data: duplicate node id 'x'");
}
