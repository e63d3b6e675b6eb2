use toscagraph_core::{EntityScope, Identifier, Row, Term, ToscaGraphError};
use toscagraph_reasoner::EntityResolver;
use toscagraph_store::{MemorySession, TemplateName, TemplateRepository};

fn iri(value: &str) -> Identifier {
    Identifier::new(value)
}

const MY_NODE: &str = "https://example.org/workspace/my_node";

#[test]
fn class_and_template_variants_issue_different_queries() {
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Attributes,
        vec![("var", Term::literal(MY_NODE))],
        vec![Row::from_pairs([
            ("entity", Term::iri("https://example.org/attr/class_only")),
            ("classifier", Term::iri("https://example.org/AttrClass")),
        ])],
    );
    session.insert(
        TemplateName::AttributesTemplate,
        vec![("var", Term::literal(MY_NODE))],
        vec![Row::from_pairs([
            ("entity", Term::iri("https://example.org/attr/template_only")),
            ("classifier", Term::iri("https://example.org/AttrClass")),
            ("value", Term::literal("overridden")),
        ])],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let class_level = resolver.attributes(&iri(MY_NODE), EntityScope::Class).unwrap();
    let template_level = resolver
        .attributes(&iri(MY_NODE), EntityScope::Template)
        .unwrap();

    assert_eq!(class_level.len(), 1);
    assert_eq!(template_level.len(), 1);
    assert_ne!(class_level, template_level);
    assert_eq!(
        template_level.iter().next().unwrap().value.as_deref(),
        Some("overridden")
    );
}

#[test]
fn rows_without_the_value_binding_leave_value_absent() {
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Properties,
        vec![("var", Term::literal(MY_NODE))],
        vec![
            Row::from_pairs([
                ("entity", Term::iri("https://example.org/prop/unset")),
                ("classifier", Term::iri("https://example.org/PropClass")),
            ]),
            Row::from_pairs([
                ("entity", Term::iri("https://example.org/prop/set")),
                ("classifier", Term::iri("https://example.org/PropClass")),
                ("value", Term::literal("8")),
            ]),
        ],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let properties = resolver.properties(&iri(MY_NODE), EntityScope::Class).unwrap();
    assert_eq!(properties.len(), 2);
    let unset = properties
        .iter()
        .find(|p| p.id.local_name() == "unset")
        .unwrap();
    assert!(unset.value.is_none());
}

#[test]
fn duplicate_result_rows_collapse() {
    let row = Row::from_pairs([
        ("entity", Term::iri("https://example.org/cap/host")),
        ("classifier", Term::iri("https://example.org/CapClass")),
    ]);
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Capabilities,
        vec![("var", Term::literal(MY_NODE))],
        vec![row.clone(), row],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let capabilities = resolver
        .capabilities(&iri(MY_NODE), EntityScope::Class)
        .unwrap();
    assert_eq!(capabilities.len(), 1);
}

#[test]
fn entities_carry_their_parameter_subtrees() {
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Requirements,
        vec![("var", Term::literal(MY_NODE))],
        vec![Row::from_pairs([
            ("entity", Term::iri("https://example.org/req/host")),
            ("classifier", Term::iri("https://example.org/ReqClass")),
        ])],
    );
    session.insert(
        TemplateName::Parameters,
        vec![("var", Term::iri("https://example.org/ReqClass"))],
        vec![Row::from_pairs([
            ("parameter", Term::iri("https://example.org/param/node_filter")),
            ("classifier", Term::iri("https://example.org/FilterClass")),
            ("value", Term::literal("small")),
        ])],
    );
    session.insert(
        TemplateName::Parameters,
        vec![("var", Term::iri("https://example.org/FilterClass"))],
        vec![Row::from_pairs([
            ("parameter", Term::iri("https://example.org/param/cpu")),
            ("classifier", Term::iri("https://example.org/CpuClass")),
        ])],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let requirements = resolver
        .requirements(&iri(MY_NODE), EntityScope::Class)
        .unwrap();
    let requirement = requirements.iter().next().unwrap();
    assert_eq!(requirement.parameters.len(), 1);
    let parameter = requirement.parameters.iter().next().unwrap();
    assert_eq!(parameter.value.as_deref(), Some("small"));
    assert_eq!(parameter.parameters.len(), 1);
}

#[test]
fn cyclic_parameter_relations_are_a_defined_failure() {
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Parameters,
        vec![("var", Term::iri("https://example.org/C1"))],
        vec![Row::from_pairs([
            ("parameter", Term::iri("https://example.org/p1")),
            ("classifier", Term::iri("https://example.org/C2")),
        ])],
    );
    session.insert(
        TemplateName::Parameters,
        vec![("var", Term::iri("https://example.org/C2"))],
        vec![Row::from_pairs([
            ("parameter", Term::iri("https://example.org/p2")),
            ("classifier", Term::iri("https://example.org/C1")),
        ])],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    assert!(matches!(
        resolver.parameters(&iri("https://example.org/C1")),
        Err(ToscaGraphError::CycleDetected(_))
    ));
}

#[test]
fn shared_parameter_classifiers_are_not_cycles() {
    // A diamond: both branches reuse the same leaf classifier.
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Parameters,
        vec![("var", Term::iri("https://example.org/Root"))],
        vec![
            Row::from_pairs([
                ("parameter", Term::iri("https://example.org/left")),
                ("classifier", Term::iri("https://example.org/Leaf")),
            ]),
            Row::from_pairs([
                ("parameter", Term::iri("https://example.org/right")),
                ("classifier", Term::iri("https://example.org/Leaf")),
            ]),
        ],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let parameters = resolver.parameters(&iri("https://example.org/Root")).unwrap();
    assert_eq!(parameters.len(), 2);
}

#[test]
fn node_resolution_is_idempotent_and_order_independent() {
    let node_row = Row::from_pairs([
        ("instanceType", Term::iri("https://example.org/VM")),
        ("description", Term::literal("a virtual machine")),
    ]);
    let attr_rows = vec![
        Row::from_pairs([
            ("entity", Term::iri("https://example.org/attr/a")),
            ("classifier", Term::iri("https://example.org/AttrClass")),
        ]),
        Row::from_pairs([
            ("entity", Term::iri("https://example.org/attr/b")),
            ("classifier", Term::iri("https://example.org/AttrClass")),
        ]),
    ];

    let build = |attr_order: Vec<Row>| {
        let mut session = MemorySession::new();
        session.insert(
            TemplateName::Node,
            vec![("node", Term::iri(MY_NODE))],
            vec![node_row.clone()],
        );
        session.insert(
            TemplateName::AttributesTemplate,
            vec![("var", Term::literal(MY_NODE))],
            attr_order,
        );
        let templates = TemplateRepository::bundled();
        let resolver = EntityResolver::new(&session, &templates);
        resolver.node(&iri(MY_NODE), false).unwrap().unwrap()
    };

    let forward = build(attr_rows.clone());
    let reversed = build(attr_rows.into_iter().rev().collect());
    let again = build(vec![
        Row::from_pairs([
            ("entity", Term::iri("https://example.org/attr/b")),
            ("classifier", Term::iri("https://example.org/AttrClass")),
        ]),
        Row::from_pairs([
            ("entity", Term::iri("https://example.org/attr/a")),
            ("classifier", Term::iri("https://example.org/AttrClass")),
        ]),
    ]);

    assert!(forward.is_instance);
    assert_eq!(forward.attributes.len(), 2);
    assert_eq!(forward, reversed);
    assert_eq!(forward, again);
}

#[test]
fn normative_resources_are_filtered_on_request() {
    let session = MemorySession::new();
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let builtin = iri("https://www.sodalite.eu/ontologies/tosca/tosca.nodes.Compute");
    assert!(resolver.node(&builtin, true).unwrap().is_none());
}

#[test]
fn unknown_nodes_resolve_to_none() {
    let session = MemorySession::new();
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    assert!(resolver.node(&iri(MY_NODE), false).unwrap().is_none());
}

#[test]
fn requirement_valid_nodes_follow_the_most_specific_definition() {
    let mut session = MemorySession::new();
    // Subtype chain: the broad definition comes first, the most specific
    // definition is the last matching row.
    session.insert(
        TemplateName::MostSpecificRequirementNode,
        vec![
            ("ofNode", Term::literal("NodeTypeX")),
            ("requirementName", Term::literal("hosting")),
        ],
        vec![
            Row::from_pairs([("v", Term::iri("https://example.org/req/broad"))]),
            Row::from_pairs([("v", Term::iri("https://example.org/req/specific"))]),
        ],
    );
    session.insert(
        TemplateName::RequirementValidNodes,
        vec![("var", Term::iri("https://example.org/req/broad"))],
        vec![Row::from_pairs([
            ("node", Term::iri("https://example.org/nodes/anything")),
            ("superclass", Term::iri("https://example.org/Root")),
        ])],
    );
    session.insert(
        TemplateName::RequirementValidNodes,
        vec![("var", Term::iri("https://example.org/req/specific"))],
        vec![Row::from_pairs([
            ("node", Term::iri("https://example.org/nodes/gpu_host")),
            ("superclass", Term::iri("https://example.org/Compute")),
        ])],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let nodes = resolver.requirement_valid_nodes("hosting", "NodeTypeX").unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(
        nodes.iter().next().unwrap().id.as_str(),
        "https://example.org/nodes/gpu_host"
    );
}

#[test]
fn missing_requirement_definition_yields_the_empty_set() {
    let session = MemorySession::new();
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let nodes = resolver.requirement_valid_nodes("hosting", "Unknown").unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn valid_target_types_resolve_per_scope() {
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::ValidTargetTypes,
        vec![("var", Term::literal(MY_NODE))],
        vec![Row::from_pairs([(
            "value",
            Term::iri("https://example.org/Compute"),
        )])],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let class_level = resolver
        .valid_target_types(&iri(MY_NODE), EntityScope::Class)
        .unwrap();
    assert_eq!(class_level.len(), 1);

    let template_level = resolver
        .valid_target_types(&iri(MY_NODE), EntityScope::Template)
        .unwrap();
    assert!(template_level.is_empty());
}

#[test]
fn declared_inputs_resolve_as_properties() {
    let model = "https://example.org/workspace/model_1";
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Inputs,
        vec![("var", Term::literal(model))],
        vec![Row::from_pairs([
            ("entity", Term::iri("https://example.org/inputs/ssh_key")),
            ("classifier", Term::iri("https://example.org/StringInput")),
            ("value", Term::literal("id_rsa.pub")),
        ])],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let inputs = resolver.inputs(&iri(model)).unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(
        inputs.iter().next().unwrap().value.as_deref(),
        Some("id_rsa.pub")
    );
}

#[test]
fn descriptions_are_optional() {
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Description,
        vec![("node", Term::iri(MY_NODE))],
        vec![Row::from_pairs([(
            "description",
            Term::literal("a described node"),
        )])],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    assert_eq!(
        resolver.description(&iri(MY_NODE)).unwrap().as_deref(),
        Some("a described node")
    );
    assert!(resolver
        .description(&iri("https://example.org/undescribed"))
        .unwrap()
        .is_none());
}

#[test]
fn node_listing_reads_description_and_type() {
    let mut session = MemorySession::new();
    session.insert(
        TemplateName::Nodes,
        vec![],
        vec![
            Row::from_pairs([
                ("node", Term::iri("https://example.org/nodes/web")),
                ("superclass", Term::iri("https://example.org/SoftwareComponent")),
                ("description", Term::literal("web tier")),
            ]),
            Row::from_pairs([
                ("node", Term::iri("https://example.org/nodes/db")),
                ("superclass", Term::iri("https://example.org/Database")),
            ]),
        ],
    );
    let templates = TemplateRepository::bundled();
    let resolver = EntityResolver::new(&session, &templates);

    let nodes = resolver.nodes().unwrap();
    assert_eq!(nodes.len(), 2);
    let db = nodes.iter().find(|n| n.id.local_name() == "db").unwrap();
    assert!(db.description.is_none());
}
