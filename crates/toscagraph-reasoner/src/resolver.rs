use std::collections::BTreeSet;

use toscagraph_core::{
    Attribute, Capability, EntityScope, Identifier, Interface, Node, NodeFull, NodeKind,
    Operation, Parameter, Property, QuerySession, Requirement, Result, Row, Term,
    ToscaGraphError,
};
use toscagraph_store::{TemplateName, TemplateRepository};
use tracing::debug;

/// Resolves each entity kind from query rows into typed objects,
/// recursively populating nested collections. One resolver per session;
/// the session is an explicit, caller-owned value.
pub struct EntityResolver<'a, S: QuerySession> {
    session: &'a S,
    templates: &'a TemplateRepository,
}

/// Mandatory `entity`/`classifier` bindings plus the optional `value`,
/// straight off a classified-entity result row.
type RawEntity = (Identifier, Identifier, Option<String>);

impl<'a, S: QuerySession> EntityResolver<'a, S> {
    pub fn new(session: &'a S, templates: &'a TemplateRepository) -> Self {
        Self { session, templates }
    }

    pub(crate) fn session(&self) -> &'a S {
        self.session
    }

    pub(crate) fn templates(&self) -> &'a TemplateRepository {
        self.templates
    }

    pub fn attributes(
        &self,
        resource: &Identifier,
        scope: EntityScope,
    ) -> Result<BTreeSet<Attribute>> {
        let name = match scope {
            EntityScope::Class => TemplateName::Attributes,
            EntityScope::Template => TemplateName::AttributesTemplate,
        };
        self.classified(name, resource, |id, classifier, value, parameters| Attribute {
            id,
            classifier,
            value,
            parameters,
        })
    }

    pub fn properties(
        &self,
        resource: &Identifier,
        scope: EntityScope,
    ) -> Result<BTreeSet<Property>> {
        let name = match scope {
            EntityScope::Class => TemplateName::Properties,
            EntityScope::Template => TemplateName::PropertiesTemplate,
        };
        self.classified(name, resource, |id, classifier, value, parameters| Property {
            id,
            classifier,
            value,
            parameters,
        })
    }

    /// Declared deployment inputs of a model, as properties.
    pub fn inputs(&self, resource: &Identifier) -> Result<BTreeSet<Property>> {
        self.classified(
            TemplateName::Inputs,
            resource,
            |id, classifier, value, parameters| Property {
                id,
                classifier,
                value,
                parameters,
            },
        )
    }

    pub fn capabilities(
        &self,
        resource: &Identifier,
        scope: EntityScope,
    ) -> Result<BTreeSet<Capability>> {
        let name = match scope {
            EntityScope::Class => TemplateName::Capabilities,
            EntityScope::Template => TemplateName::CapabilitiesTemplate,
        };
        self.classified(name, resource, |id, classifier, value, parameters| Capability {
            id,
            classifier,
            value,
            parameters,
        })
    }

    pub fn requirements(
        &self,
        resource: &Identifier,
        scope: EntityScope,
    ) -> Result<BTreeSet<Requirement>> {
        let name = match scope {
            EntityScope::Class => TemplateName::Requirements,
            EntityScope::Template => TemplateName::RequirementsTemplate,
        };
        self.classified(name, resource, |id, classifier, value, parameters| Requirement {
            id,
            classifier,
            value,
            parameters,
        })
    }

    pub fn interfaces(
        &self,
        resource: &Identifier,
        scope: EntityScope,
    ) -> Result<BTreeSet<Interface>> {
        let name = match scope {
            EntityScope::Class => TemplateName::Interfaces,
            EntityScope::Template => TemplateName::InterfacesTemplate,
        };
        self.classified(name, resource, |id, classifier, value, parameters| Interface {
            id,
            classifier,
            value,
            parameters,
        })
    }

    pub fn operations(
        &self,
        resource: &Identifier,
        scope: EntityScope,
    ) -> Result<BTreeSet<Operation>> {
        let name = match scope {
            EntityScope::Class => TemplateName::Operations,
            EntityScope::Template => TemplateName::OperationsTemplate,
        };
        self.classified(name, resource, |id, classifier, value, parameters| Operation {
            id,
            classifier,
            value,
            parameters,
        })
    }

    /// Listing-level view of all node types reachable from the common root.
    pub fn nodes(&self) -> Result<BTreeSet<Node>> {
        let query = self.templates.prepare(TemplateName::Nodes, vec![]);
        let rows = self.session.select(&query)?;
        rows.iter().map(node_from_row).collect()
    }

    /// Full view of one node. Normative built-in types are skipped when
    /// `filter_normatives` is set; a store with zero rows yields `None`.
    pub fn node(&self, resource: &Identifier, filter_normatives: bool) -> Result<Option<NodeFull>> {
        if filter_normatives && resource.is_normative() {
            return Ok(None);
        }
        debug!(resource = %resource, "resolving node");

        let query = self.templates.prepare(
            TemplateName::Node,
            vec![("node".to_string(), Term::Iri(resource.clone()))],
        );
        let rows = self.session.select(&query)?;

        let mut resolved: Option<NodeFull> = None;
        for row in &rows {
            let (kind, node_type) = decode_node_kind(row)?;
            let mut full = NodeFull::new(resource.clone(), kind, node_type);
            full.description = row.opt_text("description");
            resolved = Some(full);
        }

        match resolved {
            Some(mut full) => {
                self.populate(&mut full)?;
                Ok(Some(full))
            }
            None => Ok(None),
        }
    }

    /// Optional human-readable description of a resource.
    pub fn description(&self, resource: &Identifier) -> Result<Option<String>> {
        let query = self.templates.prepare(
            TemplateName::Description,
            vec![("node".to_string(), Term::Iri(resource.clone()))],
        );
        let rows = self.session.select(&query)?;
        Ok(rows.first().and_then(|row| row.opt_text("description")))
    }

    /// All parameters classified by `classifier`, each carrying its own
    /// recursively resolved subtree. A cyclic has-parameter relation in
    /// the store fails with `CycleDetected` instead of recursing forever.
    pub fn parameters(&self, classifier: &Identifier) -> Result<BTreeSet<Parameter>> {
        let mut path = BTreeSet::new();
        self.parameters_guarded(classifier, &mut path)
    }

    fn parameters_guarded(
        &self,
        classifier: &Identifier,
        path: &mut BTreeSet<Identifier>,
    ) -> Result<BTreeSet<Parameter>> {
        if !path.insert(classifier.clone()) {
            return Err(ToscaGraphError::CycleDetected(classifier.clone()));
        }

        let query = self.templates.prepare(
            TemplateName::Parameters,
            vec![("var".to_string(), Term::Iri(classifier.clone()))],
        );
        let rows = self.session.select(&query)?;

        let mut resolved = BTreeSet::new();
        for row in &rows {
            let id = row.iri("parameter")?.clone();
            let sub_classifier = row.iri("classifier")?.clone();
            let value = row.opt_text("value");
            let parameters = self.parameters_guarded(&sub_classifier, path)?;
            resolved.insert(Parameter {
                id,
                classifier: sub_classifier,
                value,
                parameters,
            });
        }

        path.remove(classifier);
        Ok(resolved)
    }

    /// Concrete node types that are valid targets for a named requirement
    /// of `node_type`. Empty set, not an error, when no requirement
    /// definition matches.
    pub fn requirement_valid_nodes(
        &self,
        requirement_name: &str,
        node_type: &str,
    ) -> Result<BTreeSet<Node>> {
        let definition = match self.most_specific_requirement_node(requirement_name, node_type)? {
            Some(definition) => definition,
            None => return Ok(BTreeSet::new()),
        };
        debug!(definition = %definition, "most specific requirement definition");

        let query = self.templates.prepare(
            TemplateName::RequirementValidNodes,
            vec![("var".to_string(), Term::Iri(definition))],
        );
        let rows = self.session.select(&query)?;
        rows.iter().map(node_from_row).collect()
    }

    /// The single most specific requirement-definition node for the pair,
    /// or `None`. Specificity follows the query's ordering; the last
    /// matching row wins and ties are unspecified.
    fn most_specific_requirement_node(
        &self,
        requirement_name: &str,
        node_type: &str,
    ) -> Result<Option<Identifier>> {
        let query = self.templates.prepare(
            TemplateName::MostSpecificRequirementNode,
            vec![
                ("ofNode".to_string(), Term::literal(node_type)),
                ("requirementName".to_string(), Term::literal(requirement_name)),
            ],
        );
        let rows = self.session.select(&query)?;

        let mut definition = None;
        for row in &rows {
            definition = Some(row.iri("v")?.clone());
        }
        Ok(definition)
    }

    pub fn valid_target_types(
        &self,
        resource: &Identifier,
        scope: EntityScope,
    ) -> Result<BTreeSet<Identifier>> {
        let name = match scope {
            EntityScope::Class => TemplateName::ValidTargetTypes,
            EntityScope::Template => TemplateName::ValidTargetTypesTemplate,
        };
        let query = self.templates.prepare(
            name,
            vec![("var".to_string(), Term::literal(resource.as_str()))],
        );
        let rows = self.session.select(&query)?;
        rows.iter()
            .map(|row| Ok(row.iri("value")?.clone()))
            .collect()
    }

    /// Fill every classified-entity collection of `full`, depth-first.
    /// Instances resolve through the template query variants; class-level
    /// nodes through the class variants.
    pub(crate) fn populate(&self, full: &mut NodeFull) -> Result<()> {
        let scope = if full.is_instance {
            EntityScope::Template
        } else {
            EntityScope::Class
        };
        full.attributes = self.attributes(&full.id, scope)?;
        full.properties = self.properties(&full.id, scope)?;
        full.capabilities = self.capabilities(&full.id, scope)?;
        full.requirements = self.requirements(&full.id, scope)?;
        full.interfaces = self.interfaces(&full.id, scope)?;
        full.operations = self.operations(&full.id, scope)?;
        Ok(())
    }

    /// Shared materialization protocol for every classified entity kind:
    /// one query keyed by the resource, mandatory identifier/classifier
    /// bindings, optional value, then per-entity parameter-tree
    /// population. Duplicate rows collapse in the output set.
    fn classified<T, F>(
        &self,
        name: TemplateName,
        resource: &Identifier,
        make: F,
    ) -> Result<BTreeSet<T>>
    where
        T: Ord,
        F: Fn(Identifier, Identifier, Option<String>, BTreeSet<Parameter>) -> T,
    {
        debug!(query = name.as_str(), resource = %resource, "resolving entities");
        let query = self.templates.prepare(
            name,
            vec![("var".to_string(), Term::literal(resource.as_str()))],
        );
        let rows = self.session.select(&query)?;

        let raw: Vec<RawEntity> = rows
            .iter()
            .map(|row| {
                Ok((
                    row.iri("entity")?.clone(),
                    row.iri("classifier")?.clone(),
                    row.opt_text("value"),
                ))
            })
            .collect::<Result<_>>()?;

        raw.into_iter()
            .map(|(id, classifier, value)| {
                let parameters = self.parameters(&classifier)?;
                Ok(make(id, classifier, value, parameters))
            })
            .collect()
    }
}

fn node_from_row(row: &Row) -> Result<Node> {
    let mut node = Node::new(row.iri("node")?.clone(), row.iri("superclass")?.clone());
    node.description = row.opt_text("description");
    Ok(node)
}

/// Decode the node kind from the result shape, in exactly one place.
/// A `classType` binding wins over `instanceType` when both are present,
/// which matches the store's contract for class-level entities.
fn decode_node_kind(row: &Row) -> Result<(NodeKind, Identifier)> {
    if let Some(class_type) = row.opt_iri("classType") {
        return Ok((NodeKind::Template, class_type.clone()));
    }
    if let Some(instance_type) = row.opt_iri("instanceType") {
        return Ok((NodeKind::Instance, instance_type.clone()));
    }
    Err(ToscaGraphError::MissingBinding(
        "classType or instanceType".to_string(),
    ))
}
