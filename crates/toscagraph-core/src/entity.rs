use crate::{Identifier, Result, ToscaGraphError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which query variant an entity lookup targets: the class-level
/// description of a type, or a concrete node template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityScope {
    Class,
    Template,
}

/// Explicit discriminator for a resolved node, decoded from the query
/// result shape in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Class-level or template-level description.
    Template,
    /// Concrete instantiated resource.
    Instance,
}

/// A parameter classified by a type, optionally valued, carrying its own
/// nested parameter subtree. The subtree is built by recursive resolution
/// over the has-parameter relation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub id: Identifier,
    pub classifier: Identifier,
    pub value: Option<String>,
    pub parameters: BTreeSet<Parameter>,
}

impl Parameter {
    pub fn new(id: Identifier, classifier: Identifier) -> Self {
        Self {
            id,
            classifier,
            value: None,
            parameters: BTreeSet::new(),
        }
    }
}

macro_rules! classified_entity {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name {
            pub id: Identifier,
            pub classifier: Identifier,
            pub value: Option<String>,
            pub parameters: BTreeSet<Parameter>,
        }

        impl $name {
            pub fn new(id: Identifier, classifier: Identifier) -> Self {
                Self {
                    id,
                    classifier,
                    value: None,
                    parameters: BTreeSet::new(),
                }
            }
        }
    };
}

classified_entity!(
    /// A declared attribute of a node.
    Attribute
);
classified_entity!(
    /// A declared property of a node, or a deployment input.
    Property
);
classified_entity!(
    /// A capability a node provides.
    Capability
);
classified_entity!(
    /// A characteristic a node needs from another node.
    Requirement
);
classified_entity!(
    /// A lifecycle interface exposed by a node.
    Interface
);
classified_entity!(
    /// An operation declared on a node interface.
    Operation
);

/// Listing-level view of a node: identity, type, optional description.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: Identifier,
    pub description: Option<String>,
    pub node_type: Identifier,
}

impl Node {
    pub fn new(id: Identifier, node_type: Identifier) -> Self {
        Self {
            id,
            description: None,
            node_type,
        }
    }
}

/// Fully populated view of a node: every classified entity collection
/// resolved. `is_input` marks a pseudo-node standing for a declared
/// deployment input rather than a deployable resource; input pseudo-nodes
/// are never instances.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeFull {
    pub id: Identifier,
    pub node_type: Identifier,
    pub description: Option<String>,
    pub is_instance: bool,
    pub is_input: bool,
    pub attributes: BTreeSet<Attribute>,
    pub properties: BTreeSet<Property>,
    pub capabilities: BTreeSet<Capability>,
    pub requirements: BTreeSet<Requirement>,
    pub interfaces: BTreeSet<Interface>,
    pub operations: BTreeSet<Operation>,
}

impl NodeFull {
    pub fn new(id: Identifier, kind: NodeKind, node_type: Identifier) -> Self {
        Self {
            id,
            node_type,
            description: None,
            is_instance: matches!(kind, NodeKind::Instance),
            is_input: false,
            attributes: BTreeSet::new(),
            properties: BTreeSet::new(),
            capabilities: BTreeSet::new(),
            requirements: BTreeSet::new(),
            interfaces: BTreeSet::new(),
            operations: BTreeSet::new(),
        }
    }
}

/// Abstract Application Deployment Model: a named aggregate of node
/// templates and declared inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aadm {
    pub id: Identifier,
    pub user: Identifier,
    pub created_at: DateTime<Utc>,
    pub templates: BTreeSet<NodeFull>,
}

impl Aadm {
    pub fn new(id: Identifier, user: Identifier, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user,
            created_at,
            templates: BTreeSet::new(),
        }
    }
}

/// A capability kind the optimization inference engine knows how to
/// extract and match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityKind {
    Ngpu,
    Ncpu,
    Memsize,
    Disksize,
    Arch,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 5] = [
        CapabilityKind::Ngpu,
        CapabilityKind::Ncpu,
        CapabilityKind::Memsize,
        CapabilityKind::Disksize,
        CapabilityKind::Arch,
    ];

    /// The active whitelist used by default.
    pub const DEFAULT_WHITELIST: [CapabilityKind; 3] = [
        CapabilityKind::Ngpu,
        CapabilityKind::Memsize,
        CapabilityKind::Arch,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CapabilityKind::Ngpu => "ngpu",
            CapabilityKind::Ncpu => "ncpu",
            CapabilityKind::Memsize => "memsize",
            CapabilityKind::Disksize => "disksize",
            CapabilityKind::Arch => "arch",
        }
    }

    /// Size-like kinds carry a unit suffix and are normalized to their
    /// leading integer before rule matching.
    pub fn is_size_like(self) -> bool {
        matches!(self, CapabilityKind::Memsize | CapabilityKind::Disksize)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A validated optimization label. Constructed once at the rule-store
/// boundary; never string-manipulated downstream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptimizationLabel(String);

impl OptimizationLabel {
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.is_empty() || label.contains('"') {
            return Err(ToscaGraphError::InvalidLabel(label));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptimizationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inference engine output for one resource. Resources with an empty
/// optimization set are omitted from results entirely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateOptimization {
    pub resource: Identifier,
    pub optimizations: BTreeSet<OptimizationLabel>,
}
