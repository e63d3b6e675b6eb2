use std::collections::HashMap;
use std::path::Path;

use toscagraph_core::{CapabilityKind, PreparedQuery, Result, Term};

/// Namespace prefixes for the main deployment-model graph.
pub const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX dcterms: <http://purl.org/dc/terms/>
PREFIX sesame: <http://www.openrdf.org/schema/sesame#>
PREFIX DUL: <http://www.ontologydesignpatterns.org/ont/dul/DUL.owl#>
PREFIX tosca: <https://www.sodalite.eu/ontologies/tosca/>
PREFIX soda: <https://www.sodalite.eu/ontologies/workspace/1/>
";

/// Namespace prefixes for the optimization rule store. Logically a
/// separate query namespace, reached through the same session.
pub const OPT_PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX opt: <https://www.sodalite.eu/ontologies/optimizations/>
";

/// Every query the resolvers issue, one variant each. Class-level and
/// template-level lookups are distinct templates; the only structural
/// difference between the pair is which query is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    Attributes,
    AttributesTemplate,
    Properties,
    PropertiesTemplate,
    Inputs,
    Capabilities,
    CapabilitiesTemplate,
    Requirements,
    RequirementsTemplate,
    Interfaces,
    InterfacesTemplate,
    Operations,
    OperationsTemplate,
    Node,
    Nodes,
    Description,
    Parameters,
    Aadm,
    MostSpecificRequirementNode,
    RequirementValidNodes,
    ValidTargetTypes,
    ValidTargetTypesTemplate,
    NodeTemplateCapabilities,
    CapabilityValue(CapabilityKind),
    FrameworkOptimizations(CapabilityKind),
}

impl TemplateName {
    pub const ALL: [TemplateName; 33] = [
        TemplateName::Attributes,
        TemplateName::AttributesTemplate,
        TemplateName::Properties,
        TemplateName::PropertiesTemplate,
        TemplateName::Inputs,
        TemplateName::Capabilities,
        TemplateName::CapabilitiesTemplate,
        TemplateName::Requirements,
        TemplateName::RequirementsTemplate,
        TemplateName::Interfaces,
        TemplateName::InterfacesTemplate,
        TemplateName::Operations,
        TemplateName::OperationsTemplate,
        TemplateName::Node,
        TemplateName::Nodes,
        TemplateName::Description,
        TemplateName::Parameters,
        TemplateName::Aadm,
        TemplateName::MostSpecificRequirementNode,
        TemplateName::RequirementValidNodes,
        TemplateName::ValidTargetTypes,
        TemplateName::ValidTargetTypesTemplate,
        TemplateName::NodeTemplateCapabilities,
        TemplateName::CapabilityValue(CapabilityKind::Ngpu),
        TemplateName::CapabilityValue(CapabilityKind::Ncpu),
        TemplateName::CapabilityValue(CapabilityKind::Memsize),
        TemplateName::CapabilityValue(CapabilityKind::Disksize),
        TemplateName::CapabilityValue(CapabilityKind::Arch),
        TemplateName::FrameworkOptimizations(CapabilityKind::Ngpu),
        TemplateName::FrameworkOptimizations(CapabilityKind::Ncpu),
        TemplateName::FrameworkOptimizations(CapabilityKind::Memsize),
        TemplateName::FrameworkOptimizations(CapabilityKind::Disksize),
        TemplateName::FrameworkOptimizations(CapabilityKind::Arch),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateName::Attributes => "getAttributes",
            TemplateName::AttributesTemplate => "getAttributesTemplate",
            TemplateName::Properties => "getProperties",
            TemplateName::PropertiesTemplate => "getPropertiesTemplate",
            TemplateName::Inputs => "getInputs",
            TemplateName::Capabilities => "getCapabilities",
            TemplateName::CapabilitiesTemplate => "getCapabilitiesTemplate",
            TemplateName::Requirements => "getRequirements",
            TemplateName::RequirementsTemplate => "getRequirementsTemplate",
            TemplateName::Interfaces => "getInterfaces",
            TemplateName::InterfacesTemplate => "getInterfacesTemplate",
            TemplateName::Operations => "getOperations",
            TemplateName::OperationsTemplate => "getOperationsTemplate",
            TemplateName::Node => "getNode",
            TemplateName::Nodes => "getNodes",
            TemplateName::Description => "getDescription",
            TemplateName::Parameters => "getParameters",
            TemplateName::Aadm => "getAADM",
            TemplateName::MostSpecificRequirementNode => "getMostSpecificRequirementNode",
            TemplateName::RequirementValidNodes => "getRequirementValidNodes",
            TemplateName::ValidTargetTypes => "getValidTargetTypes",
            TemplateName::ValidTargetTypesTemplate => "getValidTargetTypesTemplate",
            TemplateName::NodeTemplateCapabilities => "getNodeTemplateCapabilities",
            TemplateName::CapabilityValue(CapabilityKind::Ngpu) => "getNodeTemplate_ngpu",
            TemplateName::CapabilityValue(CapabilityKind::Ncpu) => "getNodeTemplate_ncpu",
            TemplateName::CapabilityValue(CapabilityKind::Memsize) => "getNodeTemplate_memsize",
            TemplateName::CapabilityValue(CapabilityKind::Disksize) => "getNodeTemplate_disksize",
            TemplateName::CapabilityValue(CapabilityKind::Arch) => "getNodeTemplate_arch",
            TemplateName::FrameworkOptimizations(CapabilityKind::Ngpu) => {
                "getFrameworkOptimizations_ngpu"
            }
            TemplateName::FrameworkOptimizations(CapabilityKind::Ncpu) => {
                "getFrameworkOptimizations_ncpu"
            }
            TemplateName::FrameworkOptimizations(CapabilityKind::Memsize) => {
                "getFrameworkOptimizations_memsize"
            }
            TemplateName::FrameworkOptimizations(CapabilityKind::Disksize) => {
                "getFrameworkOptimizations_disksize"
            }
            TemplateName::FrameworkOptimizations(CapabilityKind::Arch) => {
                "getFrameworkOptimizations_arch"
            }
        }
    }

    /// Path of the template file, relative to a template directory.
    pub fn relative_path(self) -> String {
        match self {
            TemplateName::NodeTemplateCapabilities | TemplateName::CapabilityValue(_) => {
                format!("capabilities/{}.sparql", self.as_str())
            }
            TemplateName::FrameworkOptimizations(_) => {
                format!("optimization/{}.sparql", self.as_str())
            }
            _ => format!("{}.sparql", self.as_str()),
        }
    }

    /// Rule-store queries run under the optimization namespace.
    pub fn is_rule_query(self) -> bool {
        matches!(self, TemplateName::FrameworkOptimizations(_))
    }
}

fn bundled_text(name: TemplateName) -> &'static str {
    match name {
        TemplateName::Attributes => include_str!("../templates/getAttributes.sparql"),
        TemplateName::AttributesTemplate => {
            include_str!("../templates/getAttributesTemplate.sparql")
        }
        TemplateName::Properties => include_str!("../templates/getProperties.sparql"),
        TemplateName::PropertiesTemplate => {
            include_str!("../templates/getPropertiesTemplate.sparql")
        }
        TemplateName::Inputs => include_str!("../templates/getInputs.sparql"),
        TemplateName::Capabilities => include_str!("../templates/getCapabilities.sparql"),
        TemplateName::CapabilitiesTemplate => {
            include_str!("../templates/getCapabilitiesTemplate.sparql")
        }
        TemplateName::Requirements => include_str!("../templates/getRequirements.sparql"),
        TemplateName::RequirementsTemplate => {
            include_str!("../templates/getRequirementsTemplate.sparql")
        }
        TemplateName::Interfaces => include_str!("../templates/getInterfaces.sparql"),
        TemplateName::InterfacesTemplate => {
            include_str!("../templates/getInterfacesTemplate.sparql")
        }
        TemplateName::Operations => include_str!("../templates/getOperations.sparql"),
        TemplateName::OperationsTemplate => {
            include_str!("../templates/getOperationsTemplate.sparql")
        }
        TemplateName::Node => include_str!("../templates/getNode.sparql"),
        TemplateName::Nodes => include_str!("../templates/getNodes.sparql"),
        TemplateName::Description => include_str!("../templates/getDescription.sparql"),
        TemplateName::Parameters => include_str!("../templates/getParameters.sparql"),
        TemplateName::Aadm => include_str!("../templates/getAADM.sparql"),
        TemplateName::MostSpecificRequirementNode => {
            include_str!("../templates/getMostSpecificRequirementNode.sparql")
        }
        TemplateName::RequirementValidNodes => {
            include_str!("../templates/getRequirementValidNodes.sparql")
        }
        TemplateName::ValidTargetTypes => include_str!("../templates/getValidTargetTypes.sparql"),
        TemplateName::ValidTargetTypesTemplate => {
            include_str!("../templates/getValidTargetTypesTemplate.sparql")
        }
        TemplateName::NodeTemplateCapabilities => {
            include_str!("../templates/capabilities/getNodeTemplateCapabilities.sparql")
        }
        TemplateName::CapabilityValue(CapabilityKind::Ngpu) => {
            include_str!("../templates/capabilities/getNodeTemplate_ngpu.sparql")
        }
        TemplateName::CapabilityValue(CapabilityKind::Ncpu) => {
            include_str!("../templates/capabilities/getNodeTemplate_ncpu.sparql")
        }
        TemplateName::CapabilityValue(CapabilityKind::Memsize) => {
            include_str!("../templates/capabilities/getNodeTemplate_memsize.sparql")
        }
        TemplateName::CapabilityValue(CapabilityKind::Disksize) => {
            include_str!("../templates/capabilities/getNodeTemplate_disksize.sparql")
        }
        TemplateName::CapabilityValue(CapabilityKind::Arch) => {
            include_str!("../templates/capabilities/getNodeTemplate_arch.sparql")
        }
        TemplateName::FrameworkOptimizations(CapabilityKind::Ngpu) => {
            include_str!("../templates/optimization/getFrameworkOptimizations_ngpu.sparql")
        }
        TemplateName::FrameworkOptimizations(CapabilityKind::Ncpu) => {
            include_str!("../templates/optimization/getFrameworkOptimizations_ncpu.sparql")
        }
        TemplateName::FrameworkOptimizations(CapabilityKind::Memsize) => {
            include_str!("../templates/optimization/getFrameworkOptimizations_memsize.sparql")
        }
        TemplateName::FrameworkOptimizations(CapabilityKind::Disksize) => {
            include_str!("../templates/optimization/getFrameworkOptimizations_disksize.sparql")
        }
        TemplateName::FrameworkOptimizations(CapabilityKind::Arch) => {
            include_str!("../templates/optimization/getFrameworkOptimizations_arch.sparql")
        }
    }
}

/// Repository of query template text. Ships with bundled defaults; a
/// directory override replaces the full set, and a missing file there
/// propagates as an I/O failure with no fallback.
#[derive(Debug, Clone, Default)]
pub struct TemplateRepository {
    overrides: HashMap<TemplateName, String>,
}

impl TemplateRepository {
    /// The bundled template set.
    pub fn bundled() -> Self {
        Self::default()
    }

    /// Load every template from `dir`, using the same relative layout as
    /// the bundled set.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut overrides = HashMap::new();
        for name in TemplateName::ALL {
            let text = std::fs::read_to_string(dir.join(name.relative_path()))?;
            overrides.insert(name, text);
        }
        Ok(Self { overrides })
    }

    pub fn load(&self, name: TemplateName) -> &str {
        self.overrides
            .get(&name)
            .map(String::as_str)
            .unwrap_or_else(|| bundled_text(name))
    }

    /// Compose the full query: namespace prefixes plus template text.
    pub fn prepare(&self, name: TemplateName, bindings: Vec<(String, Term)>) -> PreparedQuery {
        let prefixes = if name.is_rule_query() {
            OPT_PREFIXES
        } else {
            PREFIXES
        };
        let text = format!("{}{}", prefixes, self.load(name));
        PreparedQuery::new(name.as_str(), text, bindings)
    }
}
