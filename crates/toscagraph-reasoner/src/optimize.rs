//! Two-phase optimization inference: discover which resources declare
//! capabilities some whitelisted framework cares about, extract the
//! capability values, then match normalized `(framework, value)` pairs
//! against the optimization rule store.
//!
//! Known scaling limit: discovery fans out into one extraction query per
//! `(capability, kind)` pair and one rule query per value found. The rule
//! store keeps a separate template per capability kind, so the phases
//! cannot collapse into a single batched query.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use toscagraph_core::{
    CapabilityKind, Identifier, OptimizationLabel, QuerySession, Result, TemplateOptimization,
    Term,
};
use toscagraph_store::{TemplateName, TemplateRepository};
use tracing::debug;

/// Frameworks the rule store holds optimization rules for.
pub const FRAMEWORKS: &[&str] = &["tensorflow", "solver"];

static SIZE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)").expect("size pattern compiles"));

/// Leading integer of a size-like value, unit suffix discarded.
/// `None` when the value has no leading digits; such values emit nothing.
pub fn normalize_size(raw: &str) -> Option<String> {
    SIZE_PREFIX
        .captures(raw.trim())
        .map(|captures| captures[1].to_string())
}

/// Maps discovered capability values to per-resource recommendation sets.
pub struct OptimizationEngine<'a, S: QuerySession> {
    session: &'a S,
    templates: &'a TemplateRepository,
    frameworks: Vec<String>,
    kinds: Vec<CapabilityKind>,
}

impl<'a, S: QuerySession> OptimizationEngine<'a, S> {
    pub fn new(session: &'a S, templates: &'a TemplateRepository) -> Self {
        Self {
            session,
            templates,
            frameworks: FRAMEWORKS.iter().map(|f| f.to_string()).collect(),
            kinds: CapabilityKind::DEFAULT_WHITELIST.to_vec(),
        }
    }

    pub fn with_frameworks(mut self, frameworks: impl IntoIterator<Item = String>) -> Self {
        self.frameworks = frameworks.into_iter().collect();
        self
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = CapabilityKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Infer optimizations for every resource of a deployment model.
    /// Resources with no matched optimization are omitted; the result is
    /// a pure set union, independent of whitelist iteration order.
    pub fn optimizations(&self, aadm_id: &Identifier) -> Result<BTreeSet<TemplateOptimization>> {
        debug!(aadm = %aadm_id, "inferring optimizations");

        let mut bindings = vec![(
            "var_aadm_id".to_string(),
            Term::literal(aadm_id.as_str()),
        )];
        for (index, framework) in self.frameworks.iter().enumerate() {
            bindings.push((format!("var_f{}", index + 1), Term::literal(framework)));
        }

        let discovery = self
            .templates
            .prepare(TemplateName::NodeTemplateCapabilities, bindings);
        let triples = self.session.select(&discovery)?;

        let mut per_resource: BTreeMap<Identifier, BTreeSet<OptimizationLabel>> = BTreeMap::new();
        for triple in &triples {
            let resource = triple.iri("resource")?.clone();
            let framework = triple.text("framework")?;
            let capability = triple.iri("capability")?.clone();
            debug!(
                resource = %resource,
                framework = %framework,
                capability = %capability,
                "discovered capability"
            );

            for kind in &self.kinds {
                let extraction = self.templates.prepare(
                    TemplateName::CapabilityValue(*kind),
                    vec![("capability".to_string(), Term::Iri(capability.clone()))],
                );
                for row in &self.session.select(&extraction)? {
                    // No value for this kind means the kind does not
                    // apply to this capability instance.
                    let raw = match row.opt_text(kind.key()) {
                        Some(raw) => raw,
                        None => continue,
                    };
                    let labels = self.rule_matches(*kind, &raw, &framework)?;
                    per_resource
                        .entry(resource.clone())
                        .or_default()
                        .extend(labels);
                }
            }
        }

        Ok(per_resource
            .into_iter()
            .filter(|(_, optimizations)| !optimizations.is_empty())
            .map(|(resource, optimizations)| TemplateOptimization {
                resource,
                optimizations,
            })
            .collect())
    }

    /// Phase two: normalize the value and ask the rule store for labels
    /// applicable to the `(framework, value)` pair.
    fn rule_matches(
        &self,
        kind: CapabilityKind,
        raw: &str,
        framework: &str,
    ) -> Result<BTreeSet<OptimizationLabel>> {
        let value = if kind.is_size_like() {
            match normalize_size(raw) {
                Some(value) => value,
                None => return Ok(BTreeSet::new()),
            }
        } else {
            raw.to_string()
        };
        debug!(kind = %kind, value = %value, framework = %framework, "matching rules");

        let query = self.templates.prepare(
            TemplateName::FrameworkOptimizations(kind),
            vec![
                ("var_1".to_string(), Term::literal(framework)),
                ("var_2".to_string(), Term::literal(value)),
            ],
        );
        let rows = self.session.select(&query)?;

        rows.iter()
            .map(|row| OptimizationLabel::new(row.require("optimization")?.dequoted()))
            .collect()
    }
}
