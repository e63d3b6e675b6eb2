use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use toscagraph_core::{
    Aadm, Identifier, NodeFull, NodeKind, QuerySession, Result, Term, ToscaGraphError,
};
use toscagraph_store::{TemplateName, TemplateRepository};
use tracing::{debug, warn};

/// Type identifiers ending in this suffix mark declared-type placeholders,
/// not deployable resources.
const INPUT_TYPE_SUFFIX: &str = "Input";

/// Builds the Abstract Application Deployment Model aggregate: parses the
/// compact aggregate query result and delegates to the entity resolver
/// for full per-template population.
pub struct AadmResolver<'a, S: QuerySession> {
    resolver: crate::EntityResolver<'a, S>,
}

impl<'a, S: QuerySession> AadmResolver<'a, S> {
    pub fn new(session: &'a S, templates: &'a TemplateRepository) -> Self {
        Self {
            resolver: crate::EntityResolver::new(session, templates),
        }
    }

    /// Resolve one deployment model. Zero aggregate rows yield `None`
    /// (logged, not an error); callers must handle absence explicitly.
    pub fn aadm(&self, aadm_id: &Identifier) -> Result<Option<Aadm>> {
        debug!(aadm = %aadm_id, "resolving deployment model");

        let query = self.resolver.templates().prepare(
            TemplateName::Aadm,
            vec![("aadm".to_string(), Term::Iri(aadm_id.clone()))],
        );
        let rows = self.resolver.session().select(&query)?;

        let mut model: Option<Aadm> = None;
        for row in &rows {
            let user = row.iri("user")?.clone();
            let created_at = parse_timestamp(row.require("createdAt")?)?;
            let templates_field = row.text("templates")?;
            let inputs_field = row.text("inputs")?;

            let mut aadm = Aadm::new(aadm_id.clone(), user, created_at);

            for token in templates_field.split_whitespace() {
                let (id, node_type) = split_token(token)?;
                let kind = if node_type.as_str().ends_with(INPUT_TYPE_SUFFIX) {
                    NodeKind::Template
                } else {
                    NodeKind::Instance
                };
                aadm.templates.insert(NodeFull::new(id, kind, node_type));
            }

            if !inputs_field.is_empty() {
                for token in inputs_field.split_whitespace() {
                    let (id, node_type) = split_token(token)?;
                    let mut input = NodeFull::new(id, NodeKind::Template, node_type);
                    input.is_input = true;
                    aadm.templates.insert(input);
                }
            }

            model = Some(aadm);
        }

        match model {
            Some(mut aadm) => {
                self.populate(&mut aadm)?;
                Ok(Some(aadm))
            }
            None => {
                warn!(aadm = %aadm_id, "deployment model not found");
                Ok(None)
            }
        }
    }

    /// Single pass fully populating every assembled template.
    fn populate(&self, aadm: &mut Aadm) -> Result<()> {
        let assembled = std::mem::take(&mut aadm.templates);
        let mut populated = BTreeSet::new();
        for mut template in assembled {
            self.resolver.populate(&mut template)?;
            populated.insert(template);
        }
        aadm.templates = populated;
        Ok(())
    }
}

fn parse_timestamp(term: &Term) -> Result<DateTime<Utc>> {
    match term {
        Term::Timestamp(value) => Ok(*value),
        other => Ok(DateTime::parse_from_rfc3339(&other.text())?.with_timezone(&Utc)),
    }
}

/// Split one `identifier|typeIdentifier` token. Tokens without the
/// separator, or with an empty half, are rejected.
fn split_token(token: &str) -> Result<(Identifier, Identifier)> {
    match token.split_once('|') {
        Some((id, node_type)) if !id.is_empty() && !node_type.is_empty() => {
            Ok((Identifier::new(id), Identifier::new(node_type)))
        }
        _ => Err(ToscaGraphError::MalformedToken(token.to_string())),
    }
}
