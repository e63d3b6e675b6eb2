use crate::TemplateName;
use toscagraph_core::{PreparedQuery, QuerySession, Result, Row, RowSet, Term};

/// One canned result: rows returned when a query names this template and
/// carries at least the listed bindings.
#[derive(Debug, Clone)]
struct Fixture {
    template: &'static str,
    bindings: Vec<(String, Term)>,
    rows: Vec<Row>,
}

/// In-memory fixture session. Dispatches on template name plus a subset
/// match over bindings; queries with no matching fixture yield zero rows,
/// which models "the store has nothing for this pattern".
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    fixtures: Vec<Fixture>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        template: TemplateName,
        bindings: Vec<(&str, Term)>,
        rows: Vec<Row>,
    ) {
        self.fixtures.push(Fixture {
            template: template.as_str(),
            bindings: bindings
                .into_iter()
                .map(|(name, term)| (name.to_string(), term))
                .collect(),
            rows,
        });
    }
}

impl QuerySession for MemorySession {
    fn select(&self, query: &PreparedQuery) -> Result<RowSet> {
        Ok(self
            .fixtures
            .iter()
            .filter(|fixture| {
                fixture.template == query.name
                    && fixture
                        .bindings
                        .iter()
                        .all(|binding| query.bindings.contains(binding))
            })
            .flat_map(|fixture| fixture.rows.clone())
            .collect())
    }
}
