use crate::{Result, RowSet, Term};

/// A query with its template name, full text (prefixes included), and
/// parameter bindings, ready for a session to execute.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub name: &'static str,
    pub text: String,
    pub bindings: Vec<(String, Term)>,
}

impl PreparedQuery {
    pub fn new(name: &'static str, text: String, bindings: Vec<(String, Term)>) -> Self {
        Self {
            name,
            text,
            bindings,
        }
    }
}

/// A caller-owned connection to the graph store. Synchronous and blocking;
/// one session per thread of control. Implementations must drain and
/// release any store-side cursor before returning, on every exit path.
pub trait QuerySession {
    fn select(&self, query: &PreparedQuery) -> Result<RowSet>;
}
