use crate::{Identifier, Result, ToscaGraphError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A typed value flowing through the query interface: either a resource
/// identifier, a plain literal, or a timestamp literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Iri(Identifier),
    Literal(String),
    Timestamp(DateTime<Utc>),
}

impl Term {
    pub fn iri(value: impl Into<Identifier>) -> Self {
        Term::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }

    pub fn timestamp(value: DateTime<Utc>) -> Self {
        Term::Timestamp(value)
    }

    pub fn as_iri(&self) -> Option<&Identifier> {
        match self {
            Term::Iri(id) => Some(id),
            _ => None,
        }
    }

    /// Lexical form of the term.
    pub fn text(&self) -> String {
        match self {
            Term::Iri(id) => id.to_string(),
            Term::Literal(s) => s.clone(),
            Term::Timestamp(t) => t.to_rfc3339(),
        }
    }

    /// Lexical form with one layer of surrounding double quotes removed,
    /// if present. Used once, at the optimization rule-store boundary.
    pub fn dequoted(&self) -> String {
        let text = self.text();
        text.strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .map(str::to_string)
            .unwrap_or(text)
    }
}

/// One query result row: result-variable name to term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(BTreeMap<String, Term>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Term)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(name, term)| (name.to_string(), term))
                .collect(),
        )
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.0.get(variable)
    }

    pub fn insert(&mut self, variable: impl Into<String>, term: Term) {
        self.0.insert(variable.into(), term);
    }

    pub fn require(&self, variable: &str) -> Result<&Term> {
        self.get(variable)
            .ok_or_else(|| ToscaGraphError::MissingBinding(variable.to_string()))
    }

    /// Mandatory identifier binding.
    pub fn iri(&self, variable: &str) -> Result<&Identifier> {
        self.require(variable)?
            .as_iri()
            .ok_or_else(|| ToscaGraphError::UnexpectedTerm {
                variable: variable.to_string(),
                expected: "IRI",
            })
    }

    /// Optional identifier binding; absent or non-IRI terms read as `None`.
    pub fn opt_iri(&self, variable: &str) -> Option<&Identifier> {
        self.get(variable).and_then(Term::as_iri)
    }

    /// Mandatory literal binding, as its lexical form.
    pub fn text(&self, variable: &str) -> Result<String> {
        Ok(self.require(variable)?.text())
    }

    /// Optional binding; absence is never an error.
    pub fn opt_text(&self, variable: &str) -> Option<String> {
        self.get(variable).map(Term::text)
    }
}

/// A fully materialized result set. Sessions drain and release the
/// store-side cursor before handing this back, on every exit path.
pub type RowSet = Vec<Row>;
