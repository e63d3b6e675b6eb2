use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use toscagraph_core::{Identifier, Result, Row, RowSet, Term};

const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    results: Bindings,
}

#[derive(Debug, Deserialize)]
struct Bindings {
    bindings: Vec<BTreeMap<String, RdfTerm>>,
}

#[derive(Debug, Deserialize)]
struct RdfTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(default)]
    datatype: Option<String>,
}

/// Parse a SPARQL 1.1 JSON results document into a materialized row set.
pub fn parse_rows(body: &str) -> Result<RowSet> {
    let document: ResultsDocument = serde_json::from_str(body)?;
    let mut rows = Vec::with_capacity(document.results.bindings.len());
    for binding_set in document.results.bindings {
        let mut row = Row::new();
        for (variable, term) in binding_set {
            row.insert(variable, decode_term(term)?);
        }
        rows.push(row);
    }
    Ok(rows)
}

fn decode_term(term: RdfTerm) -> Result<Term> {
    match term.kind.as_str() {
        "uri" => Ok(Term::Iri(Identifier::new(term.value))),
        // Blank nodes keep their label as an identifier in the `_:` form.
        "bnode" => Ok(Term::Iri(Identifier::new(format!("_:{}", term.value)))),
        _ => {
            if term.datatype.as_deref() == Some(XSD_DATETIME) {
                let parsed = DateTime::parse_from_rfc3339(&term.value)?;
                Ok(Term::Timestamp(parsed.with_timezone(&Utc)))
            } else {
                Ok(Term::Literal(term.value))
            }
        }
    }
}
