use crate::sparql_json;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use toscagraph_core::{PreparedQuery, QuerySession, Result, RowSet, StoreConfig, Term, ToscaGraphError};
use tracing::debug;
use url::Url;

const SPARQL_JSON: &str = "application/sparql-results+json";

/// A blocking session against a SPARQL endpoint (rdf4j/GraphDB style).
/// Caller-owned: open with `connect`, drop to close. Not shared across
/// concurrent threads of control; each request gets its own session.
pub struct HttpSession {
    client: Client,
    endpoint: Url,
}

impl HttpSession {
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let base = Url::parse(&config.endpoint)
            .map_err(|e| ToscaGraphError::Store(format!("invalid endpoint: {}", e)))?;
        let endpoint = base
            .join(&format!("repositories/{}", config.repository))
            .map_err(|e| ToscaGraphError::Store(format!("invalid repository path: {}", e)))?;
        let client = Client::builder()
            .build()
            .map_err(|e| ToscaGraphError::Store(format!("building client: {}", e)))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl QuerySession for HttpSession {
    fn select(&self, query: &PreparedQuery) -> Result<RowSet> {
        debug!(query = query.name, "issuing select");

        // rdf4j binding convention: each parameter travels as a `$name`
        // form field carrying the term in N-Triples syntax.
        let mut form: Vec<(String, String)> = vec![("query".to_string(), query.text.clone())];
        for (name, term) in &query.bindings {
            form.push((format!("${}", name), encode_term(term)));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, SPARQL_JSON)
            .form(&form)
            .send()
            .map_err(|e| ToscaGraphError::Store(format!("query {} failed: {}", query.name, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToscaGraphError::Store(format!(
                "query {} returned {}",
                query.name, status
            )));
        }

        let body = response
            .text()
            .map_err(|e| ToscaGraphError::Store(format!("reading {} result: {}", query.name, e)))?;
        sparql_json::parse_rows(&body)
    }
}

fn encode_term(term: &Term) -> String {
    match term {
        Term::Iri(id) => format!("<{}>", id),
        Term::Literal(value) => format!("\"{}\"", escape_literal(value)),
        Term::Timestamp(value) => format!(
            "\"{}\"^^<http://www.w3.org/2001/XMLSchema#dateTime>",
            value.to_rfc3339()
        ),
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
