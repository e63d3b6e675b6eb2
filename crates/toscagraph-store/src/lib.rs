pub mod http;
pub mod memory;
pub mod sparql_json;
pub mod templates;

pub use http::*;
pub use memory::*;
pub use templates::*;
