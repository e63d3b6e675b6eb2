pub mod config;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod term;
pub mod traits;

pub use config::*;
pub use entity::*;
pub use error::*;
pub use identifier::*;
pub use term::*;
pub use traits::*;
