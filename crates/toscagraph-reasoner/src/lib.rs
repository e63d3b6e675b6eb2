pub mod aadm;
pub mod optimize;
pub mod resolver;

pub use aadm::*;
pub use optimize::*;
pub use resolver::*;
