//! Cross-cutting helpers: error types, date parsing, shutdown coordination

pub mod errors;
pub mod shutdown;
pub mod time;

pub use errors::*;
pub use shutdown::*;
pub use time::*;
