mod chain;
mod collection;
mod field;
mod fingerprint;
mod loader;
mod resolver;

pub use chain::*;
pub use collection::*;
pub use field::*;
pub use fingerprint::*;
pub use loader::*;
pub use resolver::*;
