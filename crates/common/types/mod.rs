mod public_key;
mod signature;
mod transaction;

pub use public_key::*;
pub use signature::*;
pub use transaction::*;
