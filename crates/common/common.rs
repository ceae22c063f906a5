pub use ethereum_types::*;
pub mod errors;
pub mod recover;
pub mod types;
pub mod utils;

pub use errors::RecoveryError;
pub use recover::{RecoveredKey, recover_batch, recover_from_bytes, recover_from_hex};
