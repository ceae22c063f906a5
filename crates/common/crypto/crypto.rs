pub mod ecdsa;
pub mod error;
pub mod keccak;

pub use error::EcdsaError;
