//! Recursive Length Prefix encoding.
//!
//! [`decode`] and [`encode`] hold the typed traits used to read and write
//! transaction fields, [`structs`] the list builders on top of them, and
//! [`node`] an untyped item tree for payloads that are carried through as-is.

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod node;
pub mod structs;
