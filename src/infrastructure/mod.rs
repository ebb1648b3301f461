//! Infrastructure layer: key material and the concrete envelope cipher.

pub mod hybrid;
pub mod keystore;
