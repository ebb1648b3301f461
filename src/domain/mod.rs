//! Domain layer: the value types exchanged with the gateway and the cipher
//! port the application layer depends on.

pub mod acknowledgement;
pub mod envelope;
pub mod notification;
pub mod order;
pub mod ports;
