//! Interface adapters: the XML documents exchanged with the gateway.

pub mod xml;
