//! Application layer orchestrating the payment flows.
//!
//! This module defines the `PaymentClient`, the entry point for creating sealed
//! payment orders and for opening the gateway's notifications. It composes the
//! domain types, the envelope cipher and the XML documents.

pub mod client;
