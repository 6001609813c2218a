//! versifier - infers which versification scheme a Bible translation follows
//!
//! Reference `.vrs` files are diffed into a divergence table; a
//! translation's chapter boundaries are then matched against it until a
//! single scheme remains.

pub mod canon;
pub mod cli;
pub mod engine;
pub mod observability;
pub mod reference;
pub mod scanner;
pub mod settings;
