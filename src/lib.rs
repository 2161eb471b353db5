//! Svcchain: generator of chained, versioned service adapters.
//!
//! Given descriptors for several public versions of a service and one
//! private version, svcchain links every public entity to its counterpart
//! in the next version and in the private version, then derives the
//! validators, converters and delegating service methods that let each
//! public version forward calls down the chain to a single private
//! implementation.
//!
//! # Architecture
//!
//! Each stage is a module split into domain types, ports, adapters and
//! services:
//!
//! - [`descriptor`]: descriptor ingestion and annotation parsing
//! - [`chain`]: chain construction, resolution and classification
//! - [`validation`]: validation rule derivation
//! - [`conversion`]: converter, receiver and method specifications
//! - [`plan`]: generator configuration and the frozen generation plan
//! - [`emit`]: rendering of generated units
//! - [`plugin`]: the protoc plugin protocol
//! - [`runtime`]: in-process execution of a generation plan

pub mod chain;
pub mod conversion;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod plan;
pub mod plugin;
pub mod runtime;
pub mod validation;
