//! Command handlers (imperative shell)
//!
//! Each module exposes `handle_<name>_command`, which wires real I/O, and
//! a `_impl` variant taking the transport and [`crate::output::Output`]
//! so tests can drive it with in-memory doubles.

pub mod app_id;
pub mod common;
pub mod decode;
pub mod deploy_dao;
pub mod deploy_template;
pub mod plan;
pub mod version;
