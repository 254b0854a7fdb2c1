//! CLI command implementations

pub(crate) mod common;
pub(crate) mod debug_sql;
pub(crate) mod exec;
pub(crate) mod query;
pub(crate) mod scalar;
pub(crate) mod script;
