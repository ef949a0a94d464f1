//! Route and package catalog with a pricing engine for guided-tour operators.

pub mod domain;
pub mod infra;
pub mod util;
