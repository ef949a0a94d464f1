//! Seams to services that live outside the process.

pub mod suggest;
