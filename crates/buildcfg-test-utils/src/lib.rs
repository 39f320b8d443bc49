//! Shared test utilities for the buildcfg workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each rebuild identities and on-disk projects. It is a dev-dependency
//! only, never published.
//!
//! # Modules
//!
//! - [`identity`] - target identity fixtures
//! - [`project`] - [`TestProject`](project::TestProject) builder for on-disk config hierarchies

pub mod identity;
pub mod project;
