//! CLI command implementations for samconcord.
//!
//! Each submodule implements one subcommand:
//!
//! - [`concordance`] - mapping position and MAPQ concordance between two
//!   SAM files
//! - [`supplementary`] - supplementary-alignment topology and XA
//!   cross-referencing

// Blanket clippy pedantic allows for command implementations.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod command;
pub mod concordance;
pub mod supplementary;
