//! Revenue Scout driver.
//!
//! Owns everything the estimation core leaves out: reading the company
//! ledger, fetching search snippets, pacing requests, checkpointing and
//! writing results back.

pub mod config;
pub mod ledger;
pub mod runner;
pub mod sources;

pub use config::{Args, Config, SourceKind};
pub use ledger::{Ledger, LedgerEntry, LedgerFormat};
pub use runner::{run, RunOptions, RunSummary};
