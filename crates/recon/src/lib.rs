//! `sheetmatch-recon` — Tabular reconciliation engine.
//!
//! Pure engine crate: receives parsed grids and tables, returns new tables.
//! No CLI or IO dependencies; persistence is reached only through the
//! [`store::MasterStore`] trait.

pub mod align;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod parse;
pub mod project;
pub mod store;

pub use config::ReconConfig;
pub use engine::{match_against_master, pair_uploads, reconcile};
pub use error::{ReconError, Side};
pub use matcher::{HeaderMatcher, KeyPattern, MatchMode};
pub use model::{Reconciliation, ReconSummary, RowOutcome, TableModel};
pub use parse::{parse_grid, HeaderPadding};
pub use store::{MasterStore, MemoryStore, SharedMaster};
