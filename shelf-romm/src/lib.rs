//! RomM integration: a blocking API client and the reconciler that purges
//! broken entries (empty, fragmented, missing their executable, or carrying
//! dangerous file types) from the remote catalog.

pub mod client;
pub mod error;
pub mod reconcile;
pub mod types;

pub use client::{CatalogApi, RommClient, RommConfig};
pub use error::RommError;
pub use reconcile::{
    Pass, PassAction, PassReport, ReconcileOptions, ReconcileReport, find_dangerous, find_empty,
    find_fragmented, find_missing_executable, reconcile,
};
pub use types::{CatalogItem, OrderDir, Platform, RomFile, RomPage, RomQuery};
