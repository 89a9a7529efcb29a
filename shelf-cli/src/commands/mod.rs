pub(crate) mod cache;
pub(crate) mod clean;
pub(crate) mod config;
pub(crate) mod normalize;
pub(crate) mod reconcile;
pub(crate) mod rename;
pub(crate) mod run;
pub(crate) mod transfer;
