//! Blocking client for the qBittorrent Web API (v2).
//!
//! Only the calls the transfer step needs are wrapped: log in, list
//! torrents by category and state, and forget a torrent while keeping its
//! files on disk.

pub mod client;
pub mod error;
pub mod types;

pub use client::{QbitClient, QbitConfig};
pub use error::TorrentError;
pub use types::{TorrentFilter, TorrentInfo};
