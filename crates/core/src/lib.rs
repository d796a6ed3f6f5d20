//! Domain logic for the reelcast render service.
//!
//! Nothing in this crate talks to the database or to a remote storage
//! service directly: those are reached through the [`storage::ObjectStorage`]
//! seam (implemented in `reelcast-cloud`) and the catalog seam in
//! `reelcast-db`.

pub mod error;
pub mod naming;
pub mod rendering;
pub mod script_check;
pub mod storage;
pub mod types;
pub mod workdir;
