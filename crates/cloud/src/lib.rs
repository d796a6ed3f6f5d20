//! Object storage providers for rendered videos.
//!
//! - [`SupabaseStorage`]: Supabase Storage REST API over `reqwest`.
//! - [`InMemoryStorage`]: process-local bucket for tests and offline runs.
//!
//! Both implement [`reelcast_core::storage::ObjectStorage`].

pub mod config;
pub mod memory;
pub mod supabase;

pub use config::SupabaseConfig;
pub use memory::InMemoryStorage;
pub use supabase::SupabaseStorage;
