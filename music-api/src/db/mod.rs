//! Per-entity stores
//!
//! Each store owns the SQL for one table and runs it through the injected
//! [`Querier`](music_common::persist::Querier). Failures come back as a
//! [`Chain`](music_common::Chain) wrapped at the `db` component.

mod artists;
mod songs;

pub use artists::ArtistStore;
pub use songs::SongStore;
