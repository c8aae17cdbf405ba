//! Purpose: Define the stable public API boundary for kantodex.
//! Exports: The client, pipeline, orchestrator, and core types needed by the CLI and embedders.
//! Role: Public, additive-only surface; wire modules stay private.
//! Invariants: This module is the only public path to the remote client and orchestrator.

mod enrich;
mod remote;
mod store;

pub use crate::core::cache::{DEFAULT_TTL, TtlCache};
pub use crate::core::catalog::{
    Ability, COLLECTION_SIZE, FlavorEntry, Pokemon, PokemonDetail, SpeciesRecord, StatValue,
};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::view::{Criteria, DEFAULT_PAGE_SIZE, SortKey, SortOrder, ViewMode};
pub use enrich::{COMPLETE_LIST_KEY, load_collection};
pub use remote::{DEFAULT_BASE_URL, RemoteClient};
pub use store::Explorer;
