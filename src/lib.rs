//! Purpose: Shared library crate used by the `kantodex` CLI and tests.
//! Exports: `core` (catalog model, cache, views, errors) and `api` (client, pipeline, store).
//! Role: Internal library backing the binary; not yet a stable public SDK.
//! Invariants: Treat the crate API as internal until a dedicated library release.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
