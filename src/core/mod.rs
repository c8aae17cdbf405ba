// Core modules implementing the catalog model, caching, view derivation, and errors.
pub mod cache;
pub mod catalog;
pub mod error;
pub mod view;
