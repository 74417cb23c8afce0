//! # Appraisal Store
//!
//! Collaborator contracts consumed by the query engine, plus reference
//! implementations:
//!
//! - [`RecordStore`] — consistent-snapshot access to the case/report index
//!   and by-id hydration of full records
//! - [`VectorIndex`] — the seam around an external semantic index; may be
//!   absent or disabled, in which case the engine degrades to rule-only
//!   search
//! - [`MemoryStore`] — in-memory store with a JSON snapshot format
//! - [`StaticVectorIndex`] — fixed-ranking recall source for tests and
//!   offline operation

mod error;
mod memory;
mod record_store;
mod vector_index;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use record_store::RecordStore;
pub use vector_index::{StaticVectorIndex, VectorIndex};
