//! Transcript storage for Colloquy conversations: the store contract,
//! continuation-token pagination, and the in-memory backend.

pub mod memory;
pub mod store;

pub use memory::MemoryTranscriptStore;
pub use store::{paginate_by_id, PagedResult, Transcript, TranscriptStore, PAGE_SIZE};
