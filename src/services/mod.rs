pub mod pagination;
pub mod providers;
pub mod queue;
pub mod sessions;

pub use pagination::{FetchOutcome, PaginatedSearch, RetrievalSnapshot};
pub use queue::{InMemoryQueueStore, QueueStore};
pub use sessions::SearchSessions;
