mod app;
pub mod catalog;
pub mod guard;
mod session;
mod storage;

pub use app::App;
pub use catalog::{Catalog, FetchOutcome, SharedCatalog, TrackView};
pub use guard::{FetchKind, RequestGuard, Ticket};
pub use session::SessionStore;
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
