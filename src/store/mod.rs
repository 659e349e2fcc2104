pub mod sample;
pub mod storage;
pub mod types;

pub use sample::sample_entries;
pub use storage::{load_store, save_store};
pub use types::{Store, STORE_VERSION};
