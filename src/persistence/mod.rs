pub mod files;
pub mod layout;
pub mod metadata;
pub mod migration;
pub mod records;
pub mod store;

pub use files::{atomic_write, ensure_dir, get_board_dir, init_local_board, meta_file};
pub use metadata::{load_metadata, save_metadata, SessionMetadata};
pub use migration::load_and_migrate;
pub use records::{project_to_json, task_to_json};
pub use store::{AssetStore, FileStore};
#[cfg(test)]
pub use store::MemoryStore;
