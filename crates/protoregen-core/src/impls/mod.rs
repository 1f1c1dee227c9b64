//! Implementations of the ports.
//!
//! - ProcessRunner / JsonHashStore: 本番用
//! - RecordingRunner / InMemoryHashStore: テスト・開発用

pub mod inmem_hash_store;
pub mod json_hash_store;
pub mod process_runner;
pub mod recording_runner;

pub use self::inmem_hash_store::InMemoryHashStore;
pub use self::json_hash_store::JsonHashStore;
pub use self::process_runner::ProcessRunner;
pub use self::recording_runner::RecordingRunner;
