//! File-based repository implementations.

mod battle;

pub use battle::FileBattleRepository;
