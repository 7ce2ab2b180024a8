pub mod file_mover;

pub use file_mover::{CollisionPolicy, FileMover, MoveBatch, MoveProgress, MoveReport};
