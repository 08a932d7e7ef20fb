//! Rooms and Navigation
//!
//! The room directory is the server-embedded document describing
//! categories, rooms, and subrooms; it is loaded once at startup and never
//! mutated. The navigator owns the current selection and turns navigation
//! into session connects; the typing tracker debounces typing indicators.

mod directory;
mod navigator;
mod typing;

pub use directory::{Category, DirectoryError, Room, RoomDirectory, Subroom};
pub use navigator::{NavigationState, RoomNavigator};
pub use typing::TypingTracker;
