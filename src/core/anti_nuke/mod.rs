pub mod anti_nuke_service;

pub use anti_nuke_service::{AntiNukeService, NukeAlert, NukeKind, NukeStatus};
