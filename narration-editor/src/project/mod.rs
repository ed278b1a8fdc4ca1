//! Project settings: voice, delivery instructions, and the dictionary.

mod persistence;
mod types;

pub use persistence::{
    default_project_dir, default_project_path, load_project, parse_project, save_project,
};
pub use types::{LoadedProject, ProjectSettings};
