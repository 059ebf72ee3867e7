mod picker;
mod types;

pub use picker::{dropped_file, pick_file};
pub use types::SelectedFile;
