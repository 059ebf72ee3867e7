use super::types::{SelectedFile, ACCEPTED_EXTENSIONS};
use eframe::egui;
use rfd::FileDialog;

/// Opens the native file dialog. The extension filter is a suggestion; "All files" stays available.
pub fn pick_file() -> Option<SelectedFile> {
    let path = FileDialog::new()
        .set_title("Select a leak file to upload")
        .add_filter("Leak files", &ACCEPTED_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file()?;
    SelectedFile::from_path(path)
}

/// First file dropped onto the window this frame, if any.
pub fn dropped_file(ctx: &egui::Context) -> Option<SelectedFile> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let file = dropped
        .into_iter()
        .find_map(|file| file.path.and_then(SelectedFile::from_path))?;

    if !file.has_accepted_extension() {
        tracing::warn!(
            "{} does not have a typical leak file extension, uploading anyway",
            file.name
        );
    }
    Some(file)
}
