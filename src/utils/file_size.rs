pub struct FileSizeUtils;

impl FileSizeUtils {
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// `name (size)` label for a file about to be uploaded; size is omitted when unknown.
    pub fn describe(name: &str, size: Option<u64>) -> String {
        match size {
            Some(size) => format!("{} ({})", name, Self::format_size(size)),
            None => name.to_string(),
        }
    }
}
