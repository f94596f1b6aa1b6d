//! Whole-file slurp helper.

use std::path::Path;

use crate::error::FileError;

/// Reads the file at `path` into a freshly allocated string.
pub fn fread(path: impl AsRef<Path>) -> Result<String, FileError> {
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_whole_file() {
        let path = std::env::temp_dir().join(format!("jsonwalk-fread-{}.json", std::process::id()));
        std::fs::write(&path, "{\"a\":1}").unwrap();
        assert_eq!(fread(&path).unwrap(), "{\"a\":1}");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            fread("/nonexistent/jsonwalk"),
            Err(FileError::Io(_))
        ));
    }
}
