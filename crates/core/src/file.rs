use std::{fs, fs::File, io::Write, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum WriteFileError {
    #[error("Could not create dir: {0}")]
    CouldNotCreateDir(std::io::Error),

    #[error("Could not write to the file: {0}")]
    CouldNotWrite(std::io::Error),

    #[error("Could not create the file: {0}")]
    CouldNotCreateFile(std::io::Error),
}

/// Writes content to a file, creating parent directories as needed.
///
/// Trailing whitespace is trimmed from every line and the file always ends
/// with a single newline.
///
/// ```rust,no_run
/// use std::path::Path;
/// use rdeploy_core::write_file;
///
/// write_file(Path::new("deployments/dev/Counter.json"), "{}")?;
/// # Ok::<(), rdeploy_core::WriteFileError>(())
/// ```
pub fn write_file(path: &Path, contents: &str) -> Result<(), WriteFileError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(WriteFileError::CouldNotCreateDir)?;
    }

    let mut cleaned_contents: String =
        contents.lines().map(|line| line.trim_end()).collect::<Vec<&str>>().join("\n");
    cleaned_contents.push('\n');

    let mut file = File::create(path).map_err(WriteFileError::CouldNotCreateFile)?;
    file.write_all(cleaned_contents.as_bytes()).map_err(WriteFileError::CouldNotWrite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_parent_dirs_and_trims_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.txt");

        write_file(&path, "hello   \nworld\t").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\nworld\n");
    }
}
