use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use aa_core::error::CoreError;
use aa_core::frame::Frame;

/// Write a frame as plain text, one line per row with a trailing newline.
///
/// Missing parent directories are created.
///
/// # Errors
/// `OutputWrite` if the directory or file cannot be created or written.
pub fn write_frame(path: &Path, frame: &Frame) -> Result<(), CoreError> {
    let target = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CoreError::output(&target, e))?;
    }
    let file = File::create(path).map_err(|e| CoreError::output(&target, e))?;
    let mut writer = BufWriter::new(file);
    for line in &frame.lines {
        writeln!(writer, "{line}").map_err(|e| CoreError::output(&target, e))?;
    }
    writer.flush().map_err(|e| CoreError::output(&target, e))?;
    log::info!("Art ASCII enregistré dans '{target}'");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_lines_and_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("art.txt");
        let frame = Frame::from_lines(vec![" .o".into(), "@o.".into()]);

        write_frame(&path, &frame).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), " .o\n@o.\n");
    }

    #[test]
    fn unwritable_target_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_frame(dir.path(), &Frame::default()).unwrap_err();
        assert!(matches!(err, CoreError::OutputWrite { .. }));
    }
}
