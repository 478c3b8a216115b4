use std::{fs, io::Write, path::Path};

use walkdir::WalkDir;

use crate::error::IoError;

const INDENT: usize = 4;

fn dir_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The non-directory entries of `dir`, sorted by name.
fn dir_files(dir: &Path) -> Result<Vec<fs::DirEntry>, IoError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            files.push(entry);
        }
    }
    files.sort_by_key(|e| e.file_name());
    Ok(files)
}

/// Write the directory tree below `start` with the size of each file.
///
/// Every directory is printed as `name/`, followed by up to `max_len` of its
/// files as `name  1.23 Kb` (size in units of 1000 bytes), followed by its
/// subdirectories. Each depth level adds four spaces of indentation. Entries
/// are sorted by name and symbolic links are not followed.
///
/// # Arguments
///
/// * `writer` - Where to write the tree.
/// * `start` - The root directory.
/// * `max_len` - The maximum number of files listed per directory.
pub fn write_file_tree<W: Write>(
    writer: &mut W,
    start: impl AsRef<Path>,
    max_len: usize,
) -> Result<(), IoError> {
    let start = start.as_ref();
    if !start.is_dir() {
        return Err(IoError::NotADirectory(start.to_path_buf()));
    }

    for entry in WalkDir::new(start).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let level = entry.depth();
        writeln!(
            writer,
            "{}{}/",
            " ".repeat(INDENT * level),
            dir_label(entry.path())
        )?;

        let files = dir_files(entry.path())?;

        let sub_indent = " ".repeat(INDENT * (level + 1));
        for file in files.iter().take(max_len) {
            let size_kb = file.metadata()?.len() as f64 * 1e-3;
            writeln!(
                writer,
                "{}{}  {:.2} Kb",
                sub_indent,
                file.file_name().to_string_lossy(),
                size_kb
            )?;
        }
    }

    Ok(())
}

/// Render the directory tree below `start` as a string.
///
/// See [`write_file_tree`] for the format.
///
/// # Example
///
/// ```no_run
/// let tree = imstack_io::list_files("data", 10).unwrap();
/// print!("{tree}");
/// ```
pub fn list_files(start: impl AsRef<Path>, max_len: usize) -> Result<String, IoError> {
    let mut buf = Vec::new();
    write_file_tree(&mut buf, start, max_len)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
