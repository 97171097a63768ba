//! Path and text helpers shared by every command.
//!
//! All helpers return [`EwarmResult`] with the offending path attached, so a
//! failure deep inside a tree copy still reports which entry broke.
//!
//! Descriptor and source files are read and written through the
//! Windows-1252 codec. Its single-byte table is a bijection, so bytes that are
//! not touched by a substitution come back out exactly as they went in,
//! whatever the file's real encoding.

use std::ffi::OsString;
use std::fs::{self, DirEntry};
use std::path::{Component, Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::ewarm::{EwarmError, EwarmResult};

/// Reads a text file, decoding it byte-for-byte as Windows-1252.
///
/// # Errors
///
/// Returns [`EwarmError::FileNotFound`] if `path` is not a file, or an I/O
/// error if it cannot be read.
pub fn read_text(path: &Path) -> EwarmResult<String> {
    if !path.is_file() {
        return Err(EwarmError::file_not_found(path));
    }
    let bytes = fs::read(path).map_err(|e| EwarmError::io("read", path, e))?;
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
    Ok(text.into_owned())
}

/// Reads an XML document, decoding it as its BOM or declaration says.
///
/// Without either, the document is read as UTF-8 when it is valid UTF-8 and
/// as Windows-1252 otherwise.
///
/// # Errors
///
/// Returns [`EwarmError::FileNotFound`] if `path` is not a file, or an I/O
/// error if it cannot be read.
pub fn read_xml(path: &Path) -> EwarmResult<String> {
    if !path.is_file() {
        return Err(EwarmError::file_not_found(path));
    }
    let bytes = fs::read(path).map_err(|e| EwarmError::io("read", path, e))?;
    let text = match declared_encoding(&bytes) {
        Some(encoding) => {
            debug!(path = %path.display(), encoding = encoding.name(), "Decoding descriptor");
            encoding.decode_with_bom_removal(&bytes).0
        }
        None => UTF_8
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .unwrap_or_else(|| WINDOWS_1252.decode_without_bom_handling(&bytes).0),
    };
    Ok(text.into_owned())
}

/// Encoding named by a byte order mark or by the XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }
    let mut reader = Reader::from_reader(bytes);
    match reader.read_event() {
        Ok(Event::Decl(decl)) => {
            let label = decl.encoding()?.ok()?;
            Encoding::for_label(label.as_ref())
        }
        _ => None,
    }
}

/// Writes `text` to `path`, encoding it as Windows-1252.
///
/// Characters outside the codepage are written as XML numeric character
/// references.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_text(path: &Path, text: &str) -> EwarmResult<()> {
    let (bytes, _, _) = WINDOWS_1252.encode(text);
    fs::write(path, bytes).map_err(|e| EwarmError::io("write", path, e))
}

/// Creates `path` and any missing parents.
///
/// # Errors
///
/// Returns an I/O error if the folder cannot be created.
pub fn make_dir(path: &Path) -> EwarmResult<()> {
    debug!(path = %path.display(), "Creating folder");
    fs::create_dir_all(path).map_err(|e| EwarmError::io("create", path, e))
}

/// Copies the file `src` into the folder `dst_dir`, keeping its name.
///
/// Returns the path of the copy.
///
/// # Errors
///
/// Returns [`EwarmError::FileNotFound`] if `src` is missing, or an I/O error
/// if the copy fails.
pub fn copy_file_into(src: &Path, dst_dir: &Path) -> EwarmResult<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| EwarmError::file_not_found(src))?;
    let dst = dst_dir.join(name);
    copy_file(src, &dst)?;
    Ok(dst)
}

/// Copies the file `src` to `dst`.
///
/// # Errors
///
/// Returns [`EwarmError::FileNotFound`] if `src` is missing, or an I/O error
/// if the copy fails.
pub fn copy_file(src: &Path, dst: &Path) -> EwarmResult<()> {
    if !src.is_file() {
        return Err(EwarmError::file_not_found(src));
    }
    debug!(from = %src.display(), to = %dst.display(), "Copying file");
    fs::copy(src, dst).map_err(|e| EwarmError::io("copy", src, e))?;
    Ok(())
}

/// Recursively copies the contents of folder `src` into `dst`.
///
/// `dst` is created if needed; existing files in it are overwritten.
///
/// # Errors
///
/// Returns [`EwarmError::FolderNotFound`] if `src` is not a folder, or the
/// first I/O error met while copying.
pub fn copy_tree(src: &Path, dst: &Path) -> EwarmResult<()> {
    if !src.is_dir() {
        return Err(EwarmError::folder_not_found(src));
    }
    // Listed before `dst` exists, so a destination inside `src` is not
    // copied into itself.
    let entries = sorted_entries(src)?;
    make_dir(dst)?;

    for entry in entries {
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            copy_file(&from, &to)?;
        }
    }
    Ok(())
}

/// Renames `from` to `to`.
///
/// # Errors
///
/// Returns [`EwarmError::AlreadyExists`] if `to` names a different, existing
/// entry, or an I/O error if the rename fails.
pub fn rename(from: &Path, to: &Path) -> EwarmResult<()> {
    if from == to {
        return Ok(());
    }
    if to.exists() {
        return Err(EwarmError::already_exists(to));
    }
    debug!(from = %from.display(), to = %to.display(), "Renaming");
    fs::rename(from, to).map_err(|e| EwarmError::io("rename", from, e))
}

/// Lists the entries of `dir`, sorted by file name.
///
/// # Errors
///
/// Returns an I/O error if the folder cannot be listed.
pub fn sorted_entries(dir: &Path) -> EwarmResult<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| EwarmError::io("list", dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| EwarmError::io("list", dir, e))?;
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

/// Returns the folder containing `path`, or `.` for a bare file name.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Returns the last normal component of `path`.
///
/// Trailing separators and `.` components are ignored, so `./drivers/` and
/// `drivers` both yield `drivers`. Returns `None` for paths such as `.`, `..`
/// or `/` that do not end in a name.
#[must_use]
pub fn base_name(path: &Path) -> Option<OsString> {
    match path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .last()?
    {
        Component::Normal(name) => Some(name.to_os_string()),
        _ => None,
    }
}

/// Returns `true` if `path`'s file name ends with `.{ext}`.
///
/// This is a plain suffix test: a file named `.eww` has extension `eww`.
#[must_use]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.file_name().is_some_and(|name| {
        let name = name.to_string_lossy();
        name.strip_suffix(ext).is_some_and(|stem| stem.ends_with('.'))
    })
}
