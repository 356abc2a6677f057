//! Entry names and their conversion from and to filesystem paths.
//!
//! Names in an archive are plain bytes with `/` separators. Directory-ness is carried by a single
//! trailing separator, so these helpers canonicalise that end of a name.

use std::{
	borrow::Cow,
	path::{Path, PathBuf},
};

use crate::format::SEPARATOR;

/// Return the name with exactly one trailing separator.
///
/// Any run of trailing separators is collapsed into one; a name without one gains one. This is the
/// form used for directory-prefix comparisons.
pub fn ensure_single_trailing_separator(name: &[u8]) -> Vec<u8> {
	let mut output = trim_separators(name).to_vec();
	output.push(SEPARATOR);
	output
}

/// Return the name with all trailing separators removed.
///
/// A name made only of separators becomes a single separator, so `///` still means the root.
pub fn strip_trailing_separators(name: &[u8]) -> Vec<u8> {
	let trimmed = trim_separators(name);
	if trimmed.is_empty() && !name.is_empty() {
		vec![SEPARATOR]
	} else {
		trimmed.to_vec()
	}
}

fn trim_separators(name: &[u8]) -> &[u8] {
	let end = name
		.iter()
		.rposition(|b| *b != SEPARATOR)
		.map_or(0, |pos| pos + 1);
	&name[..end]
}

/// Convert a filesystem path to entry name bytes.
#[cfg(unix)]
pub fn path_to_name(path: &Path) -> Cow<'_, [u8]> {
	use std::os::unix::ffi::OsStrExt;
	Cow::Borrowed(path.as_os_str().as_bytes())
}

/// Convert a filesystem path to entry name bytes.
#[cfg(not(unix))]
pub fn path_to_name(path: &Path) -> Cow<'_, [u8]> {
	Cow::Owned(path.to_string_lossy().replace('\\', "/").into_bytes())
}

/// Convert entry name bytes to a filesystem path.
#[cfg(unix)]
pub fn name_to_path(name: &[u8]) -> PathBuf {
	use std::os::unix::ffi::OsStrExt;
	PathBuf::from(std::ffi::OsStr::from_bytes(name))
}

/// Convert entry name bytes to a filesystem path.
#[cfg(not(unix))]
pub fn name_to_path(name: &[u8]) -> PathBuf {
	PathBuf::from(String::from_utf8_lossy(name).into_owned())
}

/// Printable form of a name.
pub fn display(name: &[u8]) -> Cow<'_, str> {
	String::from_utf8_lossy(name)
}
