use std::{
	fs::{self, File},
	io::{BufWriter, ErrorKind as IoErrorKind, Write},
	path::Path,
};

use tracing::{debug, instrument, trace};

use crate::{
	decode::Decoder,
	error::Result,
	format::{EntryHeader, SEPARATOR},
	name::{display, name_to_path},
	report::{Notice, Report},
	selector::Matcher,
};

use super::Archive;

impl Archive {
	/// Extract entries into the destination directory.
	///
	/// With no selectors, everything is extracted. Otherwise only entries matching a selector are
	/// (see [`Archive::delete()`] for matching), and selectors that match nothing are reported.
	///
	/// Directories along the way are created as needed. Files that can't be written are reported
	/// and skipped; the archive is never modified.
	#[instrument(level = "debug", skip(self, selectors), fields(archive = ?self.path, destination = ?self.options.destination))]
	pub fn extract<S: Into<Vec<u8>>>(&self, selectors: impl IntoIterator<Item = S>) -> Result<Report> {
		let mut matcher = Matcher::new(selectors);
		let mut decoder = self.open_read()?;
		let mut report = Report::default();

		while let Some(header) = decoder.next_entry()? {
			if !matcher.is_empty() && matcher.resolve(header.name()).is_none() {
				trace!(name=%crate::name::display(header.name()), "not selected");
				decoder.skip_body()?;
				continue;
			}

			self.extract_entry(&header, &mut decoder, &mut report)?;
			report.entries += 1;
		}

		for notice in matcher.unused_notices() {
			report.notice(notice);
		}

		Ok(report)
	}

	/// Extract one entry whose header was just read.
	///
	/// Only corruption of the archive is an error. Whatever happens, the body is consumed.
	fn extract_entry<R: std::io::Read>(
		&self,
		header: &EntryHeader,
		decoder: &mut Decoder<R>,
		report: &mut Report,
	) -> Result<()> {
		let name = header.name();
		if !is_safe(name) {
			report.notice(Notice::UnsafePath {
				name: display(name).into_owned(),
			});
			return decoder.skip_body();
		}

		let root = &self.options.destination;
		for (end, _) in name
			.iter()
			.enumerate()
			.filter(|(_, byte)| **byte == SEPARATOR)
		{
			ensure_directory(&root.join(name_to_path(&name[..=end])), report);
		}

		if header.is_directory() {
			return decoder.skip_body();
		}

		let path = root.join(name_to_path(name));
		debug!(?path, size=%header.size, "extract file");
		let file = match File::create(&path) {
			Ok(file) => file,
			Err(source) => {
				report.notice(Notice::CannotOpen { path, source });
				return decoder.skip_body();
			}
		};

		let mut writer = BufWriter::new(file);
		let written = decoder
			.copy_body(&mut writer)?
			.and_then(|()| writer.flush());
		if let Err(source) = written {
			report.notice(Notice::CannotWrite { path, source });
		}

		Ok(())
	}
}

/// Whether a stored name stays inside the destination when joined to it.
fn is_safe(name: &[u8]) -> bool {
	name.first() != Some(&SEPARATOR)
		&& !name
			.split(|byte| *byte == SEPARATOR)
			.any(|component| component == b"..")
		&& !name_to_path(name).has_root()
}

/// Create a directory unless it already exists.
fn ensure_directory(path: &Path, report: &mut Report) {
	match fs::create_dir(path) {
		Ok(()) => trace!(?path, "created directory"),
		Err(err) if err.kind() == IoErrorKind::AlreadyExists && path.is_dir() => {}
		Err(source) => report.notice(Notice::CannotCreateDirectory {
			path: path.to_owned(),
			source,
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn relative_names_are_safe() {
		assert!(is_safe(b"a/b/c.txt"));
		assert!(is_safe(b"dir/"));
		assert!(is_safe(b"./a"));
		assert!(is_safe(b"a..b"));
	}

	#[test]
	fn escaping_names_are_not() {
		assert!(!is_safe(b"/etc/passwd"));
		assert!(!is_safe(b"../up"));
		assert!(!is_safe(b"a/../../up"));
		assert!(!is_safe(b".."));
	}
}
