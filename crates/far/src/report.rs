//! Per-item outcomes of an operation.
//!
//! Operations favour doing as much as they can: a file that can't be read or a selector that
//! matches nothing doesn't abort the pass. Those are collected as [`Notice`]s in a [`Report`].

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tracing::warn;

/// A soft, per-item error.
#[derive(Error, Diagnostic, Debug)]
pub enum Notice {
	/// A file or directory could not be opened.
	#[diagnostic(severity(Warning))]
	#[error("cannot open file: {}", .path.display())]
	CannotOpen {
		/// Path that failed.
		path: PathBuf,
		/// Why.
		#[source]
		source: io::Error,
	},

	/// An extracted file could not be written in full.
	#[diagnostic(severity(Warning))]
	#[error("cannot write file: {}", .path.display())]
	CannotWrite {
		/// Path that failed.
		path: PathBuf,
		/// Why.
		#[source]
		source: io::Error,
	},

	/// A directory could not be opened or created during extraction.
	#[diagnostic(severity(Warning))]
	#[error("cannot open directory: {}", .path.display())]
	CannotCreateDirectory {
		/// Directory that failed.
		path: PathBuf,
		/// Why.
		#[source]
		source: io::Error,
	},

	/// A selector matched no entry of the archive.
	#[diagnostic(severity(Warning))]
	#[error("cannot find file: {selector}")]
	NotFound {
		/// The selector as given.
		selector: String,
	},

	/// A file is too large to be stored.
	#[diagnostic(severity(Warning))]
	#[error("file too large: {} ({size} bytes)", .path.display())]
	TooLarge {
		/// Path of the file.
		path: PathBuf,
		/// Its size.
		size: u64,
	},

	/// A name can't be stored, as it contains a NUL byte.
	#[diagnostic(severity(Warning))]
	#[error("cannot store name with a NUL byte: {name}")]
	InvalidName {
		/// The name, lossily rendered.
		name: String,
	},

	/// A stored name would extract outside of the destination.
	#[diagnostic(severity(Warning))]
	#[error("refusing to extract unsafe path: {name}")]
	UnsafePath {
		/// The stored name.
		name: String,
	},
}

/// Summary of a completed operation.
#[derive(Debug, Default)]
pub struct Report {
	/// Entries in the resulting archive, or entries processed for read-only operations.
	pub entries: u32,

	/// Soft errors, in the order they occurred.
	pub notices: Vec<Notice>,
}

impl Report {
	/// Record a notice, logging it as it happens.
	pub fn notice(&mut self, notice: Notice) {
		warn!(%notice, "skipped");
		self.notices.push(notice);
	}

	/// Whether the operation went through without any soft error.
	pub fn is_clean(&self) -> bool {
		self.notices.is_empty()
	}

	/// Selectors that matched nothing, in order.
	pub fn not_found(&self) -> impl Iterator<Item = &str> {
		self.notices.iter().filter_map(|notice| match notice {
			Notice::NotFound { selector } => Some(selector.as_str()),
			_ => None,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages() {
		let notice = Notice::NotFound {
			selector: "missing".into(),
		};
		assert_eq!(notice.to_string(), "cannot find file: missing");

		let notice = Notice::CannotOpen {
			path: "secret".into(),
			source: io::Error::from(io::ErrorKind::PermissionDenied),
		};
		assert_eq!(notice.to_string(), "cannot open file: secret");
	}

	#[test]
	fn not_found_filters_other_notices() {
		let mut report = Report::default();
		report.notice(Notice::TooLarge {
			path: "huge".into(),
			size: u64::MAX,
		});
		report.notice(Notice::NotFound {
			selector: "a".into(),
		});
		assert_eq!(report.not_found().collect::<Vec<_>>(), ["a"]);
		assert!(!report.is_clean());
	}
}
