//! Error types for archive operations.
use std::{borrow::Cow, io, path::Path};

use deku::DekuError;
use miette::Diagnostic;
use thiserror::Error;

/// Convenience return type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for archive operations.
///
/// All of these are terminal for the current operation. Per-item failures are not errors: they
/// are collected as [`Notice`](crate::report::Notice)s instead.
#[derive(Error, Diagnostic, Debug)]
#[error("far: {message}")]
pub struct Error {
	kind: ErrorKind,
	message: Cow<'static, str>,
	#[source]
	source: Option<io::Error>,
}

impl Error {
	/// New error with the default message for its kind.
	pub fn new(kind: ErrorKind) -> Self {
		Self {
			kind,
			message: kind.default_message().into(),
			source: None,
		}
	}

	/// New corruption error from deku.
	pub fn from_deku(orig: DekuError) -> Self {
		Self::new(ErrorKind::Corrupted).with_message(format!("archive is corrupted: {orig}"))
	}

	/// New error about a path, with the underlying I/O error.
	pub fn at_path(kind: ErrorKind, path: &Path, source: io::Error) -> Self {
		Self::new(kind)
			.with_message(format!("{}: {}", kind.default_message(), path.display()))
			.with_source(source)
	}

	/// The structural kind of this error.
	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	/// Process exit code for this error.
	pub fn exit_code(&self) -> u8 {
		self.kind.exit_code()
	}

	/// Change the error message.
	pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
		self.message = message.into();
		self
	}

	/// Attach the underlying I/O error.
	pub fn with_source(mut self, source: io::Error) -> Self {
		self.source = Some(source);
		self
	}
}

/// Structural error kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The archive could not be opened or created where it was required.
	Open,

	/// The archive's framing is inconsistent with its declared counts and sizes, or ends early.
	Corrupted,

	/// The scratch archive could not be created, written, or promoted.
	TempFile,
}

impl ErrorKind {
	/// Get the default error message for this error kind.
	pub fn default_message(self) -> &'static str {
		match self {
			ErrorKind::Open => "cannot open/create archive",
			ErrorKind::Corrupted => "archive is corrupted",
			ErrorKind::TempFile => "failed to create temporary file",
		}
	}

	/// Process exit code for this error kind.
	pub fn exit_code(self) -> u8 {
		match self {
			ErrorKind::Open => 2,
			ErrorKind::Corrupted => 3,
			ErrorKind::TempFile => 5,
		}
	}
}

impl From<ErrorKind> for Error {
	fn from(ek: ErrorKind) -> Self {
		Self::new(ek)
	}
}

pub(crate) fn corrupted(message: impl Into<Cow<'static, str>>) -> Error {
	Error::new(ErrorKind::Corrupted)
		.with_message(message)
}

pub(crate) fn temp_file(source: io::Error) -> Error {
	Error::new(ErrorKind::TempFile)
		.with_source(source)
}
