//! Archive operations.
//!
//! Every operation is a single forward pass over the archive. The mutating ones ([`Archive::add()`]
//! and [`Archive::delete()`]) stream the old archive into a scratch file next to it, and only
//! replace the archive once the scratch file is complete; any failure before that leaves the
//! archive exactly as it was.

use std::{
	fs::File,
	io::BufReader,
	path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
	decode::Decoder,
	error::{Error, ErrorKind, Result},
};

#[doc(inline)]
pub use self::list::EntryInfo;
#[doc(inline)]
pub use self::rewrite::Stage;

mod add;
mod delete;
mod extract;
mod list;
mod rewrite;

/// Settings for archive operations.
#[derive(Clone, Debug)]
pub struct Options {
	/// Directory that extracted names are relative to.
	pub destination: PathBuf,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			destination: PathBuf::from("."),
		}
	}
}

/// An archive on disk, by path.
///
/// The file doesn't need to exist: adding to a missing archive creates it.
#[derive(Clone, Debug)]
pub struct Archive {
	path: PathBuf,
	options: Options,
}

impl Archive {
	/// Refer to the archive at this path, with default options.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self::with_options(path, Options::default())
	}

	/// Refer to the archive at this path.
	pub fn with_options(path: impl Into<PathBuf>, options: Options) -> Self {
		Self {
			path: path.into(),
			options,
		}
	}

	/// Path of the archive.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Options in use.
	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Open the archive for a read-only pass.
	fn open_read(&self) -> Result<Decoder<BufReader<File>>> {
		debug!(path=?self.path, "open archive for reading");
		let file = File::open(&self.path)
			.map_err(|err| Error::at_path(ErrorKind::Open, &self.path, err))?;
		Decoder::new(BufReader::new(file))
	}
}
