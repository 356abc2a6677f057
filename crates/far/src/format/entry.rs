use std::io::{Error, ErrorKind, Result};

use deku::prelude::*;

/// Entry header: the name and size preceding an entry body.
///
/// The name is stored with its NUL terminator, which is how it is framed on disk. Use
/// [`EntryHeader::new()`] to build one from a bare name and [`EntryHeader::name()`] to get the
/// bare name back.
#[derive(Clone, Debug, Eq, PartialEq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct EntryHeader {
	/// Name bytes, including the trailing NUL.
	#[deku(until = "|b: &u8| *b == 0")]
	raw_name: Vec<u8>,

	/// Size of the body in bytes.
	pub size: u32,
}

impl EntryHeader {
	/// Build an entry header from a name without terminator.
	///
	/// Fails if the name contains a NUL byte, as it could not be read back.
	pub fn new(name: &[u8], size: u32) -> Result<Self> {
		if name.contains(&0) {
			return Err(Error::new(
				ErrorKind::InvalidInput,
				"entry name contains a NUL byte",
			));
		}

		let mut raw_name = Vec::with_capacity(name.len() + 1);
		raw_name.extend_from_slice(name);
		raw_name.push(0);
		Ok(Self { raw_name, size })
	}

	/// The entry name, without its terminator.
	pub fn name(&self) -> &[u8] {
		self.raw_name
			.strip_suffix(&[0])
			.unwrap_or(&self.raw_name)
	}

	/// Whether the name denotes a directory.
	pub fn is_directory(&self) -> bool {
		self.name().last() == Some(&super::SEPARATOR)
	}

	/// Length of this header on disk.
	#[allow(clippy::len_without_is_empty)] // CLIPPY: this is not a collection
	pub fn len(&self) -> usize {
		self.raw_name.len() + 4
	}
}
