//! Decoder types and functions.
//!
//! Archives are read strictly forward, one entry at a time: the [`Decoder`] yields each entry's
//! header, and the caller then either copies the body somewhere or skips it.

use std::io::{self, ErrorKind, Read, Write};

use deku::DekuContainerRead;
use tracing::{debug, instrument, trace};

use crate::{
	error::{corrupted, Error, Result},
	format::{ArchiveHeader, EntryHeader, HEADER_LENGTH},
};

const BUFFER_SIZE: usize = 64 * 1024;

/// Streaming archive decoder.
#[derive(Debug)]
pub struct Decoder<R> {
	reader: R,

	/// Number of entries the header declares.
	count: u32,

	/// Number of entry headers read so far.
	index: u32,

	/// Body bytes of the current entry that haven't been consumed yet.
	pending: u64,

	/// Bytes consumed from the reader, for error messages.
	offset: u64,
}

impl<R: Read> Decoder<R> {
	/// Open an archive for reading.
	///
	/// This reads the header. Fails with a corruption error if fewer than 4 bytes are available.
	#[instrument(level = "debug", skip(reader))]
	pub fn new(mut reader: R) -> Result<Self> {
		let (bits_read, header) =
			ArchiveHeader::from_reader((&mut reader, 0)).map_err(Error::from_deku)?;
		debug!(%bits_read, ?header, "read archive header");

		Ok(Self {
			reader,
			count: header.count,
			index: 0,
			pending: 0,
			offset: HEADER_LENGTH as _,
		})
	}

	/// Number of entries the archive declares.
	pub fn count(&self) -> u32 {
		self.count
	}

	/// Read the next entry header.
	///
	/// If the body of the previous entry wasn't consumed, it's skipped first. Returns `None` once
	/// as many entries as the header declares have been read.
	pub fn next_entry(&mut self) -> Result<Option<EntryHeader>> {
		if self.pending > 0 {
			self.skip_body()?;
		}

		if self.index == self.count {
			return Ok(None);
		}

		let header = match EntryHeader::from_reader((&mut self.reader, 0)) {
			Ok((_, header)) => header,
			Err(err) => {
				return Err(corrupted(format!(
					"archive is corrupted: entry {} of {} is truncated at byte {} ({err})",
					self.index + 1,
					self.count,
					self.offset,
				)))
			}
		};

		trace!(index=%self.index, name=?String::from_utf8_lossy(header.name()), size=%header.size, "read entry header");
		self.index += 1;
		self.offset += header.len() as u64;
		self.pending = header.size.into();
		Ok(Some(header))
	}

	/// Copy the body of the current entry to a writer.
	///
	/// The outer result is about the archive: if it ends before the body does, that's a corruption
	/// error. The inner result is about the destination: if writing fails, the rest of the body is
	/// still consumed so the decoder stays aligned on the next entry, and the write error returned.
	pub fn copy_body<W: Write>(&mut self, dest: &mut W) -> Result<io::Result<()>> {
		let mut buf = vec![0; BUFFER_SIZE.min(self.pending as usize)];
		let mut write_error = None;

		while self.pending > 0 {
			let want = buf.len().min(self.pending as usize);
			let got = match self.reader.read(&mut buf[..want]) {
				Ok(0) => {
					return Err(corrupted(format!(
						"archive is corrupted: body of entry {} ends early at byte {} ({} bytes missing)",
						self.index, self.offset, self.pending,
					)))
				}
				Ok(got) => got,
				Err(err) if err.kind() == ErrorKind::Interrupted => continue,
				Err(err) => {
					return Err(Error::from(crate::error::ErrorKind::Corrupted)
						.with_message(format!(
							"archive is corrupted: cannot read body of entry {} at byte {}",
							self.index, self.offset,
						))
						.with_source(err))
				}
			};

			self.pending -= got as u64;
			self.offset += got as u64;

			if write_error.is_none() {
				if let Err(err) = dest.write_all(&buf[..got]) {
					debug!(%err, "write failed, skipping rest of body");
					write_error = Some(err);
				}
			}
		}

		Ok(match write_error {
			Some(err) => Err(err),
			None => Ok(()),
		})
	}

	/// Skip the body of the current entry.
	pub fn skip_body(&mut self) -> Result<()> {
		self.copy_body(&mut io::sink()).map(drop)
	}

	/// Give the reader back.
	pub fn into_inner(self) -> R {
		self.reader
	}
}
