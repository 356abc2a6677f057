//! Encoder types and functions.

use std::{
	fs::File,
	io::{BufWriter, Cursor, Error, ErrorKind, Read, Result, Seek, SeekFrom, Write},
};

use deku::DekuContainerWrite;
use tempfile::NamedTempFile;
use tracing::{debug, instrument, trace};

use crate::{
	decode::Decoder,
	format::{ArchiveHeader, EntryHeader},
};

const BUFFER_SIZE: usize = 64 * 1024;

/// Writers that can be cut back to an earlier length.
///
/// The encoder uses this to discard a partially written entry when its source turns out to be
/// shorter than announced.
pub trait Truncate: Write + Seek {
	/// Set the length of the written data, discarding anything past it.
	fn truncate(&mut self, len: u64) -> Result<()>;
}

impl Truncate for File {
	fn truncate(&mut self, len: u64) -> Result<()> {
		self.set_len(len)
	}
}

impl Truncate for NamedTempFile {
	fn truncate(&mut self, len: u64) -> Result<()> {
		self.as_file().set_len(len)
	}
}

impl Truncate for Cursor<Vec<u8>> {
	fn truncate(&mut self, len: u64) -> Result<()> {
		self.get_mut().truncate(len as _);
		Ok(())
	}
}

impl<W: Truncate> Truncate for BufWriter<W> {
	fn truncate(&mut self, len: u64) -> Result<()> {
		self.flush()?;
		self.get_mut().truncate(len)
	}
}

/// Archive encoder.
///
/// Creating the encoder reserves the header; entries are then appended one after the other, and
/// [`Encoder::finalise()`] writes the real count into the header.
#[derive(Debug)]
pub struct Encoder<W> {
	writer: W,

	/// Position of the header in the writer.
	start: u64,

	/// Number of entries written so far.
	count: u32,
}

impl<W: Truncate> Encoder<W> {
	/// Create a new encoder and reserve the header.
	#[instrument(level = "trace", skip(writer))]
	pub fn new(mut writer: W) -> Result<Self> {
		let start = writer.stream_position()?;
		trace!(%start, "reserve archive header");
		writer.write_all(&to_bytes(&ArchiveHeader::default())?)?;
		Ok(Self {
			writer,
			start,
			count: 0,
		})
	}

	/// Number of entries written so far.
	pub fn count(&self) -> u32 {
		self.count
	}

	fn bump(&mut self) -> Result<()> {
		self.count = self
			.count
			.checked_add(1)
			.ok_or_else(|| Error::other("too many entries for one archive"))?;
		Ok(())
	}

	/// Copy the current entry of a decoder verbatim.
	///
	/// The outer result is the decoder's: a corruption error from the source archive. Errors
	/// writing to this encoder are the inner result.
	pub fn copy_entry<R: Read>(
		&mut self,
		header: &EntryHeader,
		decoder: &mut Decoder<R>,
	) -> crate::error::Result<Result<()>> {
		if let Err(err) = self.write_header(header) {
			decoder.skip_body()?;
			return Ok(Err(err));
		}

		Ok(match decoder.copy_body(&mut self.writer)? {
			Ok(()) => self.bump(),
			Err(err) => Err(err),
		})
	}

	/// Append a directory entry: the name and a zero size.
	#[instrument(level = "trace", skip(self))]
	pub fn add_directory(&mut self, name: &[u8]) -> Result<()> {
		self.write_header(&EntryHeader::new(name, 0)?)?;
		self.bump()
	}

	/// Append a file entry, reading exactly `size` bytes of body from `body`.
	///
	/// The outer result is about this encoder's writer. The inner result is about the source: if
	/// reading fails or the source ends early, the partial entry is removed again and the error
	/// returned, leaving the archive as it was before the call.
	#[instrument(level = "trace", skip(self, body))]
	pub fn add_file<R: Read>(
		&mut self,
		name: &[u8],
		size: u32,
		mut body: R,
	) -> Result<Result<()>> {
		let header = EntryHeader::new(name, size)?;
		let rollback = self.writer.stream_position()?;
		self.write_header(&header)?;

		let mut buf = vec![0; BUFFER_SIZE.min(size as usize)];
		let mut remaining = u64::from(size);
		while remaining > 0 {
			let want = buf.len().min(remaining as usize);
			let got = match body.read(&mut buf[..want]) {
				Ok(0) => Err(Error::new(
					ErrorKind::UnexpectedEof,
					format!("file ended {remaining} bytes short of its size"),
				)),
				Ok(got) => Ok(got),
				Err(err) if err.kind() == ErrorKind::Interrupted => continue,
				Err(err) => Err(err),
			};

			match got {
				Ok(got) => {
					self.writer.write_all(&buf[..got])?;
					remaining -= got as u64;
				}
				Err(err) => {
					debug!(%rollback, %err, "source failed, discarding partial entry");
					self.writer.truncate(rollback)?;
					self.writer.seek(SeekFrom::Start(rollback))?;
					return Ok(Err(err));
				}
			}
		}

		self.bump()?;
		Ok(Ok(()))
	}

	fn write_header(&mut self, header: &EntryHeader) -> Result<()> {
		self.writer.write_all(&to_bytes(header)?)
	}

	/// Write the final count into the header, and return the writer.
	///
	/// This must be the last write: the writer is left positioned just after the header.
	#[instrument(level = "trace", skip(self))]
	pub fn finalise(mut self) -> Result<W> {
		trace!(count=%self.count, "write final entry count");
		self.writer.seek(SeekFrom::Start(self.start))?;
		self.writer
			.write_all(&to_bytes(&ArchiveHeader { count: self.count })?)?;
		self.writer.flush()?;
		Ok(self.writer)
	}
}

fn to_bytes(structure: &impl DekuContainerWrite) -> Result<Vec<u8>> {
	structure.to_bytes().map_err(Error::other)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encode(build: impl FnOnce(&mut Encoder<Cursor<Vec<u8>>>)) -> Vec<u8> {
		let mut encoder = Encoder::new(Cursor::new(Vec::new())).unwrap();
		build(&mut encoder);
		encoder.finalise().unwrap().into_inner()
	}

	#[test]
	fn empty_archive_is_just_a_count() {
		assert_eq!(encode(|_| {}), vec![0, 0, 0, 0]);
	}

	#[test]
	fn entries_are_contiguous() {
		let bytes = encode(|enc| {
			enc.add_directory(b"d/").unwrap();
			enc.add_file(b"d/x", 2, &b"hi"[..]).unwrap().unwrap();
		});

		let mut expected = vec![2, 0, 0, 0];
		expected.extend_from_slice(b"d/\0\0\0\0\0");
		expected.extend_from_slice(b"d/x\0\x02\0\0\0hi");
		assert_eq!(bytes, expected);
	}

	#[test]
	fn short_sources_are_rolled_back() {
		let bytes = encode(|enc| {
			enc.add_file(b"a", 1, &b"A"[..]).unwrap().unwrap();
			let err = enc.add_file(b"b", 10, &b"short"[..]).unwrap().unwrap_err();
			assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
			assert_eq!(enc.count(), 1);
		});

		let mut expected = vec![1, 0, 0, 0];
		expected.extend_from_slice(b"a\0\x01\0\0\0A");
		assert_eq!(bytes, expected);
	}

	#[test]
	fn copies_entries_from_a_decoder() {
		let source = encode(|enc| {
			enc.add_file(b"x.txt", 5, &b"hello"[..]).unwrap().unwrap();
			enc.add_file(b"y.txt", 3, &b"bye"[..]).unwrap().unwrap();
		});

		let mut decoder = Decoder::new(Cursor::new(source.clone())).unwrap();
		let copy = encode(|enc| {
			while let Some(header) = decoder.next_entry().unwrap() {
				enc.copy_entry(&header, &mut decoder).unwrap().unwrap();
			}
		});
		assert_eq!(copy, source);
	}
}
