use deku::prelude::*;

/// Length of the archive header in bytes.
pub const HEADER_LENGTH: usize = 4;

/// Archive header.
///
/// This is only the number of entries that follow. When writing, it is reserved with a zero count
/// first and overwritten once the entry stream is complete.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct ArchiveHeader {
	/// Number of entries in the archive.
	pub count: u32,
}
