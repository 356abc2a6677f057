use tracing::instrument;

use crate::{error::Result, name::display, report::Report};

use super::Archive;

/// Name and size of a stored entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryInfo {
	/// Entry name.
	pub name: Vec<u8>,

	/// Body size in bytes.
	pub size: u32,
}

impl EntryInfo {
	/// Whether this is a directory entry.
	pub fn is_directory(&self) -> bool {
		self.name.last() == Some(&crate::format::SEPARATOR)
	}
}

impl std::fmt::Display for EntryInfo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:>8} {}", self.size, display(&self.name))
	}
}

impl Archive {
	/// Go through every entry, in order, without extracting anything.
	///
	/// Entries are passed to the callback as they are read, so on a corrupted archive the ones
	/// before the corruption are still seen.
	#[instrument(level = "debug", skip(self, each), fields(archive = ?self.path))]
	pub fn list(&self, mut each: impl FnMut(EntryInfo)) -> Result<Report> {
		let mut decoder = self.open_read()?;
		let mut report = Report::default();

		while let Some(header) = decoder.next_entry()? {
			each(EntryInfo {
				name: header.name().to_vec(),
				size: header.size,
			});
			decoder.skip_body()?;
			report.entries += 1;
		}

		Ok(report)
	}

	/// Collect every entry's name and size.
	pub fn entries(&self) -> Result<Vec<EntryInfo>> {
		let mut entries = Vec::new();
		self.list(|entry| entries.push(entry))?;
		Ok(entries)
	}
}
