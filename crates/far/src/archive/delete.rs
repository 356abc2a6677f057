use tracing::instrument;

use crate::{error::Result, report::Report, selector::Matcher};

use super::{rewrite::Rewrite, Archive};

impl Archive {
	/// Delete entries matching any of the selectors.
	///
	/// A selector matches an entry with the same name, and every entry under the directory it names.
	/// Selectors that match nothing are reported. With no selectors at all this does nothing, and
	/// doesn't even look at the archive.
	///
	/// The archive must exist.
	#[instrument(level = "debug", skip(self, selectors), fields(archive = ?self.path))]
	pub fn delete<S: Into<Vec<u8>>>(&self, selectors: impl IntoIterator<Item = S>) -> Result<Report> {
		let mut matcher = Matcher::new(selectors);
		let mut report = Report::default();
		if matcher.is_empty() {
			return Ok(report);
		}

		let mut rewrite = Rewrite::begin(&self.path, false)?;
		while let Some(header) = rewrite.next_entry()? {
			if matcher.resolve(header.name()).is_some() {
				rewrite.discard(&header)?;
			} else {
				rewrite.keep(&header)?;
			}
		}

		for notice in matcher.unused_notices() {
			report.notice(notice);
		}

		report.entries = rewrite.commit()?;
		Ok(report)
	}
}
