use std::{collections::HashSet, path::Path};

use tracing::{debug, instrument, trace};

use crate::{
	candidates::{expand, Candidate},
	error::Result,
	report::Report,
};

use super::{rewrite::Rewrite, Archive};

impl Archive {
	/// Add or replace files and directories, given as paths.
	///
	/// The paths are expanded into candidates first (see [`crate::candidates`]), then added as with
	/// [`Archive::add()`]. Paths that can't be used are reported in the returned [`Report`].
	///
	/// With no paths at all this does nothing, and doesn't even look at the archive.
	pub fn add_paths<P: AsRef<Path>>(&self, paths: impl IntoIterator<Item = P>) -> Result<Report> {
		let mut paths = paths.into_iter().peekable();
		if paths.peek().is_none() {
			debug!(archive=?self.path, "no paths to add");
			return Ok(Report::default());
		}

		let mut report = Report::default();
		let candidates = expand(paths, &mut report);
		self.add_with_report(&candidates, report)
	}

	/// Add or replace candidates.
	///
	/// Stored entries whose name equals a candidate's are dropped, and the candidates are appended
	/// at the end, so a replaced entry moves to the end of the archive. A candidate whose name
	/// already appeared earlier in the list is ignored. If the archive doesn't exist, it's created.
	pub fn add(&self, candidates: &[Candidate]) -> Result<Report> {
		self.add_with_report(candidates, Report::default())
	}

	#[instrument(level = "debug", skip(self, candidates, report), fields(archive = ?self.path, candidates = candidates.len()))]
	fn add_with_report(&self, candidates: &[Candidate], mut report: Report) -> Result<Report> {
		let mut rewrite = Rewrite::begin(&self.path, true)?;
		let replacing: HashSet<&[u8]> = candidates.iter().map(|c| c.name.as_slice()).collect();

		while let Some(header) = rewrite.next_entry()? {
			if replacing.contains(header.name()) {
				debug!(name=%crate::name::display(header.name()), "replacing entry");
				rewrite.discard(&header)?;
			} else {
				rewrite.keep(&header)?;
			}
		}

		let mut appended = HashSet::with_capacity(candidates.len());
		for candidate in candidates {
			if !appended.insert(candidate.name.as_slice()) {
				trace!(name=%crate::name::display(&candidate.name), "duplicate candidate, ignoring");
				continue;
			}

			rewrite.append(candidate, &mut report)?;
		}

		report.entries = rewrite.commit()?;
		Ok(report)
	}
}
