//! Expanding path arguments into the flat list of names to add.
//!
//! Each argument that exists and can be read becomes a candidate. Directories become a candidate
//! for themselves (named with a single trailing separator) followed by all their readable
//! descendants, depth-first, in file name order. Symlinks, sockets, fifos and devices are skipped
//! silently; anything that can't be accessed is skipped with a [`Notice`].

use std::{
	fs::{self, File},
	io,
	path::{Path, PathBuf},
};

use tracing::{debug, instrument, trace};
use walkdir::WalkDir;

use crate::{
	name::{ensure_single_trailing_separator, path_to_name},
	report::{Notice, Report},
};

/// What a candidate is on disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CandidateKind {
	/// A regular file.
	File,

	/// A directory.
	Directory,
}

/// A file or directory to be added to an archive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
	/// Name the entry will have in the archive.
	pub name: Vec<u8>,

	/// Where it is on disk.
	pub path: PathBuf,

	/// What it was when the arguments were expanded.
	pub kind: CandidateKind,
}

impl Candidate {
	/// Make a candidate from a path, without checking anything.
	///
	/// The name is the path as given, with a single trailing separator for directories.
	pub fn new(path: impl Into<PathBuf>, kind: CandidateKind) -> Self {
		let path = path.into();
		let name = match kind {
			CandidateKind::File => path_to_name(&path).into_owned(),
			CandidateKind::Directory => ensure_single_trailing_separator(&path_to_name(&path)),
		};
		Self { name, path, kind }
	}
}

/// Expand path arguments into candidates, in order.
///
/// Problems with individual paths are added to the report.
#[instrument(level = "debug", skip(paths, report))]
pub fn expand<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>, report: &mut Report) -> Vec<Candidate> {
	let mut candidates = Vec::new();
	for path in paths {
		add_path(path.as_ref(), &mut candidates, report);
	}
	debug!(count=%candidates.len(), "expanded candidates");
	candidates
}

fn add_path(root: &Path, candidates: &mut Vec<Candidate>, report: &mut Report) {
	let kind = match check(root) {
		Ok(Some(kind)) => kind,
		Ok(None) => {
			debug!(path=?root, "unsupported file type, skipping");
			return;
		}
		Err(source) => {
			report.notice(Notice::CannotOpen {
				path: root.to_owned(),
				source,
			});
			return;
		}
	};

	let root_candidate = Candidate::new(root, kind);
	trace!(name=%crate::name::display(&root_candidate.name), ?kind, "candidate");
	if kind == CandidateKind::File {
		candidates.push(root_candidate);
		return;
	}

	let prefix = root_candidate.name.clone();
	candidates.push(root_candidate);

	let mut walk = WalkDir::new(root)
		.follow_links(false)
		.sort_by_file_name()
		.min_depth(1)
		.into_iter();

	while let Some(entry) = walk.next() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				let path = err.path().unwrap_or(root).to_owned();
				report.notice(Notice::CannotOpen {
					path,
					source: err.into(),
				});
				continue;
			}
		};

		let kind = match check(entry.path()) {
			Ok(Some(kind)) => kind,
			Ok(None) => {
				debug!(path=?entry.path(), "unsupported file type, skipping");
				continue;
			}
			Err(source) => {
				if entry.file_type().is_dir() {
					walk.skip_current_dir();
				}
				report.notice(Notice::CannotOpen {
					path: entry.path().to_owned(),
					source,
				});
				continue;
			}
		};

		// names of descendants hang off the root's normalised name, not the path as walked
		let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
		let mut name = prefix.clone();
		name.extend_from_slice(&path_to_name(relative));
		if kind == CandidateKind::Directory {
			name = ensure_single_trailing_separator(&name);
		}

		trace!(name=%crate::name::display(&name), ?kind, "candidate");
		candidates.push(Candidate {
			name,
			path: entry.into_path(),
			kind,
		});
	}
}

/// Check that a path is a supported type and can be opened.
///
/// Returns `None` for unsupported types. Symlinks are not followed.
fn check(path: &Path) -> io::Result<Option<CandidateKind>> {
	let file_type = fs::symlink_metadata(path)?.file_type();
	if file_type.is_file() {
		File::open(path)?;
		Ok(Some(CandidateKind::File))
	} else if file_type.is_dir() {
		fs::read_dir(path)?;
		Ok(Some(CandidateKind::Directory))
	} else {
		Ok(None)
	}
}
