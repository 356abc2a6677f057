use std::{
	ffi::OsString,
	fs::{self, File, Permissions},
	io::{self, BufReader, BufWriter, ErrorKind as IoErrorKind},
	path::Path,
};

use tempfile::NamedTempFile;
use tracing::{debug, instrument, trace};

use crate::{
	candidates::Candidate,
	decode::Decoder,
	encode::Encoder,
	error::{temp_file, Error, ErrorKind, Result},
	format::EntryHeader,
	name::display,
	report::{Notice, Report},
};

/// Where a rewrite is at.
///
/// A rewrite only ever moves forward through these. Dropping it anywhere before
/// [`Committed`](Stage::Committed) abandons it: the scratch file is removed and the archive is
/// left untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Stage {
	/// Nothing opened yet.
	Init,
	/// The old archive is open and its header read.
	OldOpened,
	/// There is no old archive; starting from empty.
	OldAbsent,
	/// The scratch archive is created and its header reserved.
	TempOpened,
	/// Old entries are being kept or dropped.
	Streaming,
	/// New entries are being appended.
	Appending,
	/// The count is being written and the scratch file promoted.
	Finalizing,
	/// The scratch file has replaced the archive.
	Committed,
	/// The rewrite was abandoned.
	Failed,
}

/// One rewrite of an archive into a scratch file.
#[derive(Debug)]
pub(crate) struct Rewrite<'target> {
	target: &'target Path,
	old: Option<Decoder<BufReader<File>>>,
	old_permissions: Option<Permissions>,
	encoder: Option<Encoder<BufWriter<NamedTempFile>>>,
	stage: Stage,
}

impl<'target> Rewrite<'target> {
	/// Open the old archive and create the scratch file.
	///
	/// If `missing_ok`, an archive that doesn't exist is treated as empty. A corrupted header is
	/// reported before any scratch file is created.
	#[instrument(level = "debug")]
	pub fn begin(target: &'target Path, missing_ok: bool) -> Result<Self> {
		let mut stage = Stage::Init;

		let (old, old_permissions) = match File::open(target) {
			Ok(file) => {
				let permissions = file.metadata().ok().map(|meta| meta.permissions());
				let decoder = Decoder::new(BufReader::new(file))?;
				stage = advance(stage, Stage::OldOpened);
				(Some(decoder), permissions)
			}
			Err(err) if missing_ok && err.kind() == IoErrorKind::NotFound => {
				stage = advance(stage, Stage::OldAbsent);
				(None, None)
			}
			Err(err) => return Err(Error::at_path(ErrorKind::Open, target, err)),
		};

		let scratch = scratch_file(target).map_err(|err| {
			Error::at_path(ErrorKind::TempFile, target, err)
				.with_message(format!("failed to create temporary file next to {}", target.display()))
		})?;
		debug!(path=?scratch.path(), "created scratch archive");

		let encoder = Encoder::new(BufWriter::new(scratch)).map_err(temp_file)?;
		stage = advance(stage, Stage::TempOpened);

		Ok(Self {
			target,
			old,
			old_permissions,
			encoder: Some(encoder),
			stage,
		})
	}

	fn encoder(&mut self) -> Result<&mut Encoder<BufWriter<NamedTempFile>>> {
		self.encoder.as_mut().ok_or_else(finalised)
	}

	fn enter(&mut self, stage: Stage) {
		if self.stage != stage {
			self.stage = advance(self.stage, stage);
		}
	}

	/// Read the next entry of the old archive, if any.
	pub fn next_entry(&mut self) -> Result<Option<EntryHeader>> {
		self.enter(Stage::Streaming);
		match self.old.as_mut() {
			Some(old) => old.next_entry(),
			None => Ok(None),
		}
	}

	/// Copy the current old entry into the new archive.
	pub fn keep(&mut self, header: &EntryHeader) -> Result<()> {
		let (Some(old), Some(encoder)) = (self.old.as_mut(), self.encoder.as_mut()) else {
			return Ok(());
		};

		trace!(name=%crate::name::display(header.name()), "keep");
		encoder.copy_entry(header, old)?.map_err(temp_file)
	}

	/// Leave the current old entry out of the new archive.
	pub fn discard(&mut self, header: &EntryHeader) -> Result<()> {
		let Some(old) = self.old.as_mut() else {
			return Ok(());
		};

		debug!(name=%crate::name::display(header.name()), "drop");
		old.skip_body()
	}

	/// Append a candidate to the new archive.
	///
	/// Whether it's a directory or a file is looked up again now. Candidates that can't be read, or
	/// whose name can't be stored, are reported and left out.
	pub fn append(&mut self, candidate: &Candidate, report: &mut Report) -> Result<()> {
		self.enter(Stage::Appending);

		if candidate.name.contains(&0) {
			report.notice(Notice::InvalidName {
				name: display(&candidate.name).into_owned(),
			});
			return Ok(());
		}

		let meta = match fs::metadata(&candidate.path) {
			Ok(meta) => meta,
			Err(source) => {
				report.notice(Notice::CannotOpen {
					path: candidate.path.clone(),
					source,
				});
				return Ok(());
			}
		};

		if meta.is_dir() {
			trace!(name=%crate::name::display(&candidate.name), "append directory");
			return self
				.encoder()?
				.add_directory(&candidate.name)
				.map_err(temp_file);
		}

		let Ok(size) = u32::try_from(meta.len()) else {
			report.notice(Notice::TooLarge {
				path: candidate.path.clone(),
				size: meta.len(),
			});
			return Ok(());
		};

		let file = match File::open(&candidate.path) {
			Ok(file) => file,
			Err(source) => {
				report.notice(Notice::CannotOpen {
					path: candidate.path.clone(),
					source,
				});
				return Ok(());
			}
		};

		trace!(name=%crate::name::display(&candidate.name), %size, "append file");
		if let Err(source) = self
			.encoder()?
			.add_file(&candidate.name, size, BufReader::new(file))
			.map_err(temp_file)?
		{
			report.notice(Notice::CannotOpen {
				path: candidate.path.clone(),
				source,
			});
		}

		Ok(())
	}

	/// Write the final count and replace the archive with the scratch file.
	///
	/// Returns the number of entries in the new archive.
	#[instrument(level = "debug", skip(self), fields(target = ?self.target))]
	pub fn commit(mut self) -> Result<u32> {
		self.enter(Stage::Finalizing);
		let encoder = self.encoder.take().ok_or_else(finalised)?;
		let count = encoder.count();

		let scratch = encoder
			.finalise()
			.map_err(temp_file)?
			.into_inner()
			.map_err(|err| temp_file(err.into_error()))?;
		scratch.as_file().sync_all().map_err(temp_file)?;

		if let Some(permissions) = self.old_permissions.take().or_else(default_permissions) {
			fs::set_permissions(scratch.path(), permissions).map_err(temp_file)?;
		}

		// close the old archive before replacing it
		drop(self.old.take());

		scratch
			.persist(self.target)
			.map_err(|err| temp_file(err.error))?;
		self.enter(Stage::Committed);
		debug!(%count, "committed archive");
		Ok(count)
	}
}

impl Drop for Rewrite<'_> {
	fn drop(&mut self) {
		if self.stage != Stage::Committed {
			let from = self.stage;
			self.stage = Stage::Failed;
			debug!(?from, target=?self.target, "abandoned rewrite, scratch archive removed");
		}
	}
}

fn advance(from: Stage, to: Stage) -> Stage {
	debug_assert!(from < to, "rewrite cannot go from {from:?} back to {to:?}");
	trace!(?from, ?to, "rewrite stage");
	to
}

/// Create a uniquely named scratch file in the same directory as the target.
///
/// Keeping it on the same filesystem is what makes the final rename atomic.
fn scratch_file(target: &Path) -> io::Result<NamedTempFile> {
	let dir = match target.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut prefix = OsString::from(".");
	prefix.push(target.file_name().unwrap_or_else(|| "archive".as_ref()));
	prefix.push(".");

	let scratch = tempfile::Builder::new()
		.prefix(&prefix)
		.suffix(".tmp")
		.tempfile_in(dir)?;
	Ok(scratch)
}

fn finalised() -> Error {
	Error::new(ErrorKind::TempFile)
		.with_message("scratch archive was already finalised")
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
	use std::os::unix::fs::PermissionsExt;
	Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
	None
}
