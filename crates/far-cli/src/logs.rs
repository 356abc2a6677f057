use std::{
	env::var,
	fs::{metadata, File},
	io::{stderr, Error, Result},
	path::{Path, PathBuf},
	sync::Mutex,
};

use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::args::Args;

/// Verbosity that a log file implies when no `-v` was given.
const LOG_FILE_VERBOSITY: u8 = 3;

/// Set up logging from `RUST_LOG`, if it's set.
///
/// Returns whether logging was set up, in which case the command line options are ignored.
pub fn from_env() -> Result<bool> {
	if var("RUST_LOG").is_err() {
		return Ok(false);
	}

	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(stderr)
		.try_init()
		.map_err(Error::other)?;
	Ok(true)
}

/// Set up logging from `-v` and `--log-file`.
pub fn from_args(args: &Args) -> Result<()> {
	let Some(filter) = filter_for(args.verbose, args.log_file.is_some()) else {
		return Ok(());
	};
	let verbosity = effective_verbosity(args.verbose, args.log_file.is_some());

	let mut builder = tracing_subscriber::fmt()
		.with_writer(stderr)
		.with_env_filter(filter);
	if verbosity >= 3 {
		builder = builder.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
	}

	let initialised = match &args.log_file {
		Some(target) => {
			let file = File::create(log_path(target, is_dir(target)))?;
			builder.json().with_writer(Mutex::new(file)).try_init()
		}
		None if verbosity >= 4 => builder.pretty().try_init(),
		None => builder.try_init(),
	};

	match initialised {
		Ok(()) => info!(%filter, "logging initialised"),
		Err(err) => eprintln!("Failed to initialise logging, continuing with none\n{err}"),
	}

	Ok(())
}

fn effective_verbosity(verbose: u8, to_file: bool) -> u8 {
	if verbose == 0 && to_file {
		LOG_FILE_VERBOSITY
	} else {
		verbose
	}
}

/// The level filter for a verbosity, or `None` to stay quiet.
fn filter_for(verbose: u8, to_file: bool) -> Option<&'static str> {
	match effective_verbosity(verbose, to_file) {
		0 => None,
		1 => Some("warn"),
		2 => Some("info"),
		3 => Some("debug"),
		_ => Some("trace"),
	}
}

fn is_dir(path: &Path) -> bool {
	metadata(path).map_or(false, |info| info.is_dir())
}

/// Where to write logs: a directory gets a timestamped file inside it.
fn log_path(target: &Path, is_dir: bool) -> PathBuf {
	if is_dir {
		target.join(format!(
			"far.{}.log",
			chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ")
		))
	} else {
		target.to_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn levels() {
		assert_eq!(filter_for(0, false), None);
		assert_eq!(filter_for(1, false), Some("warn"));
		assert_eq!(filter_for(2, false), Some("info"));
		assert_eq!(filter_for(3, false), Some("debug"));
		assert_eq!(filter_for(9, false), Some("trace"));
	}

	#[test]
	fn log_file_implies_debug() {
		assert_eq!(filter_for(0, true), Some("debug"));
		assert_eq!(filter_for(1, true), Some("warn"));
	}

	#[test]
	fn log_paths() {
		assert_eq!(log_path(Path::new("out.log"), false), PathBuf::from("out.log"));

		let named = log_path(Path::new("logs"), true);
		assert_eq!(named.parent(), Some(Path::new("logs")));
		let file = named.file_name().unwrap().to_string_lossy().into_owned();
		assert!(file.starts_with("far.") && file.ends_with("Z.log"), "{file}");
	}
}
