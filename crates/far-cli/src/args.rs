use std::{ffi::OsString, path::PathBuf, str::FromStr};

use clap::{ArgAction, Parser, ValueHint};

const USAGE: &str = "far <r|x|d|t> <ARCHIVE> [NAME]...";

/// Exit code for an invocation of the wrong shape.
pub const INVALID_ARGUMENTS: u8 = 1;

/// Exit code for an unknown command key.
pub const INVALID_COMMAND: u8 = 4;

/// Pack, list, extract and delete files in a flat archive.
#[derive(Debug, Clone, Parser)]
#[command(
	name = "far",
	bin_name = "far",
	author,
	version,
	override_usage = USAGE,
	after_help = "Want more detail? Try the long '--help' flag!",
	after_long_help = "Didn't expect this much output? Use the short '-h' flag to get short help."
)]
#[cfg_attr(debug_assertions, command(before_help = "⚠ DEBUG BUILD ⚠"))]
pub struct Args {
	/// What to do.
	///
	/// 'r' adds files and directories, replacing entries of the same name; 'x' extracts entries
	/// (all of them if no names are given); 'd' deletes entries; 't' lists entries with their size.
	#[arg(value_name = "KEY")]
	pub key: String,

	/// Archive file.
	#[arg(
		value_hint = ValueHint::FilePath,
		value_name = "ARCHIVE",
	)]
	pub archive: PathBuf,

	/// Files, directories, or stored names to act on.
	///
	/// Naming a directory selects everything under it.
	#[arg(
		value_hint = ValueHint::AnyPath,
		value_name = "NAME",
	)]
	pub names: Vec<OsString>,

	/// Directory to extract into.
	#[arg(
		short = 'C',
		long,
		value_hint = ValueHint::DirPath,
		value_name = "DIR",
		default_value = ".",
	)]
	pub directory: PathBuf,

	/// Set diagnostic log level.
	///
	/// This enables diagnostic logging, which is useful for investigating bugs. Use multiple times
	/// to increase verbosity.
	///
	/// You may want to use with '--log-file' to avoid polluting your terminal.
	///
	/// If $RUST_LOG is set, this flag is ignored.
	#[arg(
		long,
		short,
		action = ArgAction::Count,
	)]
	pub verbose: u8,

	/// Write diagnostic logs to a file.
	///
	/// This writes diagnostic logs to a file, instead of the terminal, in JSON format. If a log
	/// level was not already specified, this will set it to '-vvv'.
	///
	/// If a path is not provided, the default is the working directory.
	///
	/// If the path provided is a directory, a file will be created in that directory. The file name
	/// will be the current date and time, in the format 'far.YYYY-MM-DDTHH-MM-SSZ.log'.
	#[arg(
		long,
		num_args = 0..=1,
		default_missing_value = ".",
		value_hint = ValueHint::AnyPath,
		value_name = "PATH",
	)]
	pub log_file: Option<PathBuf>,
}

impl Args {
	/// Parse the command line, including the command key.
	pub fn parse_with_action<I, T>(args: I) -> Result<(Self, Action), Rejection>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString> + Clone,
	{
		let args = Self::try_parse_from(args).map_err(Rejection::Shape)?;
		let action = args.key.parse().map_err(Rejection::Command)?;
		Ok((args, action))
	}
}

/// Why a command line was turned down before doing anything.
#[derive(Debug)]
pub enum Rejection {
	/// Wrong shape, or a request for help or version.
	Shape(clap::Error),

	/// Unknown command key.
	Command(String),
}

impl Rejection {
	/// Process exit code: help and version output are not failures.
	pub fn exit_code(&self) -> u8 {
		match self {
			Self::Shape(err) if !err.use_stderr() => 0,
			Self::Shape(_) => INVALID_ARGUMENTS,
			Self::Command(_) => INVALID_COMMAND,
		}
	}

	/// Print the message where it belongs.
	pub fn print(&self) {
		match self {
			Self::Shape(err) => {
				let _ = err.print();
			}
			Self::Command(message) => eprintln!("{message}\nusage: {USAGE}"),
		}
	}
}

/// The operation selected by the first argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
	/// `r`: add or replace.
	Add,
	/// `x`: extract.
	Extract,
	/// `d`: delete.
	Delete,
	/// `t`: list.
	List,
}

impl FromStr for Action {
	type Err = String;

	fn from_str(key: &str) -> Result<Self, Self::Err> {
		match key {
			"r" => Ok(Self::Add),
			"x" => Ok(Self::Extract),
			"d" => Ok(Self::Delete),
			"t" => Ok(Self::List),
			other => Err(format!("invalid command '{other}', expected one of r, x, d, t")),
		}
	}
}
