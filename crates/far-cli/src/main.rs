#![warn(clippy::unwrap_used)]
#![deny(rust_2018_idioms)]

use std::{path::Path, process::ExitCode};

use far::{
	archive::{Archive, Options},
	name::path_to_name,
};
use tracing::{debug, warn};

use crate::args::{Action, Args};

mod args;
mod delete;
mod list_files;
mod logs;
mod pack;
mod unpack;

fn main() -> ExitCode {
	let logs_on = match logs::from_env() {
		Ok(on) => on,
		Err(err) => {
			eprintln!("Failed to initialise logging with RUST_LOG\n{err}");
			false
		}
	};

	debug!("parsing arguments");
	let (args, action) = match Args::parse_with_action(std::env::args_os()) {
		Ok(parsed) => parsed,
		Err(rejection) => {
			rejection.print();
			return ExitCode::from(rejection.exit_code());
		}
	};

	if logs_on {
		warn!("ignoring logging options from args");
	} else if let Err(err) = logs::from_args(&args) {
		eprintln!("Failed to initialise logging, continuing with none\n{err}");
	}

	debug!(?args, "got arguments");

	let archive = Archive::with_options(
		&args.archive,
		Options {
			destination: args.directory.clone(),
		},
	);
	let names: Vec<Vec<u8>> = args
		.names
		.iter()
		.map(|name| path_to_name(Path::new(name)).into_owned())
		.collect();

	let result = match action {
		Action::Add => pack::pack(&archive, &names),
		Action::Extract => unpack::unpack(&archive, &names),
		Action::Delete => delete::delete(&archive, &names),
		Action::List => list_files::list_files(&archive),
	};

	match result {
		Ok(report) => {
			for notice in &report.notices {
				eprintln!("{notice}");
			}
			debug!(entries=%report.entries, notices=%report.notices.len(), "done");
			ExitCode::SUCCESS
		}
		Err(err) => {
			let code = err.exit_code();
			eprintln!("{:?}", miette::Report::new(err));
			ExitCode::from(code)
		}
	}
}
