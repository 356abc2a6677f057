use far::{archive::Archive, error::Result, report::Report};
use tracing::info;

pub(crate) fn list_files(archive: &Archive) -> Result<Report> {
	info!(path=?archive.path(), "list archive");
	archive.list(|entry| println!("{entry}"))
}
