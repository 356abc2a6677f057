use far::{archive::Archive, error::Result, name::strip_trailing_separators, report::Report};
use tracing::info;

pub(crate) fn unpack(archive: &Archive, names: &[Vec<u8>]) -> Result<Report> {
	info!(path=?archive.path(), destination=?archive.options().destination, "extract from archive");
	archive.extract(names.iter().map(|name| strip_trailing_separators(name)))
}
