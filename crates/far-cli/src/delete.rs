use far::{archive::Archive, error::Result, name::strip_trailing_separators, report::Report};
use tracing::info;

pub(crate) fn delete(archive: &Archive, names: &[Vec<u8>]) -> Result<Report> {
	info!(path=?archive.path(), count=%names.len(), "delete from archive");
	archive.delete(names.iter().map(|name| strip_trailing_separators(name)))
}
