use far::{
	archive::Archive,
	error::Result,
	name::{name_to_path, strip_trailing_separators},
	report::Report,
};
use tracing::info;

pub(crate) fn pack(archive: &Archive, names: &[Vec<u8>]) -> Result<Report> {
	info!(path=?archive.path(), count=%names.len(), "add to archive");
	archive.add_paths(names.iter().map(|name| name_to_path(&strip_trailing_separators(name))))
}
