//! Integration tests for the read-only operations: extracting and listing.

mod common;

use std::{fs, path::Path};

use far::{
	archive::{Archive, EntryInfo, Options},
	error::ErrorKind,
	report::Notice,
};
use tempfile::tempdir;

use common::write_archive;

fn extracting_to(path: &Path, destination: &Path) -> Archive {
	fs::create_dir_all(destination).unwrap();
	Archive::with_options(
		path,
		Options {
			destination: destination.to_owned(),
		},
	)
}

/// An archive whose last body ends three bytes early.
fn cut_short(path: &Path) {
	write_archive(path, &[("x.txt", "hello"), ("y.txt", "goodbye")]);
	let mut bytes = fs::read(path).unwrap();
	bytes.truncate(bytes.len() - 3);
	fs::write(path, &bytes).unwrap();
}

// ============================================================================
// Extracting
// ============================================================================

#[test]
fn extract_everything() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(
		&path,
		&[("x.txt", "hello"), ("d/", ""), ("d/y.txt", "inner"), ("empty", "")],
	);
	let out = tmp.path().join("out");

	let report = extracting_to(&path, &out)
		.extract(Vec::<Vec<u8>>::new())
		.unwrap();

	assert!(report.is_clean());
	assert_eq!(report.entries, 4);
	assert_eq!(fs::read_to_string(out.join("x.txt")).unwrap(), "hello");
	assert_eq!(fs::read_to_string(out.join("d/y.txt")).unwrap(), "inner");
	assert_eq!(fs::read(out.join("empty")).unwrap(), b"");
	assert!(out.join("d").is_dir());
}

#[test]
fn extract_selected_reports_the_rest() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(&path, &[("a", "1"), ("b", "2"), ("c", "3")]);
	let out = tmp.path().join("out");

	let report = extracting_to(&path, &out)
		.extract(["a", "missing", "b"])
		.unwrap();

	assert_eq!(report.entries, 2);
	assert_eq!(report.not_found().collect::<Vec<_>>(), ["missing"]);
	assert!(out.join("a").is_file());
	assert!(out.join("b").is_file());
	assert!(!out.join("c").exists());
}

#[test]
fn extract_by_directory_prefix() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(
		&path,
		&[("d/", ""), ("d/x", "x"), ("d/e/f", "f"), ("dd", "no"), ("top", "no")],
	);
	let out = tmp.path().join("out");

	let report = extracting_to(&path, &out).extract(["d"]).unwrap();

	assert!(report.is_clean());
	assert_eq!(report.entries, 3);
	assert_eq!(fs::read_to_string(out.join("d/x")).unwrap(), "x");
	assert_eq!(fs::read_to_string(out.join("d/e/f")).unwrap(), "f");
	assert!(!out.join("dd").exists());
	assert!(!out.join("top").exists());
}

#[test]
fn extract_does_not_modify_the_archive() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(&path, &[("x.txt", "hello")]);
	let before = fs::read(&path).unwrap();

	extracting_to(&path, &tmp.path().join("out"))
		.extract(["x.txt"])
		.unwrap();

	assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn unsafe_names_are_skipped() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(
		&path,
		&[("../escape", "bad"), ("/rooted", "bad"), ("ok", "good")],
	);
	let out = tmp.path().join("out");

	let report = extracting_to(&path, &out)
		.extract(Vec::<Vec<u8>>::new())
		.unwrap();

	assert!(matches!(
		report.notices.as_slice(),
		[Notice::UnsafePath { .. }, Notice::UnsafePath { .. }]
	));
	assert!(!tmp.path().join("escape").exists());
	assert_eq!(fs::read_to_string(out.join("ok")).unwrap(), "good");
}

#[test]
fn unwritable_entries_stay_aligned() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(&path, &[("taken", "not extracted"), ("after", "still here")]);
	let out = tmp.path().join("out");
	fs::create_dir_all(out.join("taken")).unwrap();

	let report = extracting_to(&path, &out)
		.extract(Vec::<Vec<u8>>::new())
		.unwrap();

	assert!(matches!(
		report.notices.as_slice(),
		[Notice::CannotOpen { .. }]
	));
	assert!(out.join("taken").is_dir());
	assert_eq!(fs::read_to_string(out.join("after")).unwrap(), "still here");
}

#[test]
fn extract_overwrites_existing_files() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(&path, &[("x.txt", "new")]);
	let out = tmp.path().join("out");
	fs::create_dir_all(&out).unwrap();
	fs::write(out.join("x.txt"), "something much longer").unwrap();

	extracting_to(&path, &out)
		.extract(Vec::<Vec<u8>>::new())
		.unwrap();

	assert_eq!(fs::read_to_string(out.join("x.txt")).unwrap(), "new");
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn list_in_stored_order() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(&path, &[("x.txt", "hello"), ("d/", ""), ("y.txt", "bye")]);

	let entries = Archive::new(&path).entries().unwrap();
	assert_eq!(
		entries,
		[
			EntryInfo {
				name: b"x.txt".to_vec(),
				size: 5
			},
			EntryInfo {
				name: b"d/".to_vec(),
				size: 0
			},
			EntryInfo {
				name: b"y.txt".to_vec(),
				size: 3
			},
		]
	);

	let lines: Vec<String> = entries.iter().map(ToString::to_string).collect();
	assert_eq!(lines, ["       5 x.txt", "       0 d/", "       3 y.txt"]);
}

#[test]
fn list_empty_archive() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	write_archive(&path, &[]);

	let report = Archive::new(&path).list(|_| panic!("no entries")).unwrap();
	assert_eq!(report.entries, 0);
}

#[test]
fn list_shows_entries_before_corruption() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	cut_short(&path);

	let mut seen = Vec::new();
	let err = Archive::new(&path)
		.list(|entry| seen.push(entry.name))
		.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::Corrupted);
	assert_eq!(err.exit_code(), 3);
	assert_eq!(seen, [b"x.txt".to_vec(), b"y.txt".to_vec()]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_archive_is_an_open_error() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("absent.far");

	let err = Archive::new(&path).entries().unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Open);

	let err = extracting_to(&path, &tmp.path().join("out"))
		.extract(Vec::<Vec<u8>>::new())
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Open);
	assert_eq!(err.exit_code(), 2);
}

#[test]
fn garbage_is_corrupted() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	fs::write(&path, b"\x01\0\0\0no terminator").unwrap();

	let err = extracting_to(&path, &tmp.path().join("out"))
		.extract(Vec::<Vec<u8>>::new())
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Corrupted);
}

#[test]
fn extract_truncated_mid_body_is_corrupted() {
	let tmp = tempdir().unwrap();
	let path = tmp.path().join("a.far");
	cut_short(&path);
	let out = tmp.path().join("out");

	let err = extracting_to(&path, &out)
		.extract(Vec::<Vec<u8>>::new())
		.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::Corrupted);
	assert_eq!(err.exit_code(), 3);
	assert_eq!(fs::read_to_string(out.join("x.txt")).unwrap(), "hello");
}
