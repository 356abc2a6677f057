//! Shared test utilities for integration tests.
//!
//! `#![allow(dead_code)]` is needed because each integration test file compiles as a separate
//! crate and may only use some of these helpers.

#![allow(dead_code)]

use std::{
	fs::{self, File},
	io::BufReader,
	path::{Path, PathBuf},
};

use far::{
	candidates::{Candidate, CandidateKind},
	decode::Decoder,
	encode::Encoder,
};

/// Write an archive made of these (name, body) entries.
pub fn write_archive(path: &Path, entries: &[(&str, &str)]) {
	let file = File::create(path).unwrap();
	let mut encoder = Encoder::new(file).unwrap();
	for (name, body) in entries {
		encoder
			.add_file(name.as_bytes(), body.len() as u32, body.as_bytes())
			.unwrap()
			.unwrap();
	}
	encoder.finalise().unwrap();
}

/// Read every (name, body) entry of an archive.
pub fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
	let file = File::open(path).unwrap();
	let mut decoder = Decoder::new(BufReader::new(file)).unwrap();
	let mut entries = Vec::new();
	while let Some(header) = decoder.next_entry().unwrap() {
		let mut body = Vec::new();
		decoder.copy_body(&mut body).unwrap().unwrap();
		assert_eq!(body.len(), header.size as usize);
		entries.push((String::from_utf8(header.name().to_vec()).unwrap(), body));
	}
	entries
}

/// Names only.
pub fn names(path: &Path) -> Vec<String> {
	read_archive(path).into_iter().map(|(name, _)| name).collect()
}

/// Write a file on disk, creating parents, and return a candidate for it with a short name.
pub fn file_candidate(root: &Path, name: &str, body: &[u8]) -> Candidate {
	let path = root.join(name);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(&path, body).unwrap();
	Candidate {
		name: name.as_bytes().to_vec(),
		path,
		kind: CandidateKind::File,
	}
}

/// Create a directory on disk and return a candidate for it with a short name.
pub fn dir_candidate(root: &Path, name: &str) -> Candidate {
	let path = root.join(name);
	fs::create_dir_all(&path).unwrap();
	Candidate {
		name: format!("{}/", name.trim_end_matches('/')).into_bytes(),
		path,
		kind: CandidateKind::Directory,
	}
}

/// Everything in a directory, sorted.
pub fn listing(dir: &Path) -> Vec<PathBuf> {
	let mut entries: Vec<PathBuf> = fs::read_dir(dir)
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.collect();
	entries.sort();
	entries
}
