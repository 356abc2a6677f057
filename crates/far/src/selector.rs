//! Matching stored entry names against user-supplied selectors.
//!
//! A selector matches an entry either exactly, or as a directory: the selector with a single
//! trailing separator is a prefix of the entry name. Exact matches take precedence over prefix
//! matches; within each kind, the first selector in the list wins.
//!
//! The [`Matcher`] also remembers which selectors were used at least once during a pass, so the
//! ones that never matched can be reported afterwards.

use tracing::trace;

use crate::{
	name::{display, ensure_single_trailing_separator},
	report::Notice,
};

/// How an entry name relates to a list of selectors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Match {
	/// The name equals the selector at this index.
	Exact(usize),

	/// The name is under the directory named by the selector at this index.
	Prefix(usize),
}

impl Match {
	/// Index of the selector that matched.
	pub fn index(self) -> usize {
		match self {
			Self::Exact(i) | Self::Prefix(i) => i,
		}
	}
}

/// A selector, in raw and directory forms.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selector {
	raw: Vec<u8>,
	directory: Vec<u8>,
}

impl Selector {
	/// Build a selector from its raw bytes.
	pub fn new(raw: impl Into<Vec<u8>>) -> Self {
		let raw = raw.into();
		let directory = ensure_single_trailing_separator(&raw);
		Self { raw, directory }
	}

	/// The selector as given.
	pub fn raw(&self) -> &[u8] {
		&self.raw
	}
}

/// Ordered selectors plus the record of which were used.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
	selectors: Vec<Selector>,

	/// Indices of used selectors, in order of first use.
	used: Vec<usize>,
	seen: Vec<bool>,
}

impl Matcher {
	/// Create a matcher over these selectors.
	///
	/// Duplicate selectors are kept: each is its own slot for the purpose of reporting unused ones.
	pub fn new<S: Into<Vec<u8>>>(selectors: impl IntoIterator<Item = S>) -> Self {
		let selectors: Vec<Selector> = selectors.into_iter().map(Selector::new).collect();
		let seen = vec![false; selectors.len()];
		Self {
			selectors,
			used: Vec::new(),
			seen,
		}
	}

	/// Whether there are no selectors at all.
	pub fn is_empty(&self) -> bool {
		self.selectors.is_empty()
	}

	/// Classify a name without recording anything.
	pub fn classify(&self, name: &[u8]) -> Option<Match> {
		if let Some(i) = self.selectors.iter().position(|sel| sel.raw == name) {
			return Some(Match::Exact(i));
		}

		self.selectors
			.iter()
			.position(|sel| name.starts_with(&sel.directory))
			.map(Match::Prefix)
	}

	/// Classify a name, and record the selector that matched as used.
	pub fn resolve(&mut self, name: &[u8]) -> Option<Match> {
		let found = self.classify(name);
		if let Some(found) = found {
			trace!(name=%crate::name::display(name), ?found, "selector matched");
			let i = found.index();
			if !self.seen[i] {
				self.seen[i] = true;
				self.used.push(i);
			}
		}
		found
	}

	/// Indices of the selectors used so far, in order of first use.
	pub fn used(&self) -> &[usize] {
		&self.used
	}

	/// Selectors that were never used, in their original order.
	pub fn unused(&self) -> Vec<&Selector> {
		let mut used = self.used.clone();
		used.sort_unstable();

		let mut unused = Vec::new();
		let mut next = 0;
		for &i in used.iter().chain(std::iter::once(&self.selectors.len())) {
			unused.extend(&self.selectors[next..i]);
			next = i + 1;
		}
		unused
	}

	/// A "cannot find file" notice for each selector never used.
	pub fn unused_notices(&self) -> impl Iterator<Item = Notice> + '_ {
		self.unused().into_iter().map(|sel| Notice::NotFound {
			selector: display(sel.raw()).into_owned(),
		})
	}
}
