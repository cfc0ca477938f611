//! Navigation history log and the repeat-suppression rule.

/// Ordered log of paths seen by one router instance.
///
/// Appended to on every cycle, whether or not the path matched anything,
/// so its length always equals the number of cycles the router has
/// observed.
#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
	entries: Vec<String>,
}

impl HistoryLog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a path at the end of the log.
	pub(crate) fn append(&mut self, path: impl Into<String>) {
		self.entries.push(path.into());
	}

	/// The most recent entry.
	pub fn last(&self) -> Option<&str> {
		self.entries.last().map(String::as_str)
	}

	/// The entry before the most recent one.
	pub fn previous(&self) -> Option<&str> {
		self.entries
			.len()
			.checked_sub(2)
			.map(|i| self.entries[i].as_str())
	}

	/// All recorded entries, oldest first.
	pub fn entries(&self) -> &[String] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Whether handler execution should be suppressed for this cycle.
///
/// Suppression fires only for an entry hosting a nested router, and only
/// when the incoming path is string-identical to the last logged one. The
/// nested router owns re-renders inside its region; the parent must not
/// re-run its own handlers for a repeat it already handled. Prefix
/// relationships never suppress, only exact repeats do.
pub(crate) fn should_suppress(has_children: bool, log: &HistoryLog, path: &str) -> bool {
	has_children && log.last() == Some(path)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn log_tracks_last_and_previous() {
		let mut log = HistoryLog::new();
		assert!(log.last().is_none());
		assert!(log.previous().is_none());

		log.append("/a");
		assert_eq!(log.last(), Some("/a"));
		assert!(log.previous().is_none());

		log.append("/b");
		assert_eq!(log.last(), Some("/b"));
		assert_eq!(log.previous(), Some("/a"));
		assert_eq!(log.len(), 2);
	}

	#[rstest]
	#[case(true, Some("/admin/users"), "/admin/users", true)]
	#[case(false, Some("/admin/users"), "/admin/users", false)]
	#[case(true, Some("/admin"), "/admin/users", false)]
	#[case(true, None, "/admin/users", false)]
	fn suppression_requires_children_and_exact_repeat(
		#[case] has_children: bool,
		#[case] last: Option<&str>,
		#[case] path: &str,
		#[case] expected: bool,
	) {
		let mut log = HistoryLog::new();
		if let Some(last) = last {
			log.append(last);
		}
		assert_eq!(should_suppress(has_children, &log, path), expected);
	}
}
