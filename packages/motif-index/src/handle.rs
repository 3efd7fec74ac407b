use std::sync::{
	Arc, RwLock,
	atomic::{AtomicU64, Ordering},
};

use crate::{Error, PatternIndex, Result};

/// Shared slot holding the live index snapshot.
///
/// Readers clone the `Arc` and keep serving from it even if a newer snapshot is installed
/// mid-query. The lock is held only for the pointer swap.
#[derive(Debug, Default)]
pub struct IndexHandle {
	current: RwLock<Option<Arc<PatternIndex>>>,
	versions: AtomicU64,
}
impl IndexHandle {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reserves a version number for a snapshot about to be built.
	pub fn next_version(&self) -> u64 {
		self.versions.fetch_add(1, Ordering::SeqCst) + 1
	}

	pub fn snapshot(&self) -> Option<Arc<PatternIndex>> {
		self.current.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn is_ready(&self) -> bool {
		self.snapshot().is_some()
	}

	/// Publishes `index`, returning the snapshot it replaced.
	///
	/// A snapshot older than the live one is refused so that overlapping rebuilds cannot roll
	/// the index back.
	pub fn install(&self, index: PatternIndex) -> Result<Option<Arc<PatternIndex>>> {
		let mut current = self.current.write().unwrap_or_else(|err| err.into_inner());

		if let Some(live) = current.as_ref()
			&& live.version() > index.version()
		{
			return Err(Error::StaleSnapshot {
				version: index.version(),
				live_version: live.version(),
			});
		}

		let version = index.version();
		let previous = current.replace(Arc::new(index));

		tracing::info!(
			version,
			previous_version = previous.as_ref().map(|index| index.version()),
			"Pattern index snapshot installed."
		);

		Ok(previous)
	}
}
