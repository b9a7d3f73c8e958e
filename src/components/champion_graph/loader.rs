//! Progressive portrait loading queue.
//!
//! Node portraits are deferred past first paint and fetched in small
//! batches with a pause between them, so the initial render stays fast.
//! This module is the pure scheduling core: an ordered queue of node ids,
//! a set of ids already resolved (success or failure alike, so nothing is
//! ever retried automatically), and a single-flag re-entrancy guard. The
//! DOM driver that actually fetches images lives in the component.

use std::collections::{HashSet, VecDeque};

/// Where a node stands in the image-loading lifecycle.
///
/// Only nodes with an image reference carry a state; the transition out
/// of [`VisualState::Pending`] happens at most once per loader run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualState {
	/// Image reference present, not yet resolved.
	Pending,
	/// Image (or its fallback) decoded and applied.
	ImageLoaded,
	/// Image and fallback both failed; the placeholder shape stays.
	ImageFailed,
}

/// Tuning for the batch driver.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
	/// Master switch. Turning this off stops scheduling further batches;
	/// fetches already in flight complete and are applied.
	pub enabled: bool,
	/// How many portraits start loading per batch.
	pub batch_size: usize,
	/// Pause between batches, in milliseconds.
	pub delay_ms: u64,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			batch_size: 5,
			delay_ms: 5,
		}
	}
}

/// Ordered pending ids plus the set of ids already processed.
#[derive(Debug, Default)]
pub struct ImageLoadQueue {
	queue: VecDeque<String>,
	loaded: HashSet<String>,
	active: bool,
}

impl ImageLoadQueue {
	/// Queue every id whose image reference is set and which has not been
	/// processed before. Input order is preserved; ids already queued or
	/// already resolved are skipped.
	pub fn enqueue_all<'a>(&mut self, nodes: impl IntoIterator<Item = (&'a str, bool)>) {
		for (id, has_image) in nodes {
			if has_image && !self.loaded.contains(id) && !self.queue.iter().any(|q| q == id) {
				self.queue.push_back(id.to_string());
			}
		}
	}

	/// Remove and return up to `batch_size` ids from the front.
	pub fn take_batch(&mut self, batch_size: usize) -> Vec<String> {
		let n = batch_size.min(self.queue.len());
		self.queue.drain(..n).collect()
	}

	/// Record an id as processed, whatever the outcome. Processed ids are
	/// never fetched again.
	pub fn mark_loaded(&mut self, id: &str) {
		self.loaded.insert(id.to_string());
	}

	/// Whether an id has already been processed.
	pub fn is_loaded(&self, id: &str) -> bool {
		self.loaded.contains(id)
	}

	/// Ids still waiting in the queue.
	pub fn pending(&self) -> usize {
		self.queue.len()
	}

	/// Ids processed so far.
	pub fn loaded_count(&self) -> usize {
		self.loaded.len()
	}

	/// Drop everything still queued (used when the loader is toggled off).
	pub fn clear_pending(&mut self) {
		self.queue.clear();
	}

	/// Claim the single loading pass. Returns `false` if a pass is already
	/// running, in which case the caller must not start another.
	pub fn try_begin(&mut self) -> bool {
		if self.active {
			return false;
		}
		self.active = true;
		true
	}

	/// Whether a loading pass is currently running.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Release the pass claimed by [`ImageLoadQueue::try_begin`].
	pub fn finish(&mut self) {
		self.active = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(n: usize) -> Vec<String> {
		(0..n).map(|i| format!("node-{i}")).collect()
	}

	#[test]
	fn enqueue_skips_nodes_without_images() {
		let mut q = ImageLoadQueue::default();
		q.enqueue_all([("a", true), ("b", false), ("c", true)]);
		assert_eq!(q.pending(), 2);
		assert_eq!(q.take_batch(10), vec!["a".to_string(), "c".to_string()]);
	}

	#[test]
	fn queue_drains_to_empty_in_batches() {
		let all = ids(12);
		let mut q = ImageLoadQueue::default();
		q.enqueue_all(all.iter().map(|id| (id.as_str(), true)));

		let mut rounds = 0;
		while q.pending() > 0 {
			for id in q.take_batch(5) {
				q.mark_loaded(&id);
			}
			rounds += 1;
		}
		assert_eq!(rounds, 3);
		assert_eq!(q.loaded_count(), 12);
		assert_eq!(q.pending(), 0);
	}

	#[test]
	fn loaded_ids_are_never_reenqueued() {
		let mut q = ImageLoadQueue::default();
		q.enqueue_all([("a", true), ("b", true)]);
		for id in q.take_batch(2) {
			q.mark_loaded(&id);
		}
		q.enqueue_all([("a", true), ("b", true), ("c", true)]);
		assert_eq!(q.pending(), 1);
		assert!(q.is_loaded("a"));
		assert!(!q.is_loaded("c"));
	}

	#[test]
	fn duplicate_ids_queue_once() {
		let mut q = ImageLoadQueue::default();
		q.enqueue_all([("a", true), ("a", true)]);
		assert_eq!(q.pending(), 1);
	}

	#[test]
	fn failure_marks_processed_like_success() {
		let mut q = ImageLoadQueue::default();
		q.enqueue_all([("bad", true)]);
		let batch = q.take_batch(1);
		// The driver marks the id regardless of fetch outcome.
		q.mark_loaded(&batch[0]);
		assert!(q.is_loaded("bad"));
		q.enqueue_all([("bad", true)]);
		assert_eq!(q.pending(), 0);
	}

	#[test]
	fn drain_now_takes_everything_at_once() {
		let all = ids(12);
		let mut q = ImageLoadQueue::default();
		q.enqueue_all(all.iter().map(|id| (id.as_str(), true)));

		// "Load everything" passes the remaining length as the batch size.
		let batch = q.take_batch(q.pending());
		assert_eq!(batch.len(), 12);
		assert_eq!(q.pending(), 0);
	}

	#[test]
	fn only_one_pass_at_a_time() {
		let mut q = ImageLoadQueue::default();
		assert!(q.try_begin());
		assert!(!q.try_begin());
		assert!(q.is_active());
		q.finish();
		assert!(q.try_begin());
	}
}
