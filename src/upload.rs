// Chunking arithmetic for range-addressed uploads, kept separate from the
// network path so the counts and spans are testable on their own.

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Span {
	pub start: u64,
	pub end: u64,
}

impl Span {
	pub fn len(&self) -> u64 {
		self.end - self.start
	}
}

#[derive(Debug, PartialEq)]
pub struct ChunkPlan {
	pub file_size: u64,
	pub chunk_size: u64,
	pub num_chunks: usize,
}

impl ChunkPlan {
	pub fn new(file_size: u64, chunk_size: u64) -> Self {
		let num_chunks = ((file_size + chunk_size - 1) / chunk_size) as usize;

		Self {
			file_size,
			chunk_size,
			num_chunks,
		}
	}

	// ascending, contiguous, non-overlapping; the union covers [0, file_size)
	pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
		(0..self.num_chunks).map(move |i| {
			let start = i as u64 * self.chunk_size;
			let end = (start + self.chunk_size).min(self.file_size);

			Span { start, end }
		})
	}
}

// Weights one file's own progress into the whole batch: file i of n at p%
// lands in the [i/n, (i+1)/n) slice of the overall [0, 100] range.
pub fn batch_progress(file_index: usize, file_count: usize, file_progress: f64) -> f64 {
	let count = file_count as f64;

	(file_index as f64 / count + file_progress / 100.0 / count) * 100.0
}

#[cfg(test)]
mod tests {
	use super::{batch_progress, ChunkPlan};

	const MIB: u64 = 1024 * 1024;

	#[test]
	fn test_plan_small_file() {
		let plan = ChunkPlan::new(4 * MIB, 10 * MIB);

		assert_eq!(plan.num_chunks, 1);
	}

	#[test]
	fn test_plan_zero_size() {
		let plan = ChunkPlan::new(0, 10 * MIB);

		assert_eq!(plan.num_chunks, 0);
		assert_eq!(plan.spans().count(), 0);
	}

	#[test]
	fn test_plan_exact_multiple() {
		let plan = ChunkPlan::new(20 * MIB, 10 * MIB);

		assert_eq!(plan.num_chunks, 2);
	}

	#[test]
	fn test_plan_25_mib_file() {
		let plan = ChunkPlan::new(25 * MIB, 10 * MIB);
		let spans: Vec<_> = plan.spans().collect();

		assert_eq!(plan.num_chunks, 3);
		assert_eq!(spans[0].start, 0);
		assert_eq!(spans[0].end, 10485760);
		assert_eq!(spans[1].start, 10485760);
		assert_eq!(spans[1].end, 20971520);
		assert_eq!(spans[2].start, 20971520);
		assert_eq!(spans[2].end, 26214400);
		assert_eq!(spans[2].len(), 5 * MIB);
	}

	#[test]
	fn test_spans_cover_file() {
		let plan = ChunkPlan::new(3 * MIB + 17, MIB);
		let spans: Vec<_> = plan.spans().collect();

		assert_eq!(spans.first().unwrap().start, 0);
		assert_eq!(spans.last().unwrap().end, 3 * MIB + 17);

		for pair in spans.windows(2) {
			assert_eq!(pair[0].end, pair[1].start);
		}

		let total: u64 = spans.iter().map(|s| s.len()).sum();
		assert_eq!(total, 3 * MIB + 17);
	}

	#[test]
	fn test_batch_progress_single_file() {
		assert_eq!(batch_progress(0, 1, 0.0), 0.0);
		assert_eq!(batch_progress(0, 1, 50.0), 50.0);
		assert_eq!(batch_progress(0, 1, 100.0), 100.0);
	}

	#[test]
	fn test_batch_progress_weighting() {
		// second of four files half done: 25% + 12.5%
		assert_eq!(batch_progress(1, 4, 50.0), 37.5);
		// only the very last chunk of the very last file reaches 100
		assert_eq!(batch_progress(3, 4, 100.0), 100.0);
		assert!(batch_progress(3, 4, 99.0) < 100.0);
	}

	#[test]
	fn test_batch_progress_monotonic() {
		let mut last = -1.0f64;

		for file in 0..3 {
			for chunk in 1..=4 {
				let overall = batch_progress(file, 3, chunk as f64 / 4.0 * 100.0);

				assert!(overall >= last);
				last = overall;
			}
		}

		assert_eq!(last, 100.0);
	}
}
