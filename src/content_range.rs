use std::fmt;
use std::str::FromStr;

// `Content-Range: bytes <start>-<end>/<size>` with an inclusive end offset;
// the chunk endpoint takes one of these per uploaded range.
#[derive(Debug, PartialEq)]
pub struct ContentRange {
	pub range_start: u64,
	pub range_end: u64,
	pub size: Option<u64>,
}

impl ContentRange {
	// `start..end` is half-open; the header wants an inclusive last byte
	pub fn for_span(start: u64, end: u64, size: u64) -> Self {
		Self {
			range_start: start,
			range_end: end.saturating_sub(1),
			size: Some(size),
		}
	}
}

impl fmt::Display for ContentRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.size {
			Some(size) => write!(f, "bytes {}-{}/{}", self.range_start, self.range_end, size),
			None => write!(f, "bytes {}-{}/*", self.range_start, self.range_end),
		}
	}
}

impl FromStr for ContentRange {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split_whitespace().collect();
		if parts.len() != 2 || parts[0] != "bytes" {
			return Err(());
		}

		let ranges: Vec<&str> = parts[1].split('/').collect();
		if ranges.len() != 2 {
			return Err(());
		}

		let size = if ranges[1] == "*" {
			None
		} else {
			Some(ranges[1].parse().map_err(|_| ())?)
		};

		let range_parts: Vec<&str> = ranges[0].split('-').collect();
		if range_parts.len() != 2 {
			return Err(());
		}

		let range_start = range_parts[0].parse().map_err(|_| ())?;
		let range_end = range_parts[1].parse().map_err(|_| ())?;

		Ok(ContentRange {
			range_start,
			range_end,
			size,
		})
	}
}
