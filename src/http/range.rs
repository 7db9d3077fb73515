//! HTTP Range request parsing module
//!
//! Single-range `bytes=` parsing per RFC 7233, used for resumable asset
//! downloads (audio seeks, large data packs).

/// Inclusive byte range within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes the range covers
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Outcome of evaluating a request's Range header against a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header; send the whole file
    Full,
    /// Valid single range; send 206 with this slice
    Partial(ByteRange),
    /// Range cannot be satisfied; send 416
    Unsatisfiable,
}

/// Evaluate a Range header against the file size
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
/// Multi-range requests and malformed headers are ignored (full response),
/// matching how lenient servers treat them.
pub fn resolve_range(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(header) = range_header else {
        return RangeOutcome::Full;
    };

    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeOutcome::Full; // Not a bytes unit, ignore
    };

    // Only single ranges are supported
    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Nothing in an empty file is addressable
    if file_size == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    if start_str.is_empty() {
        return resolve_suffix(end_str, file_size);
    }

    resolve_bounded(start_str, end_str, file_size)
}

/// `bytes=-N`: the last N bytes of the file
fn resolve_suffix(suffix_str: &str, file_size: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };

    if suffix == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    // A suffix longer than the file covers the whole file
    RangeOutcome::Partial(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: file_size - 1,
    })
}

/// `bytes=start-` or `bytes=start-end`
fn resolve_bounded(start_str: &str, end_str: &str, file_size: usize) -> RangeOutcome {
    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };

    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        file_size - 1
    } else {
        let Ok(end) = end_str.parse::<usize>() else {
            return RangeOutcome::Full;
        };
        if start > end {
            return RangeOutcome::Unsatisfiable;
        }
        end.min(file_size - 1)
    };

    RangeOutcome::Partial(ByteRange { start, end })
}
