//! Visible-range math for virtualized lists.

/// An inclusive index range of near-visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    /// First index to keep materialized.
    pub start: usize,
    /// Last index to keep materialized (inclusive).
    pub end: usize,
}

impl VisibleRange {
    /// Create a range. `start` must not exceed `end`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of indices covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// An inclusive range is never empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` falls inside the range.
    #[inline]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// Iterate the covered indices.
    #[inline]
    pub const fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Compute the index window a scroll position exposes.
///
/// ```text
/// start = max(0, floor(scroll_offset / item_height) - buffer)
/// end   = min(item_count - 1, ceil((scroll_offset + viewport_height) / item_height) + buffer)
/// ```
///
/// Returns `None` for an empty list or a degenerate item height. For every
/// other input — including negative (overscrolled) offsets and offsets past
/// the end of the content — the result satisfies
/// `0 <= start <= end <= item_count - 1`.
pub fn compute_visible_range(
    scroll_offset: f32,
    viewport_height: f32,
    item_height: f32,
    item_count: usize,
    buffer: usize,
) -> Option<VisibleRange> {
    if item_count == 0 || !item_height.is_finite() || item_height <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let first = (scroll_offset / item_height).floor() as i64;
    #[allow(clippy::cast_possible_truncation)]
    let last = ((scroll_offset + viewport_height.max(0.0)) / item_height).ceil() as i64;

    let buffer = i64::try_from(buffer).unwrap_or(i64::MAX);
    let max_index = i64::try_from(item_count - 1).unwrap_or(i64::MAX);

    let start = first.saturating_sub(buffer).clamp(0, max_index);
    let end = last.saturating_add(buffer).clamp(start, max_index);

    #[allow(clippy::cast_sign_loss)]
    Some(VisibleRange::new(start as usize, end as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        // 10 items at 300px, 900px viewport, scrolled to 600, buffer 2:
        // start = max(0, floor(600/300) - 2) = 0
        // end   = min(9, ceil(1500/300) + 2) = 7
        let range = compute_visible_range(600.0, 900.0, 300.0, 10, 2).unwrap();
        assert_eq!(range, VisibleRange::new(0, 7));
    }

    #[test]
    fn test_top_of_list() {
        let range = compute_visible_range(0.0, 900.0, 300.0, 100, 2).unwrap();
        assert_eq!(range.start, 0);
        // ceil(900/300) + 2 = 5
        assert_eq!(range.end, 5);
    }

    #[test]
    fn test_invariant_holds_across_offsets() {
        let item_count = 37;
        let item_height = 240.0;
        let max_scroll = item_height * item_count as f32;
        let mut offset = -500.0f32;
        while offset < max_scroll + 500.0 {
            let range = compute_visible_range(offset, 720.0, item_height, item_count, 3).unwrap();
            assert!(range.start <= range.end, "start > end at offset {offset}");
            assert!(range.end < item_count, "end out of bounds at offset {offset}");
            offset += 17.0;
        }
    }

    #[test]
    fn test_overscroll_clamps() {
        // Negative offsets (rubber-banding) clamp to the top.
        let range = compute_visible_range(-800.0, 900.0, 300.0, 10, 2).unwrap();
        assert_eq!(range.start, 0);

        // Offsets past the content clamp to the last item.
        let range = compute_visible_range(1.0e7, 900.0, 300.0, 10, 2).unwrap();
        assert_eq!(range, VisibleRange::new(9, 9));
    }

    #[test]
    fn test_degenerate_inputs_yield_no_range() {
        assert_eq!(compute_visible_range(0.0, 900.0, 300.0, 0, 2), None);
        assert_eq!(compute_visible_range(0.0, 900.0, 0.0, 10, 2), None);
        assert_eq!(compute_visible_range(0.0, 900.0, -5.0, 10, 2), None);
        assert_eq!(compute_visible_range(0.0, 900.0, f32::NAN, 10, 2), None);
    }

    #[test]
    fn test_buffer_widens_both_sides() {
        let tight = compute_visible_range(3000.0, 600.0, 300.0, 100, 0).unwrap();
        let buffered = compute_visible_range(3000.0, 600.0, 300.0, 100, 4).unwrap();
        assert_eq!(buffered.start, tight.start - 4);
        assert_eq!(buffered.end, tight.end + 4);
    }

    #[test]
    fn test_range_helpers() {
        let range = VisibleRange::new(3, 7);
        assert_eq!(range.len(), 5);
        assert!(range.contains(3));
        assert!(range.contains(7));
        assert!(!range.contains(8));
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
    }
}
