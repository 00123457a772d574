//! Unified region index space.
//!
//! The rendering widget sees one linear sequence of slots; the adapter backs
//! it with four logical regions laid out contiguously in fixed order:
//! header, body (or its substitute), footer. The body region is normally the
//! body list's rows, but exactly one of three things occupies it at any
//! time, chosen by [`BodyMode`]:
//!
//! - `Normal`: the body rows themselves
//! - `Empty`: a single empty-state placeholder row (body list is empty)
//! - `LoadMore`: the body rows plus one trailing load-more row
//!
//! [`RegionMap`] is a pure snapshot of the three counts and the active mode;
//! it holds no mutable state and every translation is plain boundary
//! arithmetic.

/// Which of the mutually-exclusive occupants holds the body region.
///
/// Modelling this as one enum (rather than independent boolean flags) makes
/// the invalid "empty and load-more at once" state unrepresentable; the
/// single place that derives the mode is the adapter's configuration, which
/// rejects conflicting substitutes at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// The body list's rows occupy the body region.
    #[default]
    Normal,
    /// The body list is empty and a single placeholder row stands in for it.
    Empty,
    /// The body rows are followed by a single trailing load-more row.
    LoadMore,
}

/// Classification of a unified position into a region-local slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSlot {
    /// Row `i` of the header list.
    Header(usize),
    /// Row `i` of the body list.
    Body(usize),
    /// The single empty-state placeholder row.
    EmptyPlaceholder,
    /// The single trailing load-more row.
    LoadMoreRow,
    /// Row `i` of the footer list.
    Footer(usize),
}

/// A pure snapshot of the unified index space.
///
/// Derived from the three list counts and the active body mode; never stored
/// long-term. Recompute after any structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionMap {
    header: usize,
    body: usize,
    footer: usize,
    mode: BodyMode,
}

impl RegionMap {
    /// Builds a snapshot from the current counts and mode.
    ///
    /// `Empty` mode requires a zero body count; the adapter derives the mode
    /// from the same counts so the mismatch indicates a caller bug.
    pub fn new(header: usize, body: usize, footer: usize, mode: BodyMode) -> Self {
        debug_assert!(
            mode != BodyMode::Empty || body == 0,
            "empty mode with {body} body rows"
        );
        Self {
            header,
            body,
            footer,
            mode,
        }
    }

    /// The active body mode.
    pub fn mode(&self) -> BodyMode {
        self.mode
    }

    /// The number of header rows.
    pub fn header_count(&self) -> usize {
        self.header
    }

    /// The number of body list rows (excluding any substitute row).
    pub fn body_count(&self) -> usize {
        self.body
    }

    /// The number of footer rows.
    pub fn footer_count(&self) -> usize {
        self.footer
    }

    /// The width of the body region in the unified space.
    pub fn body_width(&self) -> usize {
        match self.mode {
            BodyMode::Normal => self.body,
            BodyMode::Empty => 1,
            BodyMode::LoadMore => self.body + 1,
        }
    }

    /// The total number of unified slots.
    pub fn total(&self) -> usize {
        self.header + self.body_width() + self.footer
    }

    /// The unified position of the first body-region slot.
    pub fn body_base(&self) -> usize {
        self.header
    }

    /// The unified position of the first footer slot.
    pub fn footer_base(&self) -> usize {
        self.header + self.body_width()
    }

    /// Classifies a unified position into its region-local slot.
    ///
    /// Returns `None` for positions at or beyond [`total`](Self::total).
    pub fn classify(&self, position: usize) -> Option<RegionSlot> {
        if position < self.header {
            return Some(RegionSlot::Header(position));
        }
        let body_local = position - self.header;
        let body_width = self.body_width();
        if body_local < body_width {
            return Some(match self.mode {
                BodyMode::Normal => RegionSlot::Body(body_local),
                BodyMode::Empty => RegionSlot::EmptyPlaceholder,
                BodyMode::LoadMore if body_local == self.body => RegionSlot::LoadMoreRow,
                BodyMode::LoadMore => RegionSlot::Body(body_local),
            });
        }
        let footer_local = body_local - body_width;
        if footer_local < self.footer {
            return Some(RegionSlot::Footer(footer_local));
        }
        None
    }

    /// The unified position of a region-local slot, the inverse of
    /// [`classify`](Self::classify).
    ///
    /// Returns `None` when the slot does not exist under the current counts
    /// and mode.
    pub fn position_of(&self, slot: RegionSlot) -> Option<usize> {
        match slot {
            RegionSlot::Header(i) => (i < self.header).then_some(i),
            RegionSlot::Body(i) => match self.mode {
                BodyMode::Empty => None,
                _ => (i < self.body).then(|| self.body_base() + i),
            },
            RegionSlot::EmptyPlaceholder => {
                (self.mode == BodyMode::Empty).then(|| self.body_base())
            }
            RegionSlot::LoadMoreRow => {
                (self.mode == BodyMode::LoadMore).then(|| self.body_base() + self.body)
            }
            RegionSlot::Footer(i) => (i < self.footer).then(|| self.footer_base() + i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_layout() {
        let map = RegionMap::new(2, 3, 1, BodyMode::Normal);
        assert_eq!(map.total(), 6);
        assert_eq!(map.body_base(), 2);
        assert_eq!(map.footer_base(), 5);

        assert_eq!(map.classify(0), Some(RegionSlot::Header(0)));
        assert_eq!(map.classify(1), Some(RegionSlot::Header(1)));
        assert_eq!(map.classify(2), Some(RegionSlot::Body(0)));
        assert_eq!(map.classify(4), Some(RegionSlot::Body(2)));
        assert_eq!(map.classify(5), Some(RegionSlot::Footer(0)));
        assert_eq!(map.classify(6), None);
    }

    #[test]
    fn test_empty_mode_single_placeholder() {
        let map = RegionMap::new(2, 0, 1, BodyMode::Empty);
        assert_eq!(map.total(), 4);
        assert_eq!(map.classify(2), Some(RegionSlot::EmptyPlaceholder));
        assert_eq!(map.classify(3), Some(RegionSlot::Footer(0)));
        assert_eq!(map.position_of(RegionSlot::EmptyPlaceholder), Some(2));
        assert_eq!(map.position_of(RegionSlot::Body(0)), None);
    }

    #[test]
    fn test_load_more_trailing_row() {
        let map = RegionMap::new(1, 3, 2, BodyMode::LoadMore);
        assert_eq!(map.total(), 1 + 3 + 1 + 2);
        assert_eq!(map.classify(3), Some(RegionSlot::Body(2)));
        assert_eq!(map.classify(4), Some(RegionSlot::LoadMoreRow));
        assert_eq!(map.classify(5), Some(RegionSlot::Footer(0)));
        assert_eq!(map.position_of(RegionSlot::LoadMoreRow), Some(4));
        assert_eq!(map.footer_base(), 5);
    }

    #[test]
    fn test_degenerate_counts() {
        let map = RegionMap::new(0, 0, 0, BodyMode::Normal);
        assert_eq!(map.total(), 0);
        assert_eq!(map.classify(0), None);

        let only_placeholder = RegionMap::new(0, 0, 0, BodyMode::Empty);
        assert_eq!(only_placeholder.total(), 1);
        assert_eq!(
            only_placeholder.classify(0),
            Some(RegionSlot::EmptyPlaceholder)
        );
    }

    #[test]
    fn test_classify_position_round_trip() {
        let maps = [
            RegionMap::new(2, 3, 2, BodyMode::Normal),
            RegionMap::new(1, 4, 0, BodyMode::LoadMore),
            RegionMap::new(3, 0, 1, BodyMode::Empty),
        ];
        for map in maps {
            for position in 0..map.total() {
                let slot = map.classify(position).unwrap();
                assert_eq!(map.position_of(slot), Some(position), "{map:?} @ {position}");
            }
        }
    }
}
