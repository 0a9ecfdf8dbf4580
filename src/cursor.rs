//! The flow cursor and page-break policy.
//!
//! A [FlowCursor] is the write position of a composition: the index of the
//! page being filled and the distance from the top of that page at which the
//! next element goes. It is an ordinary value passed to every placement call;
//! pages themselves live in the [Composition].
//!
//! Breaks come in three flavours. [FlowCursor::reserve] breaks when the next
//! atomic write does not fit. [FlowCursor::force_page_break] is the hard
//! break taken at every section start. [FlowCursor::soft_break] breaks only
//! when less than a threshold of space remains. Hard and soft breaks are
//! lazy: they mark the current page as finished and the next reservation
//! opens the new page, so a section without content never produces a page and
//! a break at the very end of a document never leaves a blank page behind.

use crate::composition::Composition;
use crate::config::LayoutConfig;
use crate::units::Pt;

/// Rounding slack when comparing accumulated heights against the page bottom
const EPSILON: f32 = 1e-3;

/// Why a page was opened
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BreakReason {
    FirstPage,
    /// A forced break, i.e. a section start
    Hard,
    /// Not enough room was left for a soft break's threshold
    Soft,
    /// The next write did not fit on the current page
    Full,
}

/// Where a reserved block of vertical space begins
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PagePosition {
    pub page_index: usize,
    /// Distance from the top edge of the page
    pub y: Pt,
    /// Set when a new page was opened to satisfy the reservation
    pub opened: Option<BreakReason>,
    /// Set when the reservation is taller than the usable page height and was
    /// placed without breaking
    pub overflowed: bool,
}

#[derive(Debug, Clone)]
pub struct FlowCursor {
    page_index: Option<usize>,
    y: Pt,
    top: Pt,
    bottom: Pt,
    section: usize,
    pending: Option<BreakReason>,
}

impl FlowCursor {
    pub fn new(config: &LayoutConfig) -> FlowCursor {
        FlowCursor {
            page_index: None,
            y: config.content_top(),
            top: config.content_top(),
            bottom: config.content_bottom(),
            section: 0,
            pending: None,
        }
    }

    /// The page currently being filled, if any page has been opened yet
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }

    /// Current distance from the top edge of the page
    pub fn y(&self) -> Pt {
        self.y
    }

    pub fn usable_height(&self) -> Pt {
        self.bottom - self.top
    }

    /// Space left on the current page. A pending break or a missing page
    /// means the next write starts on a fresh page.
    pub fn remaining(&self) -> Pt {
        if self.page_index.is_none() || self.pending.is_some() {
            self.usable_height()
        } else {
            self.bottom - self.y
        }
    }

    /// `true` when the next write lands on a page that has nothing on it yet
    pub fn at_page_top(&self) -> bool {
        self.page_index.is_none() || self.pending.is_some() || self.y <= self.top
    }

    /// The page the next write will land on, assuming it fits
    pub fn next_page_index(&self, pages: &Composition) -> usize {
        match self.page_index {
            None => pages.page_count(),
            Some(index) if self.pending.is_some() && !pages.is_blank(index) => pages.page_count(),
            Some(index) => index,
        }
    }

    /// Start a new section: subsequent pages belong to it, and its first write
    /// goes on a fresh page
    pub fn begin_section(&mut self, section: usize) {
        self.section = section;
        self.force_page_break();
    }

    /// Unconditionally finish the current page. The next page is opened by
    /// the next reservation, and only if the current page holds anything.
    pub fn force_page_break(&mut self) {
        if self.page_index.is_some() {
            self.pending = Some(BreakReason::Hard);
        }
    }

    /// Finish the current page if less than `min_space` remains on it.
    /// Returns whether a break was taken.
    pub fn soft_break(&mut self, min_space: Pt) -> bool {
        if self.at_page_top() {
            return false;
        }
        if self.bottom - self.y + Pt(EPSILON) < min_space {
            log::debug!(
                "soft break on page {:?}: {} left, {} wanted",
                self.page_index,
                self.bottom - self.y,
                min_space
            );
            self.pending = Some(BreakReason::Soft);
            return true;
        }
        false
    }

    /// Reserve `height` points for the next atomic write, breaking to a new
    /// page first if it would cross the bottom of the content area
    pub fn reserve(&mut self, pages: &mut Composition, height: Pt) -> PagePosition {
        let height = height.max(Pt::ZERO);
        let mut opened = None;

        match (self.page_index, self.pending.take()) {
            (None, _) => opened = Some(self.open_page(pages, BreakReason::FirstPage)),
            (Some(index), Some(reason)) => {
                if pages.is_blank(index) {
                    // nothing was written since the last break: reuse the page
                    pages.reassign_section(index, self.section);
                    self.y = self.top;
                } else {
                    opened = Some(self.open_page(pages, reason));
                }
            }
            (Some(_), None) => {}
        }

        let overflowed = height.0 > self.usable_height().0 + EPSILON;
        if !overflowed && (self.y + height).0 > self.bottom.0 + EPSILON {
            opened = Some(self.open_page(pages, BreakReason::Full));
        }

        let page_index = self.current_page(pages);
        let position = PagePosition {
            page_index,
            y: self.y,
            opened,
            overflowed,
        };

        self.y = (self.y + height).min(self.bottom);
        position
    }

    /// Advance by `height` points of whitespace. Whitespace at the top of a
    /// page is dropped and whitespace at the bottom is cut at the content
    /// edge. Returns the distance actually advanced.
    pub fn skip(&mut self, height: Pt) -> Pt {
        if height.0 <= 0.0 || self.at_page_top() {
            return Pt::ZERO;
        }
        let available = self.bottom - self.y;
        let advanced = height.min(available);
        self.y += advanced;
        advanced
    }

    /// Make sure at least one page exists, e.g. for a document whose sections
    /// are all empty
    pub fn ensure_page(&mut self, pages: &mut Composition) -> usize {
        match self.page_index {
            Some(index) => index,
            None => {
                self.open_page(pages, BreakReason::FirstPage);
                self.current_page(pages)
            }
        }
    }

    fn open_page(&mut self, pages: &mut Composition, reason: BreakReason) -> BreakReason {
        let index = pages.open_page(self.section);
        log::debug!(
            "opened page {} for section {} ({:?})",
            index,
            self.section,
            reason
        );
        self.page_index = Some(index);
        self.y = self.top;
        self.pending = None;
        reason
    }

    fn current_page(&self, pages: &Composition) -> usize {
        self.page_index
            .unwrap_or_else(|| pages.page_count().saturating_sub(1))
    }
}
