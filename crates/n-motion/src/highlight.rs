//! Target-character highlighting.
//!
//! At most one char marker is live process-wide, whatever mode or window
//! the motion came from. `armed` stands in for the finalizer hooks a fresh
//! prompt registers: while armed, moving the cursor away from the last
//! motion's landing cell or entering insert mode finalizes the marking.

use crate::host::{Host, MarkRegion, MarkerId};
use crate::pattern::SearchPattern;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Highlight {
    marker: Option<MarkerId>,
    armed: bool,
}

impl Highlight {
    /// Mark every landing cell of `pattern` on `line`. Callers
    /// [`clear`](Self::clear) first when a marker may be live.
    pub fn mark_targets<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        line: usize,
        pattern: &SearchPattern,
    ) {
        debug_assert!(self.marker.is_none(), "char marker already live");
        self.marker = Some(host.mark_region(MarkRegion::Targets { line, pattern }));
    }

    /// Remove the char marker, if any.
    pub fn clear<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.marker.take() {
            host.clear_marker(id);
        }
    }

    #[inline]
    pub const fn arm(&mut self) {
        self.armed = true;
    }

    #[inline]
    pub const fn disarm(&mut self) {
        self.armed = false;
    }

    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    #[inline]
    #[must_use]
    pub const fn marker(&self) -> Option<MarkerId> {
        self.marker
    }
}
