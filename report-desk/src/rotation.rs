//! Rotation through the unread reports.
//!
//! The cursor is an index into the report collection, `-1` meaning "no
//! report selected". Rotation only ever lands on unread reports and
//! wraps around the collection; when everything is read the cursor
//! parks at the sentinel again.

use trafik_feed::TrafficReport;

/// Sentinel for "no report selected".
pub const NO_POSITION: i64 = -1;

#[derive(Debug, Clone, Copy)]
pub struct RotationCursor {
    pos: i64,
}

impl RotationCursor {
    pub fn new() -> Self {
        Self { pos: NO_POSITION }
    }

    pub fn position(&self) -> i64 {
        self.pos
    }

    /// Index into the collection, when a report is selected.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.pos).ok()
    }

    /// Drops the selection when the collection shrank under it.
    pub fn clamp(&mut self, len: usize) {
        if self.pos >= len as i64 {
            self.pos = NO_POSITION;
        }
    }

    /// Advances to the next unread report at or after `start_pos`,
    /// wrapping around. Parks at the sentinel when nothing is unread.
    pub fn advance(&mut self, reports: &[TrafficReport], start_pos: usize) {
        self.pos = next_unread(reports, self.pos, start_pos);
    }

    /// Steps back to the previous unread report, wrapping around.
    pub fn retreat(&mut self, reports: &[TrafficReport], start_pos: usize) {
        self.pos = prev_unread(reports, self.pos, start_pos);
    }
}

impl Default for RotationCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the next unread report after `pos`, scanning forward from
/// `start_pos` when no report is selected and wrapping back to
/// `start_pos` past the end. [`NO_POSITION`] when nothing qualifies.
pub fn next_unread(reports: &[TrafficReport], pos: i64, start_pos: usize) -> i64 {
    let len = reports.len();
    if len == 0 || start_pos >= len {
        return NO_POSITION;
    }

    let mut candidate = if pos < start_pos as i64 {
        start_pos
    } else {
        pos as usize + 1
    };
    for _ in 0..len {
        if candidate >= len {
            candidate = start_pos;
        }
        if !reports[candidate].read {
            return candidate as i64;
        }
        candidate += 1;
    }
    NO_POSITION
}

/// Index of the previous unread report before `pos`, wrapping to the
/// end of the collection. [`NO_POSITION`] when nothing qualifies.
pub fn prev_unread(reports: &[TrafficReport], pos: i64, start_pos: usize) -> i64 {
    let len = reports.len();
    if len == 0 || start_pos >= len {
        return NO_POSITION;
    }

    let mut candidate = if pos <= start_pos as i64 {
        len as i64 - 1
    } else {
        pos - 1
    };
    for _ in 0..len {
        if candidate < start_pos as i64 {
            candidate = len as i64 - 1;
        }
        if !reports[candidate as usize].read {
            return candidate;
        }
        candidate -= 1;
    }
    NO_POSITION
}
