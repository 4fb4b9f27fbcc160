/// Monotonic stacking counter shared by every window in a registry.
///
/// Each call to [`ZOrder::next`] hands out a value strictly greater than
/// every value handed out before, so assigning it on focus yields a total
/// order by recency. The counter never goes backwards, even when a
/// registry is replaced wholesale, except through [`ZOrder::rebase`] after
/// the owner has renumbered its windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZOrder {
    counter: i32,
}

impl ZOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest value handed out (or observed) so far.
    pub fn current(&self) -> i32 {
        self.counter
    }

    /// The next value, or `None` once `i32::MAX` has been handed out.
    pub fn next(&mut self) -> Option<i32> {
        self.counter = self.counter.checked_add(1)?;
        Some(self.counter)
    }

    pub fn rebase(&mut self, top: i32) {
        self.counter = top;
    }

    /// Make sure future values sort above an externally supplied index,
    /// e.g. one read back from storage.
    pub fn observe(&mut self, z_index: i32) {
        if z_index > self.counter {
            self.counter = z_index;
        }
    }
}
