//! Boundary to whatever produces series buffers.

use crate::data::SeriesData;
use crate::series::SeriesSet;

/// Producer of series buffers for a chart panel.
///
/// `series` is the panel's current configuration, so a source can read
/// periods, bar counts and sibling buffers (an indicator derives from the
/// `ohlc` buffer). Returning `None` leaves the stored buffer untouched.
pub trait SeriesSource {
    /// A complete buffer for `name`.
    fn full(&mut self, name: &str, series: &SeriesSet) -> Option<SeriesData>;

    /// The stored buffer of `name` with its forming last point advanced.
    ///
    /// Defaults to [`full`](Self::full).
    fn tick(&mut self, name: &str, series: &SeriesSet) -> Option<SeriesData> {
        self.full(name, series)
    }
}
