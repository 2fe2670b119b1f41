//! Price readout under the crosshair.

use crate::point::AnyPoint;

/// Series preferred for the crosshair readout.
pub const PRIMARY_SERIES: &str = "ohlc";

/// The series chosen for the readout and its price at the crosshair, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairPrice<'a> {
    pub series: &'a str,
    pub price: Option<f64>,
}

/// Pick the readout price from the points under the crosshair.
///
/// `entries` lists every mounted series in order with its point at the
/// crosshair time. [`PRIMARY_SERIES`] wins when mounted, otherwise the
/// first entry. Returns `None` only when no series is mounted.
pub fn crosshair_price<'a, I>(entries: I) -> Option<CrosshairPrice<'a>>
where
    I: IntoIterator<Item = (&'a str, Option<&'a AnyPoint>)>,
{
    let mut first = None;
    for (series, point) in entries {
        if series == PRIMARY_SERIES {
            first = Some((series, point));
            break;
        }
        first.get_or_insert((series, point));
    }

    let Some((series, point)) = first else {
        tracing::warn!(target: "paneboard.series", "no series mounted for crosshair price");
        return None;
    };
    let price = point.and_then(AnyPoint::price);
    tracing::trace!(target: "paneboard.series", series, ?price, "crosshair price");
    Some(CrosshairPrice { series, price })
}
