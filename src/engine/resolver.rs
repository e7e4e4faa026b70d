use crate::domain::indicator::DropIndicator;

/// Bias applied to each indicator's top edge before the hit-test. Shifting
/// the comparison line down by this much makes a drag feel anchored to the
/// next card's top edge instead of its vertical midpoint.
pub const DISTANCE_OFFSET: f64 = 50.0;

/// Maps a pointer's vertical coordinate to the indicator the dragged task
/// should be inserted before.
///
/// For each indicator the offset is `pointer_y - (top + DISTANCE_OFFSET)`.
/// Among indicators whose offset is negative (pointer above the biased
/// line), the one with the largest offset wins: the nearest indicator
/// strictly above the pointer. When two indicators report the same offset
/// the first one encountered keeps the win. When no offset is negative the
/// pointer is below every card and the last indicator is returned, meaning
/// insert at the end of the column.
///
/// Returns `None` only for an empty slice; a registered column always has
/// at least its end-of-column sentinel.
pub fn nearest_indicator(pointer_y: f64, indicators: &[DropIndicator]) -> Option<usize> {
    if indicators.is_empty() {
        return None;
    }

    let mut winner = indicators.len() - 1;
    let mut best = f64::NEG_INFINITY;

    for (index, indicator) in indicators.iter().enumerate() {
        let offset = pointer_y - (indicator.top + DISTANCE_OFFSET);
        if offset < 0.0 && offset > best {
            winner = index;
            best = offset;
        }
    }

    Some(winner)
}
