use crate::clock::ClockTime;

/// Intervalles semi-ouverts [a_start, a_end) et [b_start, b_end).
pub(super) fn overlaps(
    a_start: ClockTime,
    a_end: ClockTime,
    b_start: ClockTime,
    b_end: ClockTime,
) -> bool {
    a_start.max(b_start) < a_end.min(b_end)
}
