use crate::models::listing::Listing;

/// Merge newly imported listings into the persisted collection.
///
/// Append-only concatenation with no deduplication by id: re-importing the
/// same URL yields a duplicate listing, which matches the persisted history
/// this crate mirrors. An absent side is treated as empty, so
/// `merge(existing, None)` returns `existing` unchanged.
///
/// The caller replaces the whole collection document with the result;
/// concurrent writers race last-writer-wins.
pub fn merge(existing: Option<Vec<Listing>>, incoming: Option<Vec<Listing>>) -> Vec<Listing> {
    let mut merged = existing.unwrap_or_default();
    merged.extend(incoming.unwrap_or_default());
    merged
}
