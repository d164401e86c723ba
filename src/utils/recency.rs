use crate::models::Timestamped;

/// Newest-first copy of `items`, truncated to `limit` entries.
///
/// The sort is stable, so records sharing a timestamp keep their listing order.
pub fn most_recent<T: Timestamped + Clone>(items: &[T], limit: usize) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    sorted.truncate(limit);
    sorted
}
