//! Kanban pipeline bookkeeping: ordered stages per job, ordered cards per
//! stage. Positions stay dense (0..n) within a column after every move.

use uuid::Uuid;

/// Stage set seeded on first board fetch for a job.
pub const DEFAULT_STAGES: &[&str] = &["Applied", "Screening", "Interview", "Offer"];

/// New card orderings after moving `card` to `to_index` within one stage.
/// The index is clamped into range; the result is the full new ordering.
pub fn reorder_within(cards: &[Uuid], card: Uuid, to_index: usize) -> Vec<Uuid> {
    let mut order: Vec<Uuid> = cards.iter().copied().filter(|c| *c != card).collect();
    let index = to_index.min(order.len());
    order.insert(index, card);
    order
}

/// New orderings for both stages after moving `card` from `source` into
/// `dest` at `to_index`.
pub fn move_across(
    source: &[Uuid],
    dest: &[Uuid],
    card: Uuid,
    to_index: usize,
) -> (Vec<Uuid>, Vec<Uuid>) {
    let new_source: Vec<Uuid> = source.iter().copied().filter(|c| *c != card).collect();
    let mut new_dest: Vec<Uuid> = dest.iter().copied().filter(|c| *c != card).collect();
    let index = to_index.min(new_dest.len());
    new_dest.insert(index, card);
    (new_source, new_dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_reorder_moves_card_forward() {
        let cards = ids(4);
        let order = reorder_within(&cards, cards[0], 2);
        assert_eq!(order, vec![cards[1], cards[2], cards[0], cards[3]]);
    }

    #[test]
    fn test_reorder_moves_card_backward() {
        let cards = ids(3);
        let order = reorder_within(&cards, cards[2], 0);
        assert_eq!(order, vec![cards[2], cards[0], cards[1]]);
    }

    #[test]
    fn test_reorder_clamps_index() {
        let cards = ids(3);
        let order = reorder_within(&cards, cards[0], 99);
        assert_eq!(order, vec![cards[1], cards[2], cards[0]]);
    }

    #[test]
    fn test_reorder_noop_keeps_order() {
        let cards = ids(3);
        let order = reorder_within(&cards, cards[1], 1);
        assert_eq!(order, cards);
    }

    #[test]
    fn test_move_across_removes_and_inserts() {
        let source = ids(3);
        let dest = ids(2);
        let (new_source, new_dest) = move_across(&source, &dest, source[1], 1);
        assert_eq!(new_source, vec![source[0], source[2]]);
        assert_eq!(new_dest, vec![dest[0], source[1], dest[1]]);
    }

    #[test]
    fn test_move_across_into_empty_stage() {
        let source = ids(1);
        let (new_source, new_dest) = move_across(&source, &[], source[0], 0);
        assert!(new_source.is_empty());
        assert_eq!(new_dest, vec![source[0]]);
    }

    #[test]
    fn test_move_across_clamps_index() {
        let source = ids(2);
        let dest = ids(1);
        let (_, new_dest) = move_across(&source, &dest, source[0], 42);
        assert_eq!(new_dest, vec![dest[0], source[0]]);
    }
}
