use super::Card;

/// Iterates every `num_cards` sized combination of a slice of cards, in
/// lexicographic order of positions. Used by the evaluator to walk the
/// C(n, 5) five card hands out of a seven card holding.
#[derive(Debug)]
pub struct CardIter<'a> {
    possible_cards: &'a [Card],

    /// Positions into `possible_cards` for the next combination to emit.
    /// `None` once the iterator is exhausted.
    idx: Option<Vec<usize>>,
}

impl CardIter<'_> {
    pub fn new(possible_cards: &[Card], num_cards: usize) -> CardIter<'_> {
        let idx = if num_cards <= possible_cards.len() {
            Some((0..num_cards).collect())
        } else {
            None
        };
        CardIter {
            possible_cards,
            idx,
        }
    }
}

impl Iterator for CardIter<'_> {
    type Item = Vec<Card>;

    fn next(&mut self) -> Option<Vec<Card>> {
        let idx = self.idx.as_mut()?;
        let result: Vec<Card> = idx.iter().map(|&i| self.possible_cards[i]).collect();

        // Find the right most position that can still move forward.
        let n = self.possible_cards.len();
        let k = idx.len();
        let mut level = k;
        loop {
            if level == 0 {
                self.idx = None;
                break;
            }
            level -= 1;
            if idx[level] < n - k + level {
                idx[level] += 1;
                for j in level + 1..k {
                    idx[j] = idx[j - 1] + 1;
                }
                break;
            }
        }

        Some(result)
    }
}
