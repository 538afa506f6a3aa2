use std::collections::BTreeSet;

/// Merge positions into maximal contiguous spans.
///
/// Positions are deduplicated and sorted, each returned `(low, high)` pair is inclusive.
pub fn join_spans(positions: &[usize]) -> Vec<(usize, usize)> {
    let positions = positions.iter().cloned().collect::<BTreeSet<_>>();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for position in positions {
        match spans.last_mut() {
            Some((_, high)) if *high + 1 == position => *high = position,
            _ => spans.push((position, position)),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::join_spans;

    #[test]
    fn spans() {
        assert_eq!(join_spans(&[]), vec![]);
        assert_eq!(join_spans(&[3]), vec![(3, 3)]);
        assert_eq!(join_spans(&[2, 0, 1]), vec![(0, 2)]);
        assert_eq!(join_spans(&[5, 0, 2, 1, 1, 6]), vec![(0, 2), (5, 6)]);
        assert_eq!(join_spans(&[0, 2, 4]), vec![(0, 0), (2, 2), (4, 4)]);
    }
}
