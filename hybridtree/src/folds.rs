use std::ops::Range;

/// Number of cross-validation folds.
pub const N_FOLDS: usize = 10;

/// Split `n` items into ten folds.
///
/// The first nine folds get `n / 10` items, the last fold gets the remainder.
pub fn ten_folds(n: usize) -> Vec<Range<usize>> {
    let step = n / N_FOLDS;
    let mut folds = (0..N_FOLDS - 1)
        .map(|fold| fold * step..(fold + 1) * step)
        .collect::<Vec<_>>();
    folds.push((N_FOLDS - 1) * step..n);
    folds
}

/// Split `items` into training and test items of `fold`.
pub fn train_test<'a, T>(items: &'a [T], fold: &Range<usize>) -> (Vec<&'a T>, Vec<&'a T>) {
    let mut train = Vec::with_capacity(items.len().saturating_sub(fold.len()));
    let mut test = Vec::with_capacity(fold.len());
    for (idx, item) in items.iter().enumerate() {
        if fold.contains(&idx) {
            test.push(item);
        } else {
            train.push(item);
        }
    }
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::{ten_folds, train_test};

    #[test]
    fn folds() {
        let folds = ten_folds(25);
        assert_eq!(folds.len(), 10);
        assert_eq!(folds[0], 0..2);
        assert_eq!(folds[8], 16..18);
        assert_eq!(folds[9], 18..25);
        assert_eq!(folds.iter().map(|fold| fold.len()).sum::<usize>(), 25);

        let folds = ten_folds(7);
        assert!(folds[..9].iter().all(|fold| fold.is_empty()));
        assert_eq!(folds[9], 0..7);
    }

    #[test]
    fn split() {
        let items = (0..20).collect::<Vec<_>>();
        let folds = ten_folds(items.len());
        let (train, test) = train_test(&items, &folds[1]);
        assert_eq!(test, vec![&2, &3]);
        assert_eq!(train.len(), 18);
        assert!(!train.contains(&&2));
    }

    #[test]
    fn split_outlives_range() {
        let items = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let test = {
            let fold = 2..3;
            train_test(&items, &fold).1
        };
        assert_eq!(test, vec!["c"]);
    }
}
