//! Generic sparse-index bracket lookup: given a key, find either an exact
//! hit or the (low, high) pair of entries that strictly bracket it.

/// Result of bracketing `target` against a sorted sequence of keyed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket<T> {
    /// `target` matched an entry exactly; caller can short-circuit.
    Exact(T),
    /// No exact match. `low` is `None` when `target` is below every entry
    /// (a guaranteed miss — nothing precedes the first entry); `high` is
    /// `None` when `target` is above every entry (also a guaranteed miss).
    Between { low: Option<T>, high: Option<T> },
}

/// `items` must be sorted ascending by `key_of`. Runs a binary search via
/// `partition_point` to find the bracket around `target` in O(log n).
pub fn bracket_lookup<'a, T, K>(
    items: &'a [T],
    key_of: impl Fn(&T) -> K,
    target: &K,
) -> Bracket<&'a T>
where
    K: Ord,
{
    if items.is_empty() {
        return Bracket::Between {
            low: None,
            high: None,
        };
    }

    let idx = items.partition_point(|item| key_of(item) < *target);

    if idx < items.len() && key_of(&items[idx]) == *target {
        return Bracket::Exact(&items[idx]);
    }

    let low = if idx == 0 { None } else { Some(&items[idx - 1]) };
    let high = if idx == items.len() {
        None
    } else {
        Some(&items[idx])
    };
    Bracket::Between { low, high }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slice_is_a_miss() {
        let items: Vec<i32> = vec![];
        let result = bracket_lookup(&items, |x| *x, &5);
        assert_eq!(
            result,
            Bracket::Between {
                low: None,
                high: None
            }
        );
    }

    #[test]
    fn exact_match() {
        let items = vec![1, 3, 5, 7];
        assert_eq!(bracket_lookup(&items, |x| *x, &5), Bracket::Exact(&5));
    }

    #[test]
    fn below_smallest() {
        let items = vec![3, 5, 7];
        assert_eq!(
            bracket_lookup(&items, |x| *x, &1),
            Bracket::Between {
                low: None,
                high: Some(&3)
            }
        );
    }

    #[test]
    fn above_largest() {
        let items = vec![3, 5, 7];
        assert_eq!(
            bracket_lookup(&items, |x| *x, &9),
            Bracket::Between {
                low: Some(&7),
                high: None
            }
        );
    }

    #[test]
    fn interior_miss_brackets() {
        let items = vec![3, 5, 9];
        assert_eq!(
            bracket_lookup(&items, |x| *x, &7),
            Bracket::Between {
                low: Some(&5),
                high: Some(&9)
            }
        );
    }
}
