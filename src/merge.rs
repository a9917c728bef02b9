use crate::cursor::Cursor;
use crate::error::Result;
use crate::ops::Op;

/// The state of a single pass of a set operation.
///
/// A `Merge` holds one head per operand: the most recently pulled value
/// that hasn't been consumed yet, or `None` once that operand is exhausted.
/// An exhausted operand is never advanced again during the same pass.
///
/// Combinations keep a `Merge` only while they are being iterated. Rewinding
/// a combination throws its `Merge` away; the next pass builds a new one.
#[derive(Debug)]
pub(crate) struct Merge<T> {
    heads: Vec<Option<T>>,
}

impl<T: Ord> Merge<T> {
    /// Rewind every cursor and pull one head from each.
    pub(crate) fn start<C>(cursors: &mut [C]) -> Result<Merge<T>>
    where
        C: Cursor<Item = T>,
    {
        let mut heads = Vec::with_capacity(cursors.len());
        for cur in cursors.iter_mut() {
            cur.rewind()?;
            heads.push(cur.advance()?);
        }
        Ok(Merge { heads })
    }

    /// Produce the next element of `op` applied to `cursors`.
    ///
    /// `cursors` must be the same slice, in the same order, that this merge
    /// was started with.
    pub(crate) fn next<C>(
        &mut self,
        op: Op,
        cursors: &mut [C],
    ) -> Result<Option<T>>
    where
        C: Cursor<Item = T>,
    {
        debug_assert_eq!(self.heads.len(), cursors.len());
        match op {
            Op::Intersection => self.intersection(cursors),
            Op::Union => self.union(cursors),
            Op::Sum => self.sum(cursors),
            Op::ExclusiveOne => self.exclusive_one(cursors),
        }
    }

    fn intersection<C>(&mut self, cursors: &mut [C]) -> Result<Option<T>>
    where
        C: Cursor<Item = T>,
    {
        if self.heads.is_empty() {
            return Ok(None);
        }
        loop {
            if self.heads.iter().any(Option::is_none) {
                return Ok(None);
            }
            let min = match self.min_index() {
                None => return Ok(None),
                Some(min) => min,
            };
            let agreed = {
                let value = &self.heads[min];
                self.heads.iter().all(|head| head == value)
            };
            if agreed {
                break;
            }
            self.heads[min] = cursors[min].advance()?;
        }
        // Only the first operand skips its duplicates here. The others are
        // dragged past theirs by advancing the minimum on the next call.
        let value = match self.heads[0].take() {
            None => return Ok(None),
            Some(value) => value,
        };
        self.refill_past(0, &value, cursors)?;
        Ok(Some(value))
    }

    fn union<C>(&mut self, cursors: &mut [C]) -> Result<Option<T>>
    where
        C: Cursor<Item = T>,
    {
        let first = match self.min_index() {
            None => return Ok(None),
            Some(first) => first,
        };
        let value = match self.heads[first].take() {
            None => return Ok(None),
            Some(value) => value,
        };
        self.refill_past(first, &value, cursors)?;
        for i in first + 1..self.heads.len() {
            self.skip_past(i, &value, cursors)?;
        }
        Ok(Some(value))
    }

    fn sum<C>(&mut self, cursors: &mut [C]) -> Result<Option<T>>
    where
        C: Cursor<Item = T>,
    {
        let first = match self.min_index() {
            None => return Ok(None),
            Some(first) => first,
        };
        let value = match self.heads[first].take() {
            None => return Ok(None),
            Some(value) => value,
        };
        self.heads[first] = cursors[first].advance()?;
        Ok(Some(value))
    }

    fn exclusive_one<C>(&mut self, cursors: &mut [C]) -> Result<Option<T>>
    where
        C: Cursor<Item = T>,
    {
        loop {
            let first = match self.min_index() {
                None => return Ok(None),
                Some(first) => first,
            };
            let value = match self.heads[first].take() {
                None => return Ok(None),
                Some(value) => value,
            };
            self.refill_past(first, &value, cursors)?;
            let mut holders: usize = 1;
            for i in first + 1..self.heads.len() {
                if self.heads[i].as_ref() == Some(&value) {
                    self.refill_past(i, &value, cursors)?;
                    holders += 1;
                }
            }
            // A value held by an even number of operands cancels out.
            if holders % 2 == 1 {
                return Ok(Some(value));
            }
        }
    }

    /// Returns the index of the first operand holding the smallest head, or
    /// `None` if every operand is exhausted.
    fn min_index(&self) -> Option<usize> {
        self.heads
            .iter()
            .enumerate()
            .filter_map(|(i, head)| head.as_ref().map(|value| (i, value)))
            .min_by(|&(_, a), &(_, b)| a.cmp(b))
            .map(|(i, _)| i)
    }

    /// Pull from operand `i` until its head differs from `value`.
    ///
    /// The current head of `i` is assumed to be consumed already.
    fn refill_past<C>(
        &mut self,
        i: usize,
        value: &T,
        cursors: &mut [C],
    ) -> Result<()>
    where
        C: Cursor<Item = T>,
    {
        loop {
            let next = cursors[i].advance()?;
            if next.as_ref() != Some(value) {
                self.heads[i] = next;
                return Ok(());
            }
        }
    }

    /// Move operand `i` past `value` if its head currently equals it.
    fn skip_past<C>(
        &mut self,
        i: usize,
        value: &T,
        cursors: &mut [C],
    ) -> Result<()>
    where
        C: Cursor<Item = T>,
    {
        if self.heads[i].as_ref() == Some(value) {
            self.refill_past(i, value, cursors)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::Merge;
    use crate::adapter::Sequence;
    use crate::ops::Op;

    fn merge<T: Clone + Ord>(op: Op, sets: Vec<Vec<T>>) -> Vec<T> {
        let mut cursors: Vec<Sequence<T>> =
            sets.into_iter().map(Sequence::new).collect();
        let mut merge = Merge::start(&mut cursors).unwrap();
        let mut out = vec![];
        while let Some(v) = merge.next(op, &mut cursors).unwrap() {
            out.push(v);
        }
        // Exhaustion is sticky.
        assert!(merge.next(op, &mut cursors).unwrap().is_none());
        out
    }

    macro_rules! create_set_op {
        ($name:ident, $op:expr) => {
            fn $name(sets: Vec<Vec<&'static str>>) -> Vec<&'static str> {
                merge($op, sets)
            }
        };
    }

    create_set_op!(intersection, Op::Intersection);
    create_set_op!(union, Op::Union);
    create_set_op!(sum, Op::Sum);
    create_set_op!(exclusive_one, Op::ExclusiveOne);

    #[test]
    fn no_operands() {
        assert!(intersection(vec![]).is_empty());
        assert!(union(vec![]).is_empty());
        assert!(sum(vec![]).is_empty());
        assert!(exclusive_one(vec![]).is_empty());
    }

    #[test]
    fn single_operand() {
        let set = vec!["a", "a", "b"];
        assert_eq!(intersection(vec![set.clone()]), vec!["a", "b"]);
        assert_eq!(union(vec![set.clone()]), vec!["a", "b"]);
        assert_eq!(sum(vec![set.clone()]), vec!["a", "a", "b"]);
        assert_eq!(exclusive_one(vec![set]), vec!["a", "b"]);
    }

    #[test]
    fn intersect_disjoint() {
        let v = intersection(vec![vec!["a", "b", "c"], vec!["x", "y", "z"]]);
        assert_eq!(v, Vec::<&str>::new());
    }

    #[test]
    fn intersect_dupes() {
        let v = intersection(vec![
            vec!["a", "a", "a", "a", "a", "b", "b"],
            vec!["a", "b", "b", "b", "c", "c"],
        ]);
        assert_eq!(v, vec!["a", "b"]);
    }

    #[test]
    fn intersect_with_empty() {
        let v = intersection(vec![vec!["a", "b"], vec![], vec!["a"]]);
        assert_eq!(v, Vec::<&str>::new());
    }

    #[test]
    fn intersect_many() {
        let v = intersection(vec![
            vec!["a", "c", "m", "q"],
            vec!["c", "m"],
            vec!["c", "l", "m", "n", "x", "z"],
            vec!["b", "c", "m", "w", "z"],
        ]);
        assert_eq!(v, vec!["c", "m"]);
    }

    #[test]
    fn union_dupes() {
        let v = union(vec![
            vec!["a", "a", "a", "a", "a", "b", "b"],
            vec!["a", "b", "b", "b", "c", "c"],
        ]);
        assert_eq!(v, vec!["a", "b", "c"]);
    }

    #[test]
    fn union_many() {
        let v = union(vec![
            vec!["a", "c", "m", "q"],
            vec!["c", "m"],
            vec!["c", "l", "m", "n", "x", "z"],
            vec!["b", "c", "m", "w", "z"],
        ]);
        assert_eq!(v, vec!["a", "b", "c", "l", "m", "n", "q", "w", "x", "z"]);
    }

    #[test]
    fn sum_keeps_multiplicity() {
        let v = sum(vec![
            vec!["a", "c", "m", "q"],
            vec!["c", "m"],
            vec!["c", "l", "m", "n", "x", "z"],
            vec!["b", "c", "m", "w", "z"],
        ]);
        assert_eq!(
            v,
            vec![
                "a", "b", "c", "c", "c", "c", "l", "m", "m", "m", "m", "n",
                "q", "w", "x", "z", "z",
            ]
        );
    }

    #[test]
    fn exclusive_one_pair() {
        let v = exclusive_one(vec![vec!["a", "c", "m", "q"], vec!["c", "m"]]);
        assert_eq!(v, vec!["a", "q"]);
    }

    #[test]
    fn exclusive_one_many() {
        let v = exclusive_one(vec![
            vec!["a", "c", "m", "q"],
            vec!["c", "m"],
            vec!["c", "l", "m", "n", "x", "z"],
            vec!["b", "c", "m", "w", "z"],
        ]);
        assert_eq!(v, vec!["a", "b", "l", "n", "q", "w", "x"]);
    }

    #[test]
    fn exclusive_one_leaves_larger_heads_alone() {
        let v = merge(Op::ExclusiveOne, vec![vec![1, 5], vec![1], vec![3]]);
        assert_eq!(v, vec![3, 5]);
    }

    #[test]
    fn exclusive_one_odd_holders() {
        let v = merge(Op::ExclusiveOne, vec![vec![1, 2], vec![1, 2], vec![1]]);
        assert_eq!(v, vec![1]);
    }

    #[test]
    fn exclusive_one_three_holders() {
        let v = merge(Op::ExclusiveOne, vec![vec![1], vec![1], vec![1]]);
        assert_eq!(v, vec![1]);
    }

    /// Orders only by `key`, so that ties between operands are observable.
    #[derive(Clone, Debug)]
    struct Tagged {
        key: u8,
        tag: usize,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Tagged) -> bool {
            self.key == other.key
        }
    }

    impl Eq for Tagged {}

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Tagged) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Tagged) -> Ordering {
            self.key.cmp(&other.key)
        }
    }

    fn tagged(tag: usize, keys: &[u8]) -> Vec<Tagged> {
        keys.iter().map(|&key| Tagged { key, tag }).collect()
    }

    #[test]
    fn sum_breaks_ties_by_operand_order() {
        let v = merge(
            Op::Sum,
            vec![tagged(0, &[1, 2, 2]), tagged(1, &[1, 2]), tagged(2, &[2])],
        );
        let got: Vec<(u8, usize)> = v.iter().map(|t| (t.key, t.tag)).collect();
        assert_eq!(got, vec![(1, 0), (1, 1), (2, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn union_emits_first_holder() {
        let v = merge(Op::Union, vec![tagged(0, &[2]), tagged(1, &[1, 2])]);
        let got: Vec<(u8, usize)> = v.iter().map(|t| (t.key, t.tag)).collect();
        assert_eq!(got, vec![(1, 1), (2, 0)]);
    }
}
