use std::fmt;
use std::iter::FromIterator;

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::merge::Merge;
use crate::stream::Stream;

/// The set operation performed by a `CombiningStream`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Op {
    /// Elements present in every operand, each emitted once (`&`).
    Intersection,
    /// Elements present in any operand, each emitted once (`|`).
    Union,
    /// Every element of every operand, with multiplicity (`+`).
    ///
    /// Equal elements are emitted in operand order.
    Sum,
    /// Elements present in an odd number of operands, each emitted once
    /// (`-`).
    ///
    /// With two operands, these are the elements present in exactly one of
    /// them.
    ExclusiveOne,
}

impl Op {
    /// The informal operator symbol for this operation.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Intersection => "&",
            Op::Union => "|",
            Op::Sum => "+",
            Op::ExclusiveOne => "-",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A node that can take part in a set operation.
///
/// This is either a leaf `Stream` or another `CombiningStream`. Both convert
/// into an `Operand` with `From`, so any function accepting
/// `impl Into<Operand<T>>` accepts either.
pub enum Operand<T> {
    /// A leaf stream.
    Stream(Stream<T>),
    /// A nested set operation.
    Combination(CombiningStream<T>),
}

impl<T> Operand<T> {
    /// Flatten nested combinations that share an operator.
    ///
    /// Leaf streams are returned unchanged.
    pub fn simplify(self) -> Operand<T> {
        match self {
            Operand::Stream(stream) => Operand::Stream(stream),
            Operand::Combination(comb) => Operand::Combination(comb.simplify()),
        }
    }

    /// Returns the number of leaf streams in this operand.
    pub fn leaf_count(&self) -> usize {
        match *self {
            Operand::Stream(_) => 1,
            Operand::Combination(ref comb) => comb.leaf_count(),
        }
    }

    /// Returns the nested combination, if this operand is one.
    pub fn as_combination(&self) -> Option<&CombiningStream<T>> {
        match *self {
            Operand::Stream(_) => None,
            Operand::Combination(ref comb) => Some(comb),
        }
    }

    /// Returns the leaf stream, if this operand is one.
    pub fn as_stream(&self) -> Option<&Stream<T>> {
        match *self {
            Operand::Stream(ref stream) => Some(stream),
            Operand::Combination(_) => None,
        }
    }
}

impl<T> From<Stream<T>> for Operand<T> {
    fn from(stream: Stream<T>) -> Operand<T> {
        Operand::Stream(stream)
    }
}

impl<T> From<CombiningStream<T>> for Operand<T> {
    fn from(comb: CombiningStream<T>) -> Operand<T> {
        Operand::Combination(comb)
    }
}

impl<T: Ord> Cursor for Operand<T> {
    type Item = T;

    fn advance(&mut self) -> Result<Option<T>> {
        match *self {
            Operand::Stream(ref mut stream) => stream.advance(),
            Operand::Combination(ref mut comb) => comb.advance(),
        }
    }

    fn rewind(&mut self) -> Result<()> {
        match *self {
            Operand::Stream(ref mut stream) => stream.rewind(),
            Operand::Combination(ref mut comb) => comb.rewind(),
        }
    }
}

impl<T> fmt::Debug for Operand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operand::Stream(ref stream) => fmt::Debug::fmt(stream, f),
            Operand::Combination(ref comb) => fmt::Debug::fmt(comb, f),
        }
    }
}

/// A lazy set operation over any number of sorted operands.
///
/// A `CombiningStream` emits its elements in ascending order, pulling from
/// its operands only as much as is needed to produce the next one. Memory
/// use is proportional to the number of operands, never to their length,
/// so operands may be larger than memory or even infinite.
///
/// Each pass starts by rewinding every operand. Rewinding a combination
/// rewinds all of its operands too, which makes combinations reusable.
///
/// If an operand fails, `advance` returns its error and abandons the current
/// pass. The next call to `advance` starts a new pass from the beginning.
///
/// The output of `Intersection`, `Union` and `ExclusiveOne` does not depend
/// on operand order. The order of operands only decides which of several
/// equal elements `Sum` emits first.
///
/// # Example
///
/// ```rust
/// use setstream::{Cursor, Stream};
///
/// let s1 = Stream::from_vec(vec!["a", "c", "m", "q"]);
/// let s2 = Stream::from_vec(vec!["c", "m"]);
/// let s3 = Stream::from_vec(vec!["b", "c", "m", "w", "z"]);
///
/// let mut expr = s1.union(s2).intersect(s3);
/// assert_eq!(expr.to_vec().unwrap(), vec!["c", "m"]);
/// ```
pub struct CombiningStream<T> {
    op: Op,
    operands: Vec<Operand<T>>,
    merge: Option<Merge<T>>,
}

impl<T> CombiningStream<T> {
    /// Create a set operation over the given operands.
    ///
    /// Nothing is read from the operands until the combination is advanced.
    pub fn new(op: Op, operands: Vec<Operand<T>>) -> CombiningStream<T> {
        CombiningStream { op, operands, merge: None }
    }

    /// The set operation performed by this combination.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The operands of this combination, in order.
    pub fn operands(&self) -> &[Operand<T>] {
        &self.operands
    }

    /// Unwrap the operands of this combination.
    pub fn into_operands(self) -> Vec<Operand<T>> {
        self.operands
    }

    /// Returns the total number of leaf streams under this combination.
    pub fn leaf_count(&self) -> usize {
        self.operands.iter().map(Operand::leaf_count).sum()
    }

    /// Flatten nested combinations that share this combination's operator.
    ///
    /// Every operand is simplified first. An operand that is then a
    /// combination with the same operator is replaced by its own operands,
    /// so that, e.g., `(a | b) | (c | d)` becomes one four way union.
    /// Operands with a different operator are kept as (simplified) nested
    /// combinations. The result emits exactly the same elements as `self`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use setstream::{Cursor, Stream};
    ///
    /// let expr = Stream::from_vec(vec![1, 4])
    ///     .union(Stream::from_vec(vec![2]))
    ///     .union(Stream::from_vec(vec![3]));
    /// assert_eq!(expr.operands().len(), 2);
    ///
    /// let mut flat = expr.simplify();
    /// assert_eq!(flat.operands().len(), 3);
    /// assert_eq!(flat.to_vec().unwrap(), vec![1, 2, 3, 4]);
    /// ```
    pub fn simplify(self) -> CombiningStream<T> {
        let op = self.op;
        let mut flattened = 0;
        let mut operands = Vec::with_capacity(self.operands.len());
        for operand in self.operands {
            match operand.simplify() {
                Operand::Combination(inner) if inner.op == op => {
                    flattened += 1;
                    operands.extend(inner.operands);
                }
                operand => operands.push(operand),
            }
        }
        if flattened > 0 {
            debug!(
                event = "flatten",
                op = %op,
                flattened,
                operands = operands.len(),
                "flattened nested combinations"
            );
        }
        CombiningStream::new(op, operands)
    }
}

impl<T: Ord> Cursor for CombiningStream<T> {
    type Item = T;

    fn advance(&mut self) -> Result<Option<T>> {
        if self.merge.is_none() {
            trace!(
                event = "start",
                op = %self.op,
                operands = self.operands.len(),
                "starting merge pass"
            );
            self.merge = Some(Merge::start(&mut self.operands)?);
        }
        let next = match self.merge {
            Some(ref mut merge) => merge.next(self.op, &mut self.operands),
            None => Ok(None),
        };
        // A failed pull leaves the heads inconsistent, so the pass is
        // abandoned and the next call starts over.
        if next.is_err() {
            self.merge = None;
        }
        next
    }

    fn rewind(&mut self) -> Result<()> {
        trace!(
            event = "rewind",
            op = %self.op,
            operands = self.operands.len(),
            "rewinding combination"
        );
        self.merge = None;
        for operand in self.operands.iter_mut() {
            operand.rewind()?;
        }
        Ok(())
    }
}

impl<T> fmt::Debug for CombiningStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombiningStream")
            .field("op", &self.op)
            .field("operands", &self.operands)
            .field("running", &self.merge.is_some())
            .finish()
    }
}

macro_rules! combination_methods {
    ($node:ident) => {
        impl<T> $node<T> {
            /// Intersect this node with `other` (`self & other`).
            pub fn intersect<O>(self, other: O) -> CombiningStream<T>
            where
                O: Into<Operand<T>>,
            {
                self.combine(Op::Intersection, other.into())
            }

            /// Union this node with `other` (`self | other`).
            pub fn union<O>(self, other: O) -> CombiningStream<T>
            where
                O: Into<Operand<T>>,
            {
                self.combine(Op::Union, other.into())
            }

            /// Merge this node with `other`, keeping every element of both
            /// (`self + other`).
            pub fn sum_merge<O>(self, other: O) -> CombiningStream<T>
            where
                O: Into<Operand<T>>,
            {
                self.combine(Op::Sum, other.into())
            }

            /// Keep the elements found in exactly one of this node and
            /// `other` (`self - other`).
            pub fn exclusive_one<O>(self, other: O) -> CombiningStream<T>
            where
                O: Into<Operand<T>>,
            {
                self.combine(Op::ExclusiveOne, other.into())
            }

            fn combine(self, op: Op, other: Operand<T>) -> CombiningStream<T> {
                CombiningStream::new(op, vec![self.into(), other])
            }
        }
    };
}

combination_methods!(Stream);
combination_methods!(CombiningStream);
combination_methods!(Operand);

/// A builder for collecting streams on which to perform a set operation.
///
/// Chaining the binary methods on `Stream` builds a nested tree, one node
/// per method call. `OpBuilder` builds one wide combination directly, which
/// is equivalent to building the tree and calling `simplify` on it.
///
/// # Example
///
/// ```rust
/// use setstream::{Cursor, OpBuilder, Stream};
///
/// let mut union = OpBuilder::new()
///     .add(Stream::from_vec(vec!["a", "c"]))
///     .add(Stream::from_vec(vec!["b", "c"]))
///     .add(Stream::from_vec(vec!["c", "d"]))
///     .union();
/// assert_eq!(union.operands().len(), 3);
/// assert_eq!(union.to_vec().unwrap(), vec!["a", "b", "c", "d"]);
/// ```
pub struct OpBuilder<T> {
    operands: Vec<Operand<T>>,
}

impl<T> OpBuilder<T> {
    /// Create a new set operation builder.
    pub fn new() -> OpBuilder<T> {
        OpBuilder { operands: vec![] }
    }

    /// Add an operand to this set operation.
    ///
    /// This is useful for a chaining style pattern, e.g.,
    /// `builder.add(stream1).add(stream2).union()`.
    ///
    /// The operand must emit an ascending sequence.
    pub fn add<O: Into<Operand<T>>>(mut self, operand: O) -> OpBuilder<T> {
        self.push(operand);
        self
    }

    /// Add an operand to this set operation.
    ///
    /// The operand must emit an ascending sequence.
    pub fn push<O: Into<Operand<T>>>(&mut self, operand: O) {
        self.operands.push(operand.into());
    }

    /// Intersect all operands that have been added.
    pub fn intersection(self) -> CombiningStream<T> {
        CombiningStream::new(Op::Intersection, self.operands)
    }

    /// Union all operands that have been added.
    pub fn union(self) -> CombiningStream<T> {
        CombiningStream::new(Op::Union, self.operands)
    }

    /// Merge all operands that have been added, keeping duplicates.
    pub fn sum(self) -> CombiningStream<T> {
        CombiningStream::new(Op::Sum, self.operands)
    }

    /// Keep the elements present in an odd number of the operands that
    /// have been added.
    pub fn exclusive_one(self) -> CombiningStream<T> {
        CombiningStream::new(Op::ExclusiveOne, self.operands)
    }
}

impl<T> Default for OpBuilder<T> {
    fn default() -> OpBuilder<T> {
        OpBuilder::new()
    }
}

impl<T, O> Extend<O> for OpBuilder<T>
where
    O: Into<Operand<T>>,
{
    fn extend<I>(&mut self, it: I)
    where
        I: IntoIterator<Item = O>,
    {
        for operand in it {
            self.push(operand);
        }
    }
}

impl<T, O> FromIterator<O> for OpBuilder<T>
where
    O: Into<Operand<T>>,
{
    fn from_iter<I>(it: I) -> OpBuilder<T>
    where
        I: IntoIterator<Item = O>,
    {
        let mut op = OpBuilder::new();
        op.extend(it);
        op
    }
}
