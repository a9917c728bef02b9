/*!
Crate `setstream` computes set operations over sorted streams lazily.

Given any number of ascending streams, this crate can compute their
intersection, union, multiset sum, or the elements that appear in exactly
one (more precisely, an odd number) of them. None of the streams are ever
loaded into memory: every operation pulls from its operands only as far as
it needs to produce its next element, so operands may be files larger than
memory, or even infinite generators.

Expressions combining many streams are built as trees. Building a tree does
no work at all. Iterating its root drives the whole tree. Trees of the same
operator can be flattened with `simplify` into one wide operation, which
avoids repeated pairwise merging.

# Overview of types

`Cursor` is the pull based iteration trait implemented by everything in this
crate. `Stream` is a leaf over a single source (a `Vec`, the lines of a file,
a generator closure, a foreign iterator or any other `Cursor`).
`CombiningStream` is a set operation over a list of `Operand`s, each of which
is either a `Stream` or another `CombiningStream`. `OpBuilder` builds a wide
`CombiningStream` in one step. The `adapter` module contains the cursors
that expose concrete sources.

# Example: combining in-memory streams

```rust
use setstream::{Cursor, Stream};

let s1 = Stream::from_vec(vec!["a", "c", "m", "q"]);
let s2 = Stream::from_vec(vec!["c", "m"]);
let s3 = Stream::from_vec(vec!["c", "l", "m", "n", "x", "z"]);
let s4 = Stream::from_vec(vec!["b", "c", "m", "w", "z"]);

let mut expr = s1.union(s2).union(s3).intersect(s4);
assert_eq!(expr.to_vec().unwrap(), vec!["c", "m", "z"]);
```

# Example: infinite streams

Only as many elements as are requested are ever computed.

```rust
use setstream::{Cursor, Stream};

fn multiples_of(k: u64) -> Stream<u64> {
    Stream::generator(move || {
        let mut n = 0;
        move || { n += k; Some(n) }
    })
}

let edges = Stream::from_vec(vec![0, 100]);
let mut expr = edges.union(multiples_of(3).intersect(multiples_of(5)));
assert_eq!(
    expr.take(10).unwrap(),
    vec![0, 15, 30, 45, 60, 75, 90, 100, 105, 120],
);
```

# Sorted input

Every operand must emit its elements in ascending order according to `Ord`.
This is not checked. Operands that are not sorted produce unspecified
results (though never undefined behavior).

# Errors

Running out of elements is not an error; cursors return `Ok(None)`. Errors
come from the sources themselves (for example, an I/O error reading a file)
and are returned unchanged to the caller. See `Error`.
*/

#![deny(missing_docs)]

pub use crate::cursor::{BoxedCursor, Cursor, Iter};
pub use crate::error::{Error, Result};
pub use crate::ops::{CombiningStream, Op, OpBuilder, Operand};
pub use crate::stream::Stream;

pub mod adapter;
mod cursor;
mod error;
mod merge;
mod ops;
mod stream;
