use crate::error::{Error, Result};

/// Cursor describes a replayable "pull iterator" over a sorted sequence.
///
/// Every stream in this crate, from a leaf adapter wrapping a file all the
/// way up to a combination of many other streams, implements this trait.
/// The set operations are written against it, which is what allows streams
/// with different concrete types (say, the lines of a file and a closure
/// based generator) to be combined.
///
/// A cursor differs from an `Iterator` in two ways:
///
/// 1. Advancing can fail. Exhaustion is *not* a failure (it is reported as
///    `Ok(None)`), but the resource underneath a cursor may be. Failures are
///    propagated to the caller as-is.
/// 2. A cursor can be rewound. After a call to `rewind`, iterating to the
///    end again must reproduce exactly the same sequence as the first pass.
///    Combinations depend on this: every pass over a combination restarts
///    each of its operands.
///
/// Elements must be emitted in ascending order according to `Ord`. This is
/// never checked. Combining streams that are not sorted produces
/// unspecified (but memory safe) results.
pub trait Cursor {
    /// The type of the element emitted by this cursor.
    type Item;

    /// Emits the next element in this cursor, or `None` to indicate that it
    /// has been exhausted.
    ///
    /// Calling `advance` again after `None` keeps returning `None`.
    fn advance(&mut self) -> Result<Option<Self::Item>>;

    /// Returns this cursor to its initial position.
    ///
    /// Rewinding is idempotent. Most implementations defer any work on the
    /// underlying resource until the next call to `advance`.
    fn rewind(&mut self) -> Result<()>;

    /// Emits the next element, or returns `Error::PastEnd` if this cursor
    /// has been exhausted.
    ///
    /// This is a convenience for callers that prefer fail-fast iteration.
    /// Set operations never use it.
    fn advance_strict(&mut self) -> Result<Self::Item> {
        self.advance()?.ok_or(Error::PastEnd)
    }

    /// Rewinds this cursor and collects every element into a vector.
    ///
    /// This does not terminate on infinite cursors. Use `take` for those.
    fn to_vec(&mut self) -> Result<Vec<Self::Item>>
    where
        Self: Sized,
    {
        self.rewind()?;
        let mut items = vec![];
        while let Some(item) = self.advance()? {
            items.push(item);
        }
        Ok(items)
    }

    /// Rewinds this cursor and collects at most its first `n` elements.
    fn take(&mut self, n: usize) -> Result<Vec<Self::Item>>
    where
        Self: Sized,
    {
        self.rewind()?;
        let mut items = Vec::with_capacity(n);
        while items.len() < n {
            match self.advance()? {
                None => break,
                Some(item) => items.push(item),
            }
        }
        Ok(items)
    }

    /// Rewinds this cursor and calls `f` with every element in order.
    fn for_each<F>(&mut self, mut f: F) -> Result<()>
    where
        Self: Sized,
        F: FnMut(Self::Item),
    {
        self.rewind()?;
        while let Some(item) = self.advance()? {
            f(item);
        }
        Ok(())
    }

    /// Returns a lazy iterator over this cursor.
    ///
    /// The cursor is rewound before the first element is pulled, so every
    /// call to `iter` starts from the beginning. The iterator yields
    /// `Result`s and stops after the first error.
    fn iter(&mut self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter { cursor: self, state: IterState::Start }
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    fn advance(&mut self) -> Result<Option<C::Item>> {
        (**self).advance()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

impl<'a, C: Cursor + ?Sized> Cursor for &'a mut C {
    type Item = C::Item;

    fn advance(&mut self) -> Result<Option<C::Item>> {
        (**self).advance()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

/// A cursor of any concrete type, used wherever streams must be
/// heterogeneous.
pub type BoxedCursor<T> = Box<dyn Cursor<Item = T>>;

/// A lazy iterator over the elements of a cursor.
///
/// This is created by `Cursor::iter`.
#[derive(Debug)]
pub struct Iter<'c, C> {
    cursor: &'c mut C,
    state: IterState,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum IterState {
    Start,
    Running,
    Done,
}

impl<'c, C: Cursor> Iterator for Iter<'c, C> {
    type Item = Result<C::Item>;

    fn next(&mut self) -> Option<Result<C::Item>> {
        if self.state == IterState::Start {
            self.state = IterState::Running;
            if let Err(err) = self.cursor.rewind() {
                self.state = IterState::Done;
                return Some(Err(err));
            }
        }
        if self.state == IterState::Done {
            return None;
        }
        match self.cursor.advance() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.state = IterState::Done;
                None
            }
            Err(err) => {
                self.state = IterState::Done;
                Some(Err(err))
            }
        }
    }
}

impl<'c, C: Cursor> std::iter::FusedIterator for Iter<'c, C> {}
