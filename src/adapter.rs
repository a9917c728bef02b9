/*!
Leaf adapters that expose concrete data sources through the `Cursor` trait.

Each adapter is a thin wrapper that keeps a position in its source and knows
how to get back to the start. None of them sort or validate their input.
*/

use std::fmt;
use std::io::{BufRead, Seek, SeekFrom};
use std::iter::FromIterator;

use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// A cursor over an in-memory ordered collection.
///
/// Elements are cloned out by position. Rewinding resets the position to
/// `0`.
#[derive(Clone, Debug)]
pub struct Sequence<T> {
    items: Vec<T>,
    pos: usize,
}

impl<T: Clone> Sequence<T> {
    /// Create a cursor over the given elements, which must already be in
    /// ascending order.
    pub fn new(items: Vec<T>) -> Sequence<T> {
        Sequence { items, pos: 0 }
    }

    /// Returns the number of elements in the underlying collection.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if and only if the underlying collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(it: I) -> Self {
        Sequence::new(it.into_iter().collect())
    }
}

impl<T: Clone> Cursor for Sequence<T> {
    type Item = T;

    fn advance(&mut self) -> Result<Option<T>> {
        let item = self.items.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        Ok(item)
    }

    fn rewind(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }
}

/// A cursor over the lines of a seekable reader.
///
/// Each line is returned *including* its terminator, exactly as it appears
/// in the resource. The last line is returned as-is even when it has no
/// terminator. Lines must be valid UTF-8.
///
/// The offset of the reader when it is first read from is remembered.
/// Rewinding seeks back to it.
pub struct Lines<R> {
    rdr: R,
    terminator: u8,
    start: Option<u64>,
}

impl<R: BufRead + Seek> Lines<R> {
    /// Create a cursor over `\n` terminated lines.
    pub fn new(rdr: R) -> Lines<R> {
        Lines::with_terminator(rdr, b'\n')
    }

    /// Create a cursor over lines ending with the given byte.
    pub fn with_terminator(rdr: R, terminator: u8) -> Lines<R> {
        Lines { rdr, terminator, start: None }
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.rdr
    }
}

impl<R: BufRead + Seek> Cursor for Lines<R> {
    type Item = String;

    fn advance(&mut self) -> Result<Option<String>> {
        if self.start.is_none() {
            self.start = Some(self.rdr.stream_position()?);
        }
        let mut buf = vec![];
        if self.rdr.read_until(self.terminator, &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8(buf)?))
    }

    fn rewind(&mut self) -> Result<()> {
        if let Some(start) = self.start {
            self.rdr.seek(SeekFrom::Start(start))?;
        }
        Ok(())
    }
}

impl<R> fmt::Debug for Lines<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lines")
            .field("terminator", &self.terminator)
            .field("start", &self.start)
            .finish()
    }
}

/// A cursor over a closure based generator.
///
/// The generator is described by a constructor `F` that builds a step
/// function `G`. The step function is built lazily on the first call to
/// `advance` and is called once per element; it returns `None` when the
/// sequence ends, after which the cursor stays exhausted without calling it
/// again. Rewinding drops the step function so that the next `advance`
/// builds a fresh one.
///
/// Infinite generators are fine as long as they are only consumed lazily.
///
/// # Example
///
/// ```rust
/// use setstream::adapter::Generator;
/// use setstream::Cursor;
///
/// let mut multiples = Generator::new(|| {
///     let mut n = 0;
///     move || { n += 3; Some(n) }
/// });
/// assert_eq!(multiples.take(4).unwrap(), vec![3, 6, 9, 12]);
/// ```
pub struct Generator<F, G> {
    ctor: F,
    step: Option<G>,
    done: bool,
}

impl<F: FnMut() -> G, G> Generator<F, G> {
    /// Create a generator cursor from a step function constructor.
    pub fn new(ctor: F) -> Generator<F, G> {
        Generator { ctor, step: None, done: false }
    }
}

impl<T, F, G> Cursor for Generator<F, G>
where
    F: FnMut() -> G,
    G: FnMut() -> Option<T>,
{
    type Item = T;

    fn advance(&mut self) -> Result<Option<T>> {
        if self.done {
            return Ok(None);
        }
        let ctor = &mut self.ctor;
        let step = self.step.get_or_insert_with(|| ctor());
        let item = step();
        self.done = item.is_none();
        Ok(item)
    }

    fn rewind(&mut self) -> Result<()> {
        self.step = None;
        self.done = false;
        Ok(())
    }
}

impl<F, G> fmt::Debug for Generator<F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("built", &self.step.is_some())
            .field("done", &self.done)
            .finish()
    }
}

/// A cursor over a foreign `Iterator`.
///
/// Iterators can't be restarted in general. `Foreign::new` keeps a copy of
/// a cloneable iterator and restores it on rewind. `Foreign::once` wraps any
/// iterator, but fails with `Error::Unrewindable` if it is asked to rewind
/// after producing an element.
pub struct Foreign<I> {
    iter: I,
    origin: Option<(I, fn(&I) -> I)>,
    advanced: bool,
    done: bool,
}

impl<I: Iterator + Clone> Foreign<I> {
    /// Wrap a cloneable iterator, which makes the cursor replayable.
    pub fn new(iter: I) -> Foreign<I> {
        let origin = (iter.clone(), <I as Clone>::clone as fn(&I) -> I);
        Foreign { iter, origin: Some(origin), advanced: false, done: false }
    }
}

impl<I: Iterator> Foreign<I> {
    /// Wrap a single pass iterator.
    pub fn once(iter: I) -> Foreign<I> {
        Foreign { iter, origin: None, advanced: false, done: false }
    }
}

impl<I: Iterator> Cursor for Foreign<I> {
    type Item = I::Item;

    fn advance(&mut self) -> Result<Option<I::Item>> {
        if self.done {
            return Ok(None);
        }
        self.advanced = true;
        let item = self.iter.next();
        self.done = item.is_none();
        Ok(item)
    }

    fn rewind(&mut self) -> Result<()> {
        match self.origin {
            Some((ref origin, restore)) => self.iter = restore(origin),
            None if self.advanced => return Err(Error::Unrewindable),
            None => {}
        }
        self.advanced = false;
        self.done = false;
        Ok(())
    }
}

impl<I> fmt::Debug for Foreign<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Foreign")
            .field("replayable", &self.origin.is_some())
            .field("advanced", &self.advanced)
            .finish()
    }
}
