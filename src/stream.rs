use std::fmt;
use std::io::{self, BufRead, Seek};
use std::iter::FromIterator;

use tracing::trace;

use crate::adapter::{Foreign, Generator, Lines, Sequence};
use crate::cursor::{BoxedCursor, Cursor};
use crate::error::Result;

/// A lazily realized stream over exactly one source.
///
/// A `Stream` is the leaf of every expression built with this crate. It can
/// be advanced and rewound like any other `Cursor`, and it can be combined
/// with other streams using `intersect`, `union`, `sum_merge` and
/// `exclusive_one`.
///
/// There are two kinds of sources:
///
/// 1. A value that already implements `Cursor`. Collections, generators and
///    foreign iterators are adapted into this form when the stream is
///    built. Rewinding the stream rewinds the cursor.
/// 2. A *deferred* constructor, which builds a fresh cursor on the first
///    call to `advance` after the stream is created or rewound. Rewinding
///    drops the live cursor. This is how resources such as files are
///    reopened for every pass.
///
/// Nothing is read from a source until the stream is advanced.
///
/// # Example
///
/// ```rust
/// use setstream::{Cursor, Stream};
///
/// let mut stream = Stream::from_vec(vec!["a", "b", "c"]);
/// assert_eq!(stream.to_vec().unwrap(), vec!["a", "b", "c"]);
/// ```
pub struct Stream<T> {
    source: Source<T>,
}

enum Source<T> {
    Ready(BoxedCursor<T>),
    Deferred {
        build: Box<dyn FnMut() -> Result<BoxedCursor<T>>>,
        live: Option<BoxedCursor<T>>,
    },
}

impl<T: 'static> Stream<T> {
    /// Create a stream from a value that already implements `Cursor`.
    ///
    /// The cursor is used unmodified.
    pub fn new<C>(cursor: C) -> Stream<T>
    where
        C: Cursor<Item = T> + 'static,
    {
        Stream { source: Source::Ready(Box::new(cursor)) }
    }

    /// Create a stream whose cursor is built by `build` on the first call
    /// to `advance` after construction or after a rewind.
    ///
    /// An error returned by `build` is propagated from that `advance`.
    pub fn deferred<F, C>(mut build: F) -> Stream<T>
    where
        F: FnMut() -> Result<C> + 'static,
        C: Cursor<Item = T> + 'static,
    {
        let build = move || -> Result<BoxedCursor<T>> {
            let cursor = build()?;
            Ok(Box::new(cursor))
        };
        Stream {
            source: Source::Deferred { build: Box::new(build), live: None },
        }
    }

    /// Create a stream from a closure based generator.
    ///
    /// `ctor` builds a step function, which is called once per element and
    /// returns `None` at the end. See `adapter::Generator`.
    pub fn generator<F, G>(ctor: F) -> Stream<T>
    where
        F: FnMut() -> G + 'static,
        G: FnMut() -> Option<T> + 'static,
    {
        Stream::new(Generator::new(ctor))
    }

    /// Create a stream from a cloneable foreign iterator.
    ///
    /// A copy of `iter` is kept so that the stream can be replayed.
    pub fn foreign<I>(iter: I) -> Stream<T>
    where
        I: Iterator<Item = T> + Clone + 'static,
    {
        Stream::new(Foreign::new(iter))
    }

    /// Returns true if and only if this stream reopens its source on every
    /// pass.
    pub fn is_deferred(&self) -> bool {
        match self.source {
            Source::Ready(_) => false,
            Source::Deferred { .. } => true,
        }
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Create a stream over an in-memory collection in ascending order.
    pub fn from_vec(items: Vec<T>) -> Stream<T> {
        Stream::new(Sequence::new(items))
    }
}

impl Stream<String> {
    /// Create a stream over the lines of a resource opened by `open`.
    ///
    /// `open` is called at the start of every pass, so each pass reads the
    /// resource from a fresh handle. Lines include their terminator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::io;
    ///
    /// use setstream::{Cursor, Stream};
    ///
    /// let mut stream = Stream::lines(|| {
    ///     Ok(io::Cursor::new(b"a\nb\n".to_vec()))
    /// });
    /// assert_eq!(stream.to_vec().unwrap(), vec!["a\n", "b\n"]);
    /// ```
    pub fn lines<F, R>(mut open: F) -> Stream<String>
    where
        F: FnMut() -> io::Result<R> + 'static,
        R: BufRead + Seek + 'static,
    {
        Stream::deferred(move || -> Result<Lines<R>> {
            Ok(Lines::new(open()?))
        })
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Stream<T> {
    fn from(items: Vec<T>) -> Stream<T> {
        Stream::from_vec(items)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Stream<T> {
    fn from_iter<I: IntoIterator<Item = T>>(it: I) -> Stream<T> {
        Stream::from_vec(it.into_iter().collect())
    }
}

impl<T> Cursor for Stream<T> {
    type Item = T;

    fn advance(&mut self) -> Result<Option<T>> {
        match self.source {
            Source::Ready(ref mut cursor) => cursor.advance(),
            Source::Deferred { ref mut build, ref mut live } => {
                if live.is_none() {
                    trace!(event = "realize", "building deferred cursor");
                    *live = Some((*build)()?);
                }
                match *live {
                    Some(ref mut cursor) => cursor.advance(),
                    None => Ok(None),
                }
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        match self.source {
            Source::Ready(ref mut cursor) => cursor.rewind(),
            Source::Deferred { ref mut live, .. } => {
                *live = None;
                Ok(())
            }
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Source::Ready(_) => f.debug_struct("Stream").finish(),
            Source::Deferred { ref live, .. } => f
                .debug_struct("Stream")
                .field("deferred", &true)
                .field("live", &live.is_some())
                .finish(),
        }
    }
}
