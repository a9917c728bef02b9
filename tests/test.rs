use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use setstream::adapter::{Foreign, Lines};
use setstream::{CombiningStream, Cursor, Error, OpBuilder, Stream};

const SETS: [&[&str]; 4] = [
    &["a", "c", "m", "q"],
    &["c", "m"],
    &["c", "l", "m", "n", "x", "z"],
    &["b", "c", "m", "w", "z"],
];

fn mem(items: &[&str]) -> Stream<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn write_lines(items: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for item in items {
        writeln!(file, "{}", item).unwrap();
    }
    file.flush().unwrap();
    file
}

fn file_stream(path: PathBuf) -> Stream<String> {
    Stream::lines(move || File::open(&path).map(BufReader::new))
}

fn chomp(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().map(|line| line.trim_end_matches('\n').to_string()).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn expression(s: Vec<Stream<String>>) -> CombiningStream<String> {
    let mut it = s.into_iter();
    let (s1, s2, s3, s4) = (
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
        it.next().unwrap(),
    );
    s1.union(s2).union(s3).intersect(s4)
}

#[test]
fn files_and_memory_agree() {
    let files: Vec<NamedTempFile> =
        SETS.iter().map(|set| write_lines(set)).collect();
    let from_files = files
        .iter()
        .map(|file| file_stream(file.path().to_path_buf()))
        .collect();
    let from_memory = SETS.iter().map(|set| mem(set)).collect();

    let mut on_disk = expression(from_files);
    let mut in_memory = expression(from_memory);
    let want = strings(&["c", "m", "z"]);
    assert_eq!(in_memory.to_vec().unwrap(), want);
    assert_eq!(chomp(on_disk.to_vec().unwrap()), want);
    // Every pass reopens the files.
    assert_eq!(chomp(on_disk.to_vec().unwrap()), want);
}

#[test]
fn every_operator_over_files() {
    let files: Vec<NamedTempFile> =
        SETS.iter().map(|set| write_lines(set)).collect();
    let builder = || -> OpBuilder<String> {
        files
            .iter()
            .map(|file| file_stream(file.path().to_path_buf()))
            .collect()
    };

    let got = chomp(builder().intersection().to_vec().unwrap());
    assert_eq!(got, strings(&["c", "m"]));

    let got = chomp(builder().union().to_vec().unwrap());
    assert_eq!(got, strings(&["a", "b", "c", "l", "m", "n", "q", "w", "x", "z"]));

    let got = chomp(builder().sum().to_vec().unwrap());
    assert_eq!(got.len(), 17);
    assert_eq!(got.iter().filter(|s| *s == "c").count(), 4);

    let got = chomp(builder().exclusive_one().to_vec().unwrap());
    assert_eq!(got, strings(&["a", "b", "l", "n", "q", "w", "x"]));
}

#[test]
fn reopened_file_has_every_line() {
    let items: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    let refs: Vec<&str> = items.iter().map(|s| s.as_str()).collect();
    let file = write_lines(&refs);
    let mut stream = file_stream(file.path().to_path_buf());
    assert_eq!(stream.to_vec().unwrap().len(), 10);
    assert_eq!(stream.to_vec().unwrap().len(), 10);
}

#[test]
fn open_handle_is_rewound_by_seeking() {
    let file = write_lines(&["a", "b", "c"]);
    let mut handle = File::open(file.path()).unwrap();
    handle.seek(SeekFrom::Start(2)).unwrap();
    let mut stream = Stream::new(Lines::new(BufReader::new(handle)));
    assert_eq!(chomp(stream.to_vec().unwrap()), strings(&["b", "c"]));
    assert_eq!(chomp(stream.to_vec().unwrap()), strings(&["b", "c"]));
}

#[test]
fn missing_file_is_a_source_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let mut expr = mem(&["a"]).union(file_stream(missing));
    match expr.advance() {
        Err(Error::Io(_)) => {}
        got => panic!("expected an I/O error, got {:?}", got),
    }
}

#[test]
fn lazy_over_infinite_generators() {
    fn multiples_of(k: u64) -> Stream<u64> {
        Stream::generator(move || {
            let mut n = 0;
            move || {
                n += k;
                Some(n)
            }
        })
    }
    let edges = Stream::generator(|| {
        let mut it = vec![0, 100].into_iter();
        move || it.next()
    });
    let mut expr = edges.union(multiples_of(3).intersect(multiples_of(5)));
    let want = vec![0, 15, 30, 45, 60, 75, 90, 100, 105, 120];
    assert_eq!(expr.take(10).unwrap(), want);
    assert_eq!(expr.take(10).unwrap(), want);

    let mut seen = vec![];
    for item in expr.iter().take(3) {
        seen.push(item.unwrap());
    }
    assert_eq!(seen, vec![0, 15, 30]);
}

#[test]
fn single_pass_iterator_cannot_replay() {
    let once = Stream::new(Foreign::once(vec![1, 2, 3].into_iter()));
    let mut expr = once.union(Stream::from_vec(vec![2, 4]));
    assert_eq!(expr.to_vec().unwrap(), vec![1, 2, 3, 4]);
    match expr.to_vec() {
        Err(Error::Unrewindable) => {}
        got => panic!("expected Unrewindable, got {:?}", got),
    }
}

#[test]
fn strict_advance() {
    let mut expr = mem(&["a", "b"]).intersect(mem(&["b"]));
    assert_eq!(expr.advance_strict().unwrap(), "b");
    match expr.advance_strict() {
        Err(Error::PastEnd) => {}
        got => panic!("expected PastEnd, got {:?}", got),
    }
}

#[test]
fn for_each_callback() {
    let mut expr = mem(&["a", "c"]).sum_merge(mem(&["b", "c"]));
    let mut seen = vec![];
    expr.for_each(|s| seen.push(s)).unwrap();
    assert_eq!(seen, strings(&["a", "b", "c", "c"]));
}
