//! Parsing the plain-text input files of an enrichment run
//!
//! There are two formats:
//!
//! - **id lists**: one identifier per line. Used for the target genes,
//!   the background genes and the GO terms.
//! - **pair lists**: two whitespace separated identifiers per line. Used for
//!   term-to-term edges (`child<TAB>parent`) and for gene-to-term mappings
//!   (`gene<TAB>term`).
//!
//! Blank lines are ignored in both formats. A non-blank line of a pair list
//! that does not contain exactly two tokens is a fatal error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::{GoError, GoResult};

/// Opens a file for buffered line-based reading
fn open<P: AsRef<Path>>(path: P) -> GoResult<BufReader<File>> {
    let filename = path.as_ref().display().to_string();
    let file =
        File::open(path).map_err(|err| GoError::CannotOpenFile(format!("{filename}: {err}")))?;
    Ok(BufReader::new(file))
}

/// Iterates all non-blank lines, with their 1-based line number
fn lines<'a, R: BufRead + 'a>(
    reader: R,
    source_name: &'a str,
) -> impl Iterator<Item = GoResult<(usize, String)>> + 'a {
    reader
        .lines()
        .enumerate()
        .filter_map(move |(idx, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(Ok((idx + 1, line))),
            Err(err) => Some(Err(GoError::CannotReadLine {
                source_name: source_name.to_string(),
                line_number: idx + 1,
                reason: err.to_string(),
            })),
        })
}

/// Parses a single line of a pair list
///
/// ```text
/// GO:0000001  GO:0000002
/// ```
fn pair_line(line: &str, line_number: usize, source_name: &str) -> GoResult<(String, String)> {
    let mut cols = line.split_whitespace();
    match (cols.next(), cols.next(), cols.next()) {
        (Some(left), Some(right), None) => Ok((left.to_string(), right.to_string())),
        _ => Err(GoError::MalformedLine {
            source_name: source_name.to_string(),
            line_number,
            line: line.to_string(),
        }),
    }
}

/// Reads a line-delimited list of identifiers
///
/// Surrounding whitespace is removed and blank lines are skipped.
///
/// # Errors
///
/// Returns [`GoError::CannotReadLine`] if the reader fails
///
/// # Examples
///
/// ```
/// use go_enrich::parser::id_list;
///
/// let ids = id_list("geneA\n\n geneB \n".as_bytes(), "genes").unwrap();
/// assert_eq!(ids, vec!["geneA".to_string(), "geneB".to_string()]);
/// ```
pub fn id_list<R: BufRead>(reader: R, source_name: &str) -> GoResult<Vec<String>> {
    let ids = lines(reader, source_name)
        .map(|line| line.map(|(_, line)| line.trim().to_string()))
        .collect::<GoResult<Vec<String>>>()?;
    debug!("Read {} ids from {}", ids.len(), source_name);
    Ok(ids)
}

/// Reads a list of whitespace separated identifier pairs
///
/// # Errors
///
/// - [`GoError::MalformedLine`] if a non-blank line does not contain exactly two tokens
/// - [`GoError::CannotReadLine`] if the reader fails
///
/// # Examples
///
/// ```
/// use go_enrich::parser::pair_list;
/// use go_enrich::GoError;
///
/// let pairs = pair_list("A\tB\nB C\n".as_bytes(), "edges").unwrap();
/// assert_eq!(pairs[1], ("B".to_string(), "C".to_string()));
///
/// let err = pair_list("A\tB\nX\n".as_bytes(), "edges").unwrap_err();
/// assert!(matches!(err, GoError::MalformedLine { line_number: 2, .. }));
/// ```
pub fn pair_list<R: BufRead>(reader: R, source_name: &str) -> GoResult<Vec<(String, String)>> {
    let pairs = lines(reader, source_name)
        .map(|line| line.and_then(|(number, line)| pair_line(&line, number, source_name)))
        .collect::<GoResult<Vec<(String, String)>>>()?;
    debug!("Read {} pairs from {}", pairs.len(), source_name);
    Ok(pairs)
}

/// Reads a line-delimited list of identifiers from a file
///
/// # Errors
///
/// - [`GoError::CannotOpenFile`] if the file cannot be opened
/// - [`GoError::CannotReadLine`] if a line cannot be read
pub fn id_list_from_path<P: AsRef<Path>>(path: P) -> GoResult<Vec<String>> {
    let source_name = path.as_ref().display().to_string();
    id_list(open(path)?, &source_name)
}

/// Reads a list of whitespace separated identifier pairs from a file
///
/// # Errors
///
/// - [`GoError::CannotOpenFile`] if the file cannot be opened
/// - [`GoError::CannotReadLine`] if a line cannot be read
/// - [`GoError::MalformedLine`] if a line does not contain exactly two tokens
pub fn pair_list_from_path<P: AsRef<Path>>(path: P) -> GoResult<Vec<(String, String)>> {
    let source_name = path.as_ref().display().to_string();
    pair_list(open(path)?, &source_name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn id_list_skips_blank_lines() {
        let ids = id_list("a\n\n  \nb\r\nc".as_bytes(), "test").unwrap();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn id_list_keeps_duplicates() {
        let ids = id_list("a\na\n".as_bytes(), "test").unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn pair_list_tabs_and_spaces() {
        let pairs = pair_list("g1\tGO:1\ng2   GO:2\n\n".as_bytes(), "test").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("g1".to_string(), "GO:1".to_string()),
                ("g2".to_string(), "GO:2".to_string())
            ]
        );
    }

    #[test]
    fn single_token_line_is_an_error() {
        let err = pair_list("A B\nX\n".as_bytes(), "edges.txt").unwrap_err();
        match err {
            GoError::MalformedLine {
                source_name,
                line_number,
                line,
            } => {
                assert_eq!(source_name, "edges.txt");
                assert_eq!(line_number, 2);
                assert_eq!(line, "X");
            }
            other => panic!("invalid error {other}"),
        }
    }

    #[test]
    fn three_token_line_is_an_error() {
        let err = pair_list("A B C\n".as_bytes(), "mapping").unwrap_err();
        assert!(err.to_string().contains("\"A B C\""));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            id_list_from_path("tests/data/does_not_exist.txt"),
            Err(GoError::CannotOpenFile(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let bytes: &[u8] = b"geneA\n\xff\xfe\n";
        match id_list(bytes, "genes") {
            Err(GoError::CannotReadLine {
                source_name,
                line_number,
                ..
            }) => {
                assert_eq!(source_name, "genes");
                assert_eq!(line_number, 2);
            }
            other => panic!("invalid result {other:?}"),
        }

        let bytes: &[u8] = b"A\tB\n\xffX\tC\n";
        assert!(matches!(
            pair_list(bytes, "edges"),
            Err(GoError::CannotReadLine { line_number: 2, .. })
        ));
    }

    #[test]
    fn fixture_files() {
        let terms = id_list_from_path("tests/data/go_terms.txt").unwrap();
        assert_eq!(terms.len(), 7);
        assert_eq!(terms[0], "GO:0008150");
        let edges = pair_list_from_path("tests/data/go_edges.txt").unwrap();
        assert_eq!(edges.len(), 7);
        assert_eq!(
            edges[0],
            ("GO:0009987".to_string(), "GO:0008150".to_string())
        );
    }
}
