//! Parsers for the MovieLens 100k data files.
//!
//! Two file formats are involved:
//! - `u.data`: tab-separated `user_id \t item_id \t rating \t timestamp`
//! - `u.item`: pipe-separated `item_id | title | ...metadata`
//!
//! `u.item` is ISO-8859-1 encoded (accented titles), so it is read as
//! bytes and widened to UTF-8 before splitting.

use crate::error::{DataError, Result};
use crate::types::{Movie, Rating};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a file with ISO-8859-1 (Latin-1) encoding into lines.
///
/// ISO-8859-1 is a single-byte encoding where each byte maps directly to
/// the Unicode code point of the same value, so the conversion is a
/// straight widening of each byte.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|_| DataError::FileNotFound {
        path: path.display().to_string(),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    file: &str,
    line: usize,
    field: &str,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| DataError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", field, e),
    })
}

/// Parse the `u.data` ratings file.
///
/// Every row must carry exactly four tab-separated fields and a rating in
/// the 1-5 range; anything else is a fatal `DataError`.
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file_name = "u.data";
    let lines = read_lines_latin1(path)?;
    let mut ratings = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() != 4 {
            return Err(DataError::ParseError {
                file: file_name.to_string(),
                line: line_no,
                reason: format!("Expected 4 fields, found {}", fields.len()),
            });
        }

        let rating = Rating {
            user_id: parse_field(fields[0], file_name, line_no, "user_id")?,
            item_id: parse_field(fields[1], file_name, line_no, "item_id")?,
            rating: parse_field(fields[2], file_name, line_no, "rating")?,
            timestamp: parse_field(fields[3], file_name, line_no, "timestamp")?,
        };

        if !(1..=5).contains(&rating.rating) {
            return Err(DataError::InvalidValue {
                field: "rating".to_string(),
                value: rating.rating.to_string(),
            });
        }

        ratings.push(rating);
    }

    Ok(ratings)
}

/// Parse the `u.item` movie file.
///
/// Only the first two fields (id, title) are kept; release dates, the IMDb
/// URL and the 19 genre flags are not used by the pipeline.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file_name = "u.item";
    let lines = read_lines_latin1(path)?;
    let mut movies = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split('|');
        let item_id = parts.next().ok_or_else(|| DataError::ParseError {
            file: file_name.to_string(),
            line: line_no,
            reason: "Missing item_id".to_string(),
        })?;
        let title = parts.next().ok_or_else(|| DataError::ParseError {
            file: file_name.to_string(),
            line: line_no,
            reason: "Missing title".to_string(),
        })?;

        movies.push(Movie {
            id: parse_field(item_id, file_name, line_no, "item_id")?,
            title: title.to_string(),
        });
    }

    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ml100k-parser-{}-{}", std::process::id(), name));
        let mut f = File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn parses_tab_separated_ratings() {
        let path = write_temp("ratings-ok", b"196\t242\t3\t881250949\n186\t302\t3\t891717742\n");
        let ratings = parse_ratings(&path).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].user_id, 196);
        assert_eq!(ratings[0].item_id, 242);
        assert_eq!(ratings[0].rating, 3);
        assert_eq!(ratings[1].timestamp, 891717742);
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let path = write_temp("ratings-range", b"1\t1\t6\t0\n");
        let err = parse_ratings(&path).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_short_rating_row() {
        let path = write_temp("ratings-short", b"1\t1\t5\n");
        let err = parse_ratings(&path).unwrap_err();
        assert!(matches!(err, DataError::ParseError { line: 1, .. }));
    }

    #[test]
    fn parses_pipe_separated_movies_keeping_id_and_title() {
        let path = write_temp(
            "movies-ok",
            b"1|Toy Story (1995)|01-Jan-1995||http://us.imdb.com/|0|0|0|1\n2|GoldenEye (1995)|01-Jan-1995||http://us.imdb.com/|0|1|1|0\n",
        );
        let movies = parse_movies(&path).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 1);
        assert_eq!(movies[0].title, "Toy Story (1995)");
        assert_eq!(movies[1].title, "GoldenEye (1995)");
    }

    #[test]
    fn decodes_latin1_titles() {
        // "Les Misérables" with é as the single ISO-8859-1 byte 0xE9
        let path = write_temp("movies-latin1", b"7|Les Mis\xe9rables (1995)|x\n");
        let movies = parse_movies(&path).unwrap();
        assert_eq!(movies[0].title, "Les Mis\u{e9}rables (1995)");
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let err = parse_ratings(Path::new("/nonexistent/u.data")).unwrap_err();
        assert!(matches!(err, DataError::FileNotFound { .. }));
    }
}
