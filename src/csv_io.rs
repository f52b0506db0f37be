use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::error::BtError;

//-------------------------------------------------------------------------

/// Reads a two-column `key,value` text file into pairs. Non-empty lines
/// must split on `,` into exactly two unsigned 64-bit integer fields; any
/// other shape is a fatal error that names the offending line.
pub fn load_pairs(path: impl AsRef<Path>) -> Result<Vec<(u64, u64)>, BtError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BtError::FileNotFound(path.display().to_string()),
        _ => BtError::Io(e),
    })?;

    let mut pairs = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        pairs.push(parse_pair(path, lineno + 1, &line)?);
    }
    Ok(pairs)
}

fn parse_pair(path: &Path, lineno: usize, line: &str) -> Result<(u64, u64), BtError> {
    let malformed = |reason: &str| BtError::MalformedLine {
        path: path.display().to_string(),
        line: lineno,
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 2 {
        return Err(malformed("expected exactly two comma-separated fields"));
    }
    let key = fields[0]
        .trim()
        .parse::<u64>()
        .map_err(|_| malformed("key is not an unsigned 64-bit integer"))?;
    let value = fields[1]
        .trim()
        .parse::<u64>()
        .map_err(|_| malformed("value is not an unsigned 64-bit integer"))?;
    Ok((key, value))
}

/// Writes `key,value` pairs, one per line. Fails if the output file
/// already exists.
pub fn write_pairs(path: impl AsRef<Path>, pairs: &[(u64, u64)]) -> Result<(), BtError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => BtError::FileExists(path.display().to_string()),
            _ => BtError::Io(e),
        })?;

    let mut w = BufWriter::new(file);
    for (k, v) in pairs {
        writeln!(w, "{},{}", k, v)?;
    }
    w.flush()?;
    Ok(())
}

//-------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn scratch_path() -> std::path::PathBuf {
        let f = NamedTempFile::new().unwrap();
        let path = f.path().to_path_buf();
        drop(f);
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn loads_well_formed_pairs_and_skips_blank_lines() {
        let path = scratch_path();
        std::fs::write(&path, "5,50\n3,30\n\n8,80\n").unwrap();
        let pairs = load_pairs(&path).unwrap();
        assert_eq!(pairs, vec![(5, 50), (3, 30), (8, 80)]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let path = scratch_path();
        std::fs::write(&path, "1,2,3\n").unwrap();
        assert!(matches!(
            load_pairs(&path),
            Err(BtError::MalformedLine { line: 1, .. })
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_non_integer_field() {
        let path = scratch_path();
        std::fs::write(&path, "1,abc\n").unwrap();
        assert!(matches!(
            load_pairs(&path),
            Err(BtError::MalformedLine { line: 1, .. })
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_fails_if_file_missing() {
        let path = scratch_path();
        assert!(matches!(load_pairs(&path), Err(BtError::FileNotFound(_))));
    }

    #[test]
    fn write_then_load_round_trips() {
        let path = scratch_path();
        let pairs = vec![(1, 10), (2, 20), (3, 30)];
        write_pairs(&path, &pairs).unwrap();
        let back = load_pairs(&path).unwrap();
        assert_eq!(back, pairs);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn write_fails_if_output_exists() {
        let path = scratch_path();
        write_pairs(&path, &[(1, 1)]).unwrap();
        assert!(matches!(
            write_pairs(&path, &[(2, 2)]),
            Err(BtError::FileExists(_))
        ));
        let _ = std::fs::remove_file(&path);
    }
}
