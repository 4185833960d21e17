//! Bitrank CLI: answer access/rank/select queries from a query file.
//!
//! The input file holds the query count on the first line, the bit string
//! on the second, then one query per line: `access <p>`, `rank <0|1> <p>`,
//! or `select <0|1> <i>`. Answers are written one decimal per line to the
//! output file (or stdout with `--console`), and a `RESULT` line with the
//! build+query time and the index footprint goes to stdout.
//!
//! Exit codes: 0 success, 1 no input path, 2 no output path, 3 input
//! unreadable, 4 output unwritable, 5 output directory uncreatable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use bitrank::BitVec;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "bitrank")]
#[command(about = "Succinct bit vector query tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file: query count, bit string, then one query per line
    input: Option<PathBuf>,

    /// Output file for the answers, one per line
    output: Option<PathBuf>,

    /// Print answers to stdout instead of an output file
    #[arg(long)]
    console: bool,

    /// Additionally report the query-only time in nanoseconds
    #[arg(long)]
    eval: bool,
}

/// A parsed query line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Query {
    Access(u64),
    Rank(bool, u64),
    Select(bool, u64),
}

/// The parsed input file: the bit string and the pre-parsed queries.
struct InputFile {
    bits: String,
    queries: Vec<Query>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(input) = cli.input else {
        eprintln!("Please provide the input file as the first argument.");
        return ExitCode::from(1);
    };
    if !cli.console && cli.output.is_none() {
        eprintln!("Please provide an output file as the second argument or pass --console.");
        return ExitCode::from(2);
    }
    let output = if cli.console { None } else { cli.output };

    let file = match load_input(&input) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Could not open file {}: {:#}", input.display(), err);
            return ExitCode::from(3);
        }
    };

    // Parse the payload before starting the timer; only index construction
    // and query answering are measured
    let bv = BitVec::from_ascii(file.bits.as_bytes());

    let build_start = Instant::now();
    let rv = bv.build_index();
    let query_start = Instant::now();

    let answers: Vec<u64> = file
        .queries
        .iter()
        .map(|&query| match query {
            Query::Access(p) if p < rv.len() => rv.access(p),
            Query::Access(_) => 0,
            Query::Rank(bit, p) => rv.rank(p, bit),
            Query::Select(bit, i) => rv.select(i, bit).unwrap_or(0),
        })
        .collect();

    let total = build_start.elapsed();
    let query_only = query_start.elapsed();

    if let Err(code) = write_answers(&answers, output.as_deref()) {
        return code;
    }

    println!("RESULT name=bitrank time={} space={}", total.as_millis(), rv.size_bits());
    if cli.eval {
        println!("EVAL query-only-time={}", query_only.as_nanos());
    }
    ExitCode::SUCCESS
}

/// Read and parse the input file.
///
/// The query count and bit string are assumed present; a malformed count
/// degrades to zero queries rather than aborting.
fn load_input(path: &Path) -> Result<InputFile> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let mut lines = text.lines();
    let count: usize = lines.next().map(|line| line.trim().parse().unwrap_or(0)).unwrap_or(0);
    let bits = lines.next().unwrap_or("").to_string();
    let queries = lines.take(count).map(parse_query).collect();

    Ok(InputFile { bits, queries })
}

/// Parse one query line.
///
/// Malformed lines degrade to the sentinel `access 0` instead of aborting
/// the run; a column of unexpected zeros makes the problem obvious.
fn parse_query(line: &str) -> Query {
    const SENTINEL: Query = Query::Access(0);

    // split_whitespace also strips the \r of Windows line endings
    let mut parts = line.split_whitespace();
    let (Some(cmd), Some(first)) = (parts.next(), parts.next()) else {
        return SENTINEL;
    };
    let second = parts.next();

    match cmd {
        "access" => first.parse().map_or(SENTINEL, Query::Access),
        "rank" | "select" => {
            let bit = match first {
                "0" => false,
                "1" => true,
                _ => return SENTINEL,
            };
            let Some(Ok(arg)) = second.map(str::parse) else {
                return SENTINEL;
            };
            if cmd == "rank" { Query::Rank(bit, arg) } else { Query::Select(bit, arg) }
        }
        _ => SENTINEL,
    }
}

/// Write one decimal answer per line to the output file (creating its
/// parent directory if needed) or to stdout.
fn write_answers(answers: &[u64], output: Option<&Path>) -> Result<(), ExitCode> {
    let Some(path) = output else {
        let stdout = std::io::stdout();
        let mut out = std::io::BufWriter::new(stdout.lock());
        for answer in answers {
            let _ = writeln!(out, "{}", answer);
        }
        return Ok(());
    };

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
        && let Err(err) = fs::create_dir_all(dir)
    {
        eprintln!("Could not create the directory {}: {}", dir.display(), err);
        return Err(ExitCode::from(5));
    }

    let file = match fs::File::create(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Could not open the output file {}: {}", path.display(), err);
            return Err(ExitCode::from(4));
        }
    };

    let mut out = std::io::BufWriter::new(file);
    let written = answers
        .iter()
        .try_for_each(|answer| writeln!(out, "{}", answer))
        .and_then(|()| out.flush());
    if let Err(err) = written {
        eprintln!("Could not write to {}: {}", path.display(), err);
        return Err(ExitCode::from(4));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_access() {
        assert_eq!(parse_query("access 17"), Query::Access(17));
        assert_eq!(parse_query("access 0"), Query::Access(0));
    }

    #[test]
    fn test_parse_query_rank_select() {
        assert_eq!(parse_query("rank 0 100"), Query::Rank(false, 100));
        assert_eq!(parse_query("rank 1 5"), Query::Rank(true, 5));
        assert_eq!(parse_query("select 1 42"), Query::Select(true, 42));
        assert_eq!(parse_query("select 0 1"), Query::Select(false, 1));
    }

    #[test]
    fn test_parse_query_windows_line_ending() {
        assert_eq!(parse_query("rank 1 5\r"), Query::Rank(true, 5));
        assert_eq!(parse_query("access 3\r"), Query::Access(3));
    }

    #[test]
    fn test_parse_query_malformed_is_sentinel() {
        assert_eq!(parse_query(""), Query::Access(0));
        assert_eq!(parse_query("access"), Query::Access(0));
        assert_eq!(parse_query("access x"), Query::Access(0));
        assert_eq!(parse_query("rank 2 5"), Query::Access(0));
        assert_eq!(parse_query("rank 1"), Query::Access(0));
        assert_eq!(parse_query("pick 1 5"), Query::Access(0));
        assert_eq!(parse_query("select 1 nope"), Query::Access(0));
    }

    #[test]
    fn test_load_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.txt");
        fs::write(&path, "3\n1000100010\naccess 0\nrank 1 5\nselect 0 7\n").unwrap();

        let file = load_input(&path).unwrap();
        assert_eq!(file.bits, "1000100010");
        assert_eq!(
            file.queries,
            vec![Query::Access(0), Query::Rank(true, 5), Query::Select(false, 7)]
        );
    }

    #[test]
    fn test_load_input_truncates_to_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.txt");
        fs::write(&path, "1\n10\naccess 0\naccess 1\n").unwrap();

        let file = load_input(&path).unwrap();
        assert_eq!(file.queries.len(), 1);
    }

    #[test]
    fn test_load_input_missing_file() {
        assert!(load_input(Path::new("/definitely/not/here.txt")).is_err());
    }
}
