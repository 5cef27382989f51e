//! Check command: filter document paths against the git tree at a commit.

use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::existence::PathExistenceChecker;

/// Arguments for the check command.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub repository_id: i64,
    pub commit: String,
    pub root: String,
    pub frontend_url: Option<String>,
    pub allow_outside_root: bool,
    pub show_dropped: bool,
    pub input: PathBuf,
}

/// Paths split by the checker's verdict, in input order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub kept: Vec<String>,
    pub dropped: Vec<String>,
}

pub async fn run(args: CheckArgs, settings: &Settings) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(url) = args.frontend_url.clone() {
        settings.gitserver.frontend_url = Some(url);
    }

    let paths = read_paths(&args.input)?;

    let mut checker =
        PathExistenceChecker::from_settings(&settings, args.repository_id, &args.commit, &args.root)
            .context("Failed to create gitserver client")?;
    if checker.is_pass_through() {
        tracing::warn!("No frontend url configured, every path is assumed to exist");
    }

    let stats = checker
        .warm_cache(&paths)
        .await
        .with_context(|| format!("Failed to check paths at commit {}", args.commit))?;

    crate::log_event!(
        "check",
        "warmed",
        "{} directories cached for {} paths",
        checker.cached_directories().count(),
        paths.len()
    );

    let partition = partition(&checker, &paths, !args.allow_outside_root);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in &partition.kept {
        writeln!(out, "{path}")?;
    }
    out.flush()?;

    if args.show_dropped {
        for path in &partition.dropped {
            eprintln!("dropped: {path}");
        }
    }

    eprintln!(
        "kept {} of {} paths ({} rounds, {} lookups)",
        partition.kept.len(),
        paths.len(),
        stats.rounds,
        stats.lookups
    );

    Ok(())
}

/// Split `paths` into those the checker includes and those it drops.
pub fn partition(
    checker: &PathExistenceChecker,
    paths: &[String],
    require_within_root: bool,
) -> Partition {
    let mut result = Partition::default();
    for path in paths {
        if checker.should_include_path(path, require_within_root) {
            result.kept.push(path.clone());
        } else {
            result.dropped.push(path.clone());
        }
    }
    result
}

/// Read one document path per line from a file, or stdin for `-`.
fn read_paths(input: &Path) -> Result<Vec<String>> {
    if input == Path::new("-") {
        return parse_paths(io::stdin().lock());
    }

    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    parse_paths(BufReader::new(file))
}

fn parse_paths(reader: impl BufRead) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read paths")?;
        let path = line.trim();
        if !path.is_empty() {
            paths.push(path.to_string());
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_paths_skips_blank_lines() {
        let input = Cursor::new("a/x.ts\n\n  b/y.ts  \r\n\n");
        let paths = parse_paths(input).unwrap();
        assert_eq!(paths, vec!["a/x.ts", "b/y.ts"]);
    }

    #[test]
    fn test_partition_pass_through_drops_outside_root() {
        let checker = PathExistenceChecker::new(1, "deadbeef", "src");
        let paths = vec!["a/x.ts".to_string(), "../lib/y.ts".to_string()];

        let strict = partition(&checker, &paths, true);
        assert_eq!(strict.kept, vec!["a/x.ts"]);
        assert_eq!(strict.dropped, vec!["../lib/y.ts"]);

        let lenient = partition(&checker, &paths, false);
        assert_eq!(lenient.kept.len(), 2);
        assert!(lenient.dropped.is_empty());
    }

    #[test]
    fn test_read_paths_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file = temp_dir.path().join("paths.txt");
        std::fs::write(&file, "one.ts\ntwo/three.ts\n").unwrap();

        assert_eq!(read_paths(&file).unwrap(), vec!["one.ts", "two/three.ts"]);
        assert!(read_paths(&temp_dir.path().join("missing.txt")).is_err());
    }
}
