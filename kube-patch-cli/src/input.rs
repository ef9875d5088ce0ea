//! Loading JSON inputs from files, standard input or the command line.

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Where a JSON input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
    Inline(String),
}

impl Source {
    /// Interpret a path argument; `-` means standard input.
    pub fn from_path(path: &str) -> Source {
        if path == "-" {
            Source::Stdin
        } else {
            Source::File(PathBuf::from(path))
        }
    }

    /// Pick the source given by either a path flag or an inline JSON flag.
    pub fn from_args(path: Option<&str>, inline_json: Option<&str>) -> Option<Source> {
        debug_assert!(
            path.is_none() || inline_json.is_none(),
            "path and inline JSON inputs are mutually exclusive"
        );
        match (path, inline_json) {
            (Some(p), _) => Some(Source::from_path(p)),
            (None, Some(j)) => Some(Source::Inline(j.to_owned())),
            (None, None) => None,
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, Source::Stdin)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(p) => write!(f, "{}", p.display()),
            Source::Stdin => f.write_str("<stdin>"),
            Source::Inline(_) => f.write_str("<inline JSON>"),
        }
    }
}

/// Standard input can only be consumed once.
pub fn check_single_stdin<'a>(sources: impl IntoIterator<Item = &'a Source>) -> Result<()> {
    let n = sources.into_iter().filter(|s| s.is_stdin()).count();
    if n > 1 {
        bail!("at most one input can be read from standard input (-), got {}", n);
    }
    Ok(())
}

/// Read and parse a JSON value of type `T`.
pub fn read_json<T: DeserializeOwned>(source: &Source) -> Result<T> {
    let r = match source {
        Source::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("Could not open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
        }
        Source::Stdin => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Could not read standard input")?;
            serde_json::from_str(&buf)
        }
        Source::Inline(json) => serde_json::from_str(json),
    };
    r.with_context(|| format!("Could not parse JSON from {}", source))
}

/// Read a JSON object, such as a map of labels.
pub fn read_json_object(source: &Source) -> Result<Map<String, Value>> {
    match read_json::<Value>(source)? {
        Value::Object(m) => Ok(m),
        other => bail!(
            "Expected a JSON object in {}, got: {}",
            source,
            serde_json::to_string(&other)?
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_path() {
        assert_eq!(Source::from_path("-"), Source::Stdin);
        assert_eq!(
            Source::from_path("labels.json"),
            Source::File(PathBuf::from("labels.json"))
        );
    }

    #[test]
    fn test_from_args() {
        assert_eq!(Source::from_args(None, None), None);
        assert_eq!(
            Source::from_args(None, Some("{}")),
            Some(Source::Inline("{}".to_owned()))
        );
        assert_eq!(
            Source::from_args(Some("a.json"), None),
            Some(Source::File(PathBuf::from("a.json")))
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mutually exclusive")]
    fn test_from_args_both() {
        Source::from_args(Some("a.json"), Some("{}"));
    }

    #[test]
    fn test_check_single_stdin() {
        let file = Source::from_path("a.json");
        assert!(check_single_stdin([&Source::Stdin, &file]).is_ok());
        assert!(check_single_stdin([&Source::Stdin, &Source::Stdin]).is_err());
    }

    #[test]
    fn test_read_json_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(br#"{"app": "web", "tier": "frontend"}"#)
            .unwrap();
        drop(file);

        let m = read_json_object(&Source::File(path)).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["app"], Value::String("web".to_owned()));
    }

    #[test]
    fn test_read_json_object_inline() {
        let m = read_json_object(&Source::Inline(r#"{"a": "1"}"#.to_owned())).unwrap();
        assert_eq!(m["a"], Value::String("1".to_owned()));
    }

    #[test]
    fn test_read_json_object_not_an_object() {
        let r = read_json_object(&Source::Inline("[1, 2]".to_owned()));
        assert!(r.is_err());
    }

    #[test]
    fn test_read_json_invalid() {
        let r = read_json::<Value>(&Source::Inline("{".to_owned()));
        let msg = format!("{:#}", r.unwrap_err());
        assert!(msg.contains("<inline JSON>"), "{}", msg);
    }

    #[test]
    fn test_read_json_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let r = read_json::<Value>(&Source::File(dir.path().join("missing.json")));
        assert!(r.is_err());
    }
}
