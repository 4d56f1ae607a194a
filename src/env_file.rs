use std::env;
use std::fs;
use std::io;
use std::path::Path;

/// Default location of the local key=value file, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Variable that points the loader at a different file.
pub const ENV_FILE_VAR: &str = "ENV_FILE";

/// Outcome of one [`load_env_file`] pass.
///
/// Nothing is logged while loading since the logger is not up yet;
/// `main` reports the skipped lines once it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFileReport {
    pub found: bool,
    pub applied: Vec<String>,
    pub kept_from_env: Vec<String>,
    pub malformed: Vec<String>,
}

/// Resolve which file to load: `ENV_FILE` when set, `.env` otherwise.
pub fn env_file_path() -> String {
    env::var(ENV_FILE_VAR).unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string())
}

/// Split one line into `(key, value)`.
///
/// Everything after the first `=` is the value, trimmed and otherwise kept
/// as written: no unquoting, no `$VAR` expansion, no inline comments.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Copy `KEY=VALUE` lines from `path` into the process environment.
///
/// Precedence rule: the environment overrides the file. A key that is
/// already set is left untouched and reported in `kept_from_env`.
/// Blank lines and `#` comments are ignored, lines without a `=` or with an
/// empty key are collected in `malformed` and skipped. A missing file yields
/// an empty report, not an error.
pub fn load_env_file(path: impl AsRef<Path>) -> io::Result<EnvFileReport> {
    let contents = match fs::read_to_string(path.as_ref()) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(EnvFileReport::default()),
        Err(e) => return Err(e),
    };

    let mut report = EnvFileReport {
        found: true,
        ..Default::default()
    };

    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = parse_line(line) else {
            report.malformed.push(line.to_string());
            continue;
        };

        if env::var_os(key).is_some() {
            report.kept_from_env.push(key.to_string());
            continue;
        }
        env::set_var(key, value);
        report.applied.push(key.to_string());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_env(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let report = load_env_file("/definitely/not/here/.env").unwrap();
        assert!(!report.found);
        assert!(report.applied.is_empty());
    }

    #[test]
    fn applies_entries_and_skips_comments() {
        let file = write_env("# demo settings\n\nIMAGELAB_TEST_ALPHA=one\r\n  # indented\nIMAGELAB_TEST_BETA=two\n");

        let report = load_env_file(file.path()).unwrap();

        assert!(report.found);
        assert_eq!(env::var("IMAGELAB_TEST_ALPHA").unwrap(), "one");
        assert_eq!(env::var("IMAGELAB_TEST_BETA").unwrap(), "two");
        assert_eq!(report.applied.len(), 2);
        assert!(report.malformed.is_empty());
    }

    #[test]
    fn values_are_kept_as_written() {
        let file = write_env(concat!(
            "IMAGELAB_TEST_SPACES=two words\n",
            "IMAGELAB_TEST_DOLLAR=ab$HOME\n",
            "IMAGELAB_TEST_HASH=abc #x\n",
            "IMAGELAB-TEST-DASH=1\n",
            "IMAGELAB_TEST_PAD =   padded   \n",
            "IMAGELAB_TEST_EQUALS=a=b\n",
            "IMAGELAB_TEST_QUOTED=\"quoted\"\n",
            "IMAGELAB_TEST_EMPTY=\n",
        ));

        let report = load_env_file(file.path()).unwrap();

        assert!(report.malformed.is_empty(), "{:?}", report.malformed);
        assert_eq!(report.applied.len(), 8);
        assert_eq!(env::var("IMAGELAB_TEST_SPACES").unwrap(), "two words");
        assert_eq!(env::var("IMAGELAB_TEST_DOLLAR").unwrap(), "ab$HOME");
        assert_eq!(env::var("IMAGELAB_TEST_HASH").unwrap(), "abc #x");
        assert_eq!(env::var("IMAGELAB-TEST-DASH").unwrap(), "1");
        assert_eq!(env::var("IMAGELAB_TEST_PAD").unwrap(), "padded");
        assert_eq!(env::var("IMAGELAB_TEST_EQUALS").unwrap(), "a=b");
        assert_eq!(env::var("IMAGELAB_TEST_QUOTED").unwrap(), "\"quoted\"");
        assert_eq!(env::var("IMAGELAB_TEST_EMPTY").unwrap(), "");
    }

    #[test]
    fn environment_wins_over_file() {
        env::set_var("IMAGELAB_TEST_PRESET", "from-env");
        let file = write_env("IMAGELAB_TEST_PRESET=from-file\n");

        let report = load_env_file(file.path()).unwrap();

        assert_eq!(env::var("IMAGELAB_TEST_PRESET").unwrap(), "from-env");
        assert_eq!(report.kept_from_env, vec!["IMAGELAB_TEST_PRESET".to_string()]);
    }

    #[test]
    fn lines_without_equals_or_key_are_skipped() {
        let file = write_env("JUST_A_WORD\n=orphan\nIMAGELAB_TEST_GAMMA=3\n");

        let report = load_env_file(file.path()).unwrap();

        assert_eq!(
            report.malformed,
            vec!["JUST_A_WORD".to_string(), "=orphan".to_string()]
        );
        assert_eq!(env::var("IMAGELAB_TEST_GAMMA").unwrap(), "3");
        assert!(env::var("JUST_A_WORD").is_err());
    }
}
