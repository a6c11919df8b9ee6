//! MySQL credentials from a `~/.my.cnf` style option file.
//!
//! Only `user` and `password` are read. Section headers and comments are
//! skipped, and a later value wins over an earlier one.

use std::path::{Path, PathBuf};

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::rest,
    sequence::{separated_pair, tuple},
    IResult,
};

use crate::error::{DefinerError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Read a credentials file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DefinerError::io(path, e))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut creds = Credentials::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(['#', ';', '[']) {
                continue;
            }
            let Ok((_, (key, value))) = option_line(line) else {
                continue;
            };
            let value = unquote(value.trim()).to_string();
            match key {
                "user" => creds.user = Some(value),
                "password" => creds.password = Some(value),
                _ => {}
            }
        }
        creds
    }

    /// Explicit values (flags / environment) take precedence over the file.
    pub fn with_overrides(mut self, user: Option<String>, password: Option<String>) -> Self {
        if user.is_some() {
            self.user = user;
        }
        if password.is_some() {
            self.password = password;
        }
        self
    }
}

/// `key = value`
fn option_line(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
        tuple((space0, char('='), space0)),
        rest,
    )(input)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// `<home>/.my.cnf`
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".my.cnf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_my_cnf() {
        let creds = Credentials::parse(
            "[client]\n\
             # local account\n\
             user = report\n\
             password=\"s3cr=t\"\n\
             host = 127.0.0.1\n",
        );
        assert_eq!(creds.user.as_deref(), Some("report"));
        assert_eq!(creds.password.as_deref(), Some("s3cr=t"));
    }

    #[test]
    fn test_exact_keys_only() {
        let creds = Credentials::parse("username = nope\npasswordless = nope\n");
        assert_eq!(creds, Credentials::default());
    }

    #[test]
    fn test_last_value_wins() {
        let creds = Credentials::parse("user = a\n[mysqldump]\nuser = b\n");
        assert_eq!(creds.user.as_deref(), Some("b"));
    }

    #[test]
    fn test_overrides() {
        let creds = Credentials::parse("user = file\npassword = file\n")
            .with_overrides(Some("flag".into()), None);
        assert_eq!(creds.user.as_deref(), Some("flag"));
        assert_eq!(creds.password.as_deref(), Some("file"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".my.cnf");
        std::fs::write(&path, "user=ops\n").unwrap();
        assert_eq!(
            Credentials::from_file(&path).unwrap().user.as_deref(),
            Some("ops")
        );
    }
}
