//! Input commands.

use core::str::FromStr;

use scanstock_core::{AdjustKind, DocId, DocPatch, DomainError};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A scan completed with `code`.
    Scan(String),
    /// Replace the amount buffer.
    Amount(String),
    /// Adjust by the given amount, or by the buffered one.
    Adjust(AdjustKind, Option<String>),
    /// Pull-to-refresh.
    Refresh,
    /// Dismiss the error notification.
    Dismiss,
    /// Change the cartridge server endpoint.
    Server(String),
    /// Fetch document rows.
    Docs(DocId),
    /// Change one field of a document.
    DocSet(DocPatch),
    Show,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match head.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "scan" => arg.map(Command::Scan).ok_or(CommandError::MissingArgument("scan")),
            "amount" => Ok(Command::Amount(rest.to_string())),
            "add" | "+" => Ok(Command::Adjust(AdjustKind::Add, arg)),
            "sub" | "-" => Ok(Command::Adjust(AdjustKind::Sub, arg)),
            "refresh" => Ok(Command::Refresh),
            "dismiss" => Ok(Command::Dismiss),
            "server" => arg
                .map(Command::Server)
                .ok_or(CommandError::MissingArgument("server")),
            "docs" => {
                let raw = arg.ok_or(CommandError::MissingArgument("docs"))?;
                parse_doc_id(&raw).map(Command::Docs)
            }
            "doc-set" => parse_doc_set(rest).map(Command::DocSet),
            "show" => Ok(Command::Show),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_doc_id(raw: &str) -> Result<DocId, CommandError> {
    raw.parse()
        .map_err(|e: DomainError| CommandError::InvalidArgument(e.to_string()))
}

/// `<id> <field> <json value>`; a value that is not JSON is taken as a string.
fn parse_doc_set(rest: &str) -> Result<DocPatch, CommandError> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let (Some(id), Some(field), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CommandError::MissingArgument("doc-set"));
    };
    let id = parse_doc_id(id)?;
    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok(DocPatch::new(id).set(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scan_with_spaces_in_code() {
        assert_eq!(
            "scan  CRT 001 ".parse::<Command>().unwrap(),
            Command::Scan("CRT 001".to_string())
        );
    }

    #[test]
    fn adjust_takes_optional_amount() {
        assert_eq!(
            "add 3".parse::<Command>().unwrap(),
            Command::Adjust(AdjustKind::Add, Some("3".to_string()))
        );
        assert_eq!("-".parse::<Command>().unwrap(), Command::Adjust(AdjustKind::Sub, None));
    }

    #[test]
    fn amount_may_be_cleared() {
        assert_eq!("amount".parse::<Command>().unwrap(), Command::Amount(String::new()));
    }

    #[test]
    fn doc_set_builds_a_patch() {
        assert_eq!(
            "doc-set 12 signed true".parse::<Command>().unwrap(),
            Command::DocSet(DocPatch::new(DocId::new(12)).set("signed", true))
        );
        assert_eq!(
            "doc-set 12 title Act 12".parse::<Command>().unwrap(),
            Command::DocSet(DocPatch::new(DocId::new(12)).set("title", "Act 12"))
        );
        assert_eq!(
            "doc-set 12 title".parse::<Command>(),
            Err(CommandError::MissingArgument("doc-set"))
        );
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("scan".parse::<Command>(), Err(CommandError::MissingArgument("scan")));
        assert!(matches!("docs x".parse::<Command>(), Err(CommandError::InvalidArgument(_))));
        assert_eq!(
            "fly".parse::<Command>(),
            Err(CommandError::Unknown("fly".to_string()))
        );
    }
}
