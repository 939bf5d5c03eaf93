//! Shared CLI utilities.

use crate::domain::OutputFormat;
use anyhow::Result;

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

pub fn parse_output_format(value: &Option<String>) -> Result<Option<OutputFormat>> {
    match value {
        None => Ok(None),
        Some(raw) => match OutputFormat::parse(raw) {
            Some(format) => Ok(Some(format)),
            None => anyhow::bail!(
                "Invalid output format: {}. Expected one of: markdown, xml, json, plain",
                raw
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_trims_and_drops_empty() {
        let parsed = parse_csv(&Some(" a, ,b ,".to_string()));
        assert_eq!(parsed, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(parse_csv(&None), None);
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format(&Some("XML".to_string())).expect("xml"), Some(OutputFormat::Xml));
        assert_eq!(parse_output_format(&None).expect("none"), None);
        let err = parse_output_format(&Some("yaml".to_string())).unwrap_err();
        assert!(err.to_string().contains("Invalid output format"));
    }
}
