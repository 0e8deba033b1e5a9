//! Advice response parsing.
//!
//! The advisor endpoint returns either a multi-line `advice_text` blob or a
//! pre-split `advice` list. `advice_text` wins when both are present.

use netpulse_api::AdviceResponse;

/// Shown while an advice request is in flight.
pub const ADVICE_PENDING: &str = "Requesting advice…";

/// Shown when the response carries neither advice field.
pub const NO_ADVICE: &str = "No advice available.";

/// Turn an advisor response into display lines.
///
/// Preference order: `advice_text` split on one-or-more newlines with empty
/// lines discarded, then the pre-split `advice` list, then a single
/// "no advice" line.
pub fn parse_advice(resp: AdviceResponse) -> Vec<String> {
    if let Some(text) = resp.advice_text {
        let lines: Vec<String> = text
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();
        if !lines.is_empty() {
            return lines;
        }
    }

    if let Some(list) = resp.advice {
        return list;
    }

    vec![NO_ADVICE.to_owned()]
}

/// The single error line shown when an advice request fails.
pub fn advice_error_line(err: &crate::CoreError) -> String {
    format!("Advice request failed: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(text: Option<&str>, list: Option<&[&str]>) -> AdviceResponse {
        AdviceResponse {
            advice_text: text.map(str::to_owned),
            advice: list.map(|l| l.iter().map(|s| (*s).to_owned()).collect()),
        }
    }

    #[test]
    fn advice_text_splits_and_drops_empty_lines() {
        let lines = parse_advice(resp(Some("Line one\n\nLine two\n"), None));
        assert_eq!(lines, vec!["Line one".to_owned(), "Line two".to_owned()]);
    }

    #[test]
    fn advice_text_preferred_over_list() {
        let lines = parse_advice(resp(Some("From text"), Some(&["From list"])));
        assert_eq!(lines, vec!["From text".to_owned()]);
    }

    #[test]
    fn falls_back_to_presplit_list() {
        let lines = parse_advice(resp(None, Some(&["A", "B"])));
        assert_eq!(lines, vec!["A".to_owned(), "B".to_owned()]);
    }

    #[test]
    fn whitespace_only_text_falls_through_to_list() {
        let lines = parse_advice(resp(Some("\n  \n"), Some(&["A"])));
        assert_eq!(lines, vec!["A".to_owned()]);
    }

    #[test]
    fn neither_field_yields_no_advice_line() {
        let lines = parse_advice(resp(None, None));
        assert_eq!(lines, vec![NO_ADVICE.to_owned()]);
    }
}
