//! Keyword relevance matching for report text.

use regex::RegexBuilder;
use tracing::warn;
use trafik_feed::TrafficReport;

/// Compiled multi-term matcher.
///
/// `None` inside is the match-everything matcher produced by an empty
/// term list.
#[derive(Debug, Clone)]
pub struct ReportMatcher {
    pattern: Option<regex::Regex>,
}

impl ReportMatcher {
    /// Compiles a single alternation over `terms`.
    ///
    /// Terms are regex-escaped and matched literally. With `word_boundary`
    /// every alternative is anchored at word boundaries, so "vejarbejde"
    /// will not hit "Vejarbejdere". Case sensitivity is a pattern flag;
    /// the input text is never transformed.
    pub fn compile(terms: &[String], word_boundary: bool, case_sensitive: bool) -> Self {
        let terms: Vec<&str> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        if terms.is_empty() {
            return Self { pattern: None };
        }

        let alternation = terms
            .iter()
            .map(|t| {
                let escaped = regex::escape(t);
                if word_boundary {
                    format!(r"\b{escaped}\b")
                } else {
                    escaped
                }
            })
            .collect::<Vec<_>>()
            .join("|");

        match RegexBuilder::new(&alternation)
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(re) => Self { pattern: Some(re) },
            Err(err) => {
                // Escaped literals only fail on pattern size limits.
                warn!(?err, "match terms did not compile, matching everything");
                Self { pattern: None }
            }
        }
    }

    /// True when the text is relevant. The referenced report's text counts
    /// as part of the report for matching purposes.
    pub fn matches(&self, text: &str, reference_text: Option<&str>) -> bool {
        let Some(re) = &self.pattern else {
            return true;
        };

        if re.is_match(text) {
            return true;
        }

        reference_text.is_some_and(|reference| re.is_match(reference))
    }

    /// Convenience wrapper over [`ReportMatcher::matches`] for a report.
    pub fn matches_report(&self, report: &TrafficReport) -> bool {
        self.matches(
            &report.text,
            report.reference.as_ref().map(|r| r.text.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_terms_match_everything() {
        let matcher = ReportMatcher::compile(&[], true, false);
        assert!(matcher.matches("Kø på Motorring 3", None));
        assert!(matcher.matches("", None));
    }

    #[test]
    fn word_boundary_case_insensitive() {
        let matcher = ReportMatcher::compile(&terms(&["vejarbejde"]), true, false);

        assert!(matcher.matches("Vejarbejde på E45", None));
        assert!(!matcher.matches("Vejarbejdere strejker", None));
    }

    #[test]
    fn without_word_boundary_substrings_match() {
        let matcher = ReportMatcher::compile(&terms(&["vejarbejde"]), false, false);
        assert!(matcher.matches("Vejarbejdere strejker", None));
    }

    #[test]
    fn case_sensitive_flag_is_honored() {
        let matcher = ReportMatcher::compile(&terms(&["E45"]), false, true);

        assert!(matcher.matches("Uheld på E45 mod syd", None));
        assert!(!matcher.matches("uheld på e45 mod syd", None));
    }

    #[test]
    fn multiple_terms_form_an_alternation() {
        let matcher = ReportMatcher::compile(&terms(&["metro", "s-tog"]), true, false);

        assert!(matcher.matches("Metro mod lufthavnen holder stille", None));
        assert!(matcher.matches("Ingen S-tog mellem Valby og Hellerup", None));
        assert!(!matcher.matches("Bus 5C omlagt", None));
    }

    #[test]
    fn terms_are_matched_literally() {
        let matcher = ReportMatcher::compile(&terms(&["rute 21 (syd)"]), false, false);

        assert!(matcher.matches("Glat føre på rute 21 (syd)", None));
        assert!(!matcher.matches("Glat føre på rute 21 syd", None));
    }

    #[test]
    fn reference_text_counts_for_relevance() {
        let matcher = ReportMatcher::compile(&terms(&["storebælt"]), true, false);

        assert!(matcher.matches("Broen er genåbnet", Some("Storebælt lukket pga. vind")));
        assert!(!matcher.matches("Broen er genåbnet", None));
    }
}
