//! Question text utilities: tokenization, year/number extraction, the
//! ascending/descending superlative cue, and input sanitization.
//!
//! These are deliberately small deterministic routines, not NLP. They feed
//! the numeric branches of the search strategies; when nothing is extracted
//! the numeric branches are skipped, so "no match" is always `None`, never a
//! guess.

use regex::Regex;

/// Whitespace word split with surrounding punctuation trimmed. Internal
/// hyphens and slashes are kept so date-like tokens survive intact.
pub fn tokenize(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '/')
                .to_string()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Extract a four-digit year from the question.
///
/// Date-shaped patterns over the whole question take precedence (so the year
/// inside `12/31/2001` wins over a stray number); otherwise the first token
/// containing a plausible year is used.
pub fn extract_year(question_tokens: &[String], question: &str) -> Option<String> {
    let question_patterns = [
        r"\d{1,2}/\d{1,2}/(\d{4})",
        r"\d{1,2}-\d{1,2}-(\d{4})",
        r"(\d{4})-\d{1,2}-\d{1,2}",
    ];
    for pattern in question_patterns {
        let re = Regex::new(pattern).expect("static year pattern");
        if let Some(caps) = re.captures(question) {
            return Some(caps[1].to_string());
        }
    }

    let token_patterns = [r"^(\d{4})$", r"^(\d{4})-", r"-(\d{4})$"];
    for token in question_tokens {
        for pattern in token_patterns {
            let re = Regex::new(pattern).expect("static year pattern");
            if let Some(caps) = re.captures(token) {
                return Some(caps[1].to_string());
            }
        }
    }
    None
}

/// Extract a number from the question: scientific notation anywhere in the
/// text first, else the first digit-leading token. Ordinal suffixes are
/// reduced to the bare number and a trailing `.0` is dropped.
pub fn extract_number(question_tokens: &[String], question: &str) -> Option<String> {
    let sci = Regex::new(r"(\d\.\d+e\+\d+)").expect("static number pattern");
    let mut number = match sci.captures(question) {
        Some(caps) => caps[1].to_string(),
        None => question_tokens
            .iter()
            .find(|tok| tok.chars().next().is_some_and(|c| c.is_ascii_digit()))?
            .clone(),
    };

    number = number
        .replace("1st", "1")
        .replace("2nd", "2")
        .replace("3rd", "3");
    number = number.trim_end_matches(".0").trim_end_matches('.').to_string();

    if number.is_empty() {
        None
    } else {
        Some(number)
    }
}

/// Superlative sort-order cue: `false` when the question asks for a maximum
/// ("highest", "most", ...), `true` otherwise (ascending, i.e. a minimum).
pub fn ascending_cue(question: &str) -> bool {
    let question_lower = question.to_lowercase();
    let max_words = [
        "maximum", "highest", "max(", "greatest", "most", "longest", "biggest",
    ];
    !max_words.iter().any(|w| question_lower.contains(w))
}

/// Normalize raw question text before matching and extraction: collapse
/// spaced hyphens, drop stray braces/parens and trailing periods, fold
/// double quotes to single.
pub fn sanitize_question(question: &str) -> String {
    let replacements = [
        (" - ", "-"),
        (" .", ""),
        ("{", ""),
        ("}", ""),
        ("  ", " "),
        ("\"", "'"),
        ("(", ""),
        (")", ""),
    ];
    let mut out = question.to_string();
    for (old, new) in replacements {
        out = out.replace(old, new);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        tokenize(s)
    }

    #[test]
    fn year_from_date_patterns() {
        let q = "what happened on 12/31/2001 there?";
        assert_eq!(extract_year(&toks(q), q), Some("2001".to_string()));

        let q = "events of 2001-09-11 in new york";
        assert_eq!(extract_year(&toks(q), q), Some("2001".to_string()));
    }

    #[test]
    fn year_from_tokens() {
        let q = "which team did he join in 2004?";
        assert_eq!(extract_year(&toks(q), q), Some("2004".to_string()));

        let q = "during the 1998- period";
        assert_eq!(extract_year(&toks(q), q), Some("1998".to_string()));

        let q = "who is the president?";
        assert_eq!(extract_year(&toks(q), q), None);
    }

    #[test]
    fn number_extraction() {
        let q = "what has a mass of 5.97e+24 kilograms?";
        assert_eq!(extract_number(&toks(q), q), Some("5.97e+24".to_string()));

        let q = "who came 2nd in the race?";
        assert_eq!(extract_number(&toks(q), q), Some("2".to_string()));

        let q = "a height of 12.0 meters";
        assert_eq!(extract_number(&toks(q), q), Some("12".to_string()));

        let q = "no digits here";
        assert_eq!(extract_number(&toks(q), q), None);
    }

    #[test]
    fn ascending_cue_words() {
        assert!(!ascending_cue("Which mountain is the highest?"));
        assert!(!ascending_cue("the most populous country"));
        assert!(ascending_cue("Which river is the shortest?"));
        assert!(ascending_cue("the earliest recorded eclipse"));
    }

    #[test]
    fn sanitize_drops_noise() {
        assert_eq!(
            sanitize_question("what is foo - bar (the band) ."),
            "what is foo-bar the band"
        );
        assert_eq!(sanitize_question("say \"hi\""), "say 'hi'");
    }
}
