//! Symbol escapes of grammar formalisms that reserve punctuation.

use pest::Parser;

use crate::io::export::{ExportParser, Rule};

// escaped symbols, multi-character symbols precede their prefixes
static ESCAPES: &[(&str, &str)] = &[
    ("(", "LBR"),
    (")", "RBR"),
    (".", "PUNCT"),
    (",", "COMMA"),
    ("--", "MDASH"),
    ("-", "DASH"),
    ("/", "SLASH"),
    ("\\", "BACKSLASH"),
    ("\"", "DQ"),
    ("'", "SQ"),
];

// escape names that contain other escape names precede them
static UNESCAPES: &[(&str, &str)] = &[
    ("LBR", "("),
    ("RBR", ")"),
    ("PUNCT", "."),
    ("COMMA", ","),
    ("MDASH", "--"),
    ("DASH", "-"),
    ("BACKSLASH", "\\"),
    ("SLASH", "/"),
    ("DQ", "\""),
    ("SQ", "'"),
];

/// Replace reserved symbols by their names, `$` is dropped.
pub fn gf_escape(word: &str) -> String {
    ESCAPES
        .iter()
        .fold(word.replace('$', ""), |word, &(symbol, name)| {
            word.replace(symbol, name)
        })
}

/// Replace symbol names by the symbols.
pub fn gf_unescape(word: &str) -> String {
    UNESCAPES
        .iter()
        .fold(word.to_owned(), |word, &(name, symbol)| word.replace(name, symbol))
}

/// Unescape the word and part of speech columns of an escaped export line.
///
/// Only lines with the columns `word tag -- -- parent` are rewritten: inner node ids are kept,
/// tags starting with `.`, `,` or `(` are prefixed with `$` and trailing fan-out digits are
/// removed from the tag. Other lines are returned trimmed.
pub fn unescape_export_line(line: &str) -> String {
    let line = line.trim();
    let mut parts = match ExportParser::parse(Rule::gf_line, line) {
        Ok(mut pairs) => match pairs.next() {
            Some(pair) => pair.into_inner(),
            None => return line.to_owned(),
        },
        Err(_) => return line.to_owned(),
    };
    let (word, pos, parent) = match (parts.next(), parts.next(), parts.next()) {
        (Some(word), Some(pos), Some(parent)) => (word.as_str(), pos.as_str(), parent.as_str()),
        _ => return line.to_owned(),
    };

    let word = if is_inner_id(word) {
        word.to_owned()
    } else {
        gf_unescape(word)
    };
    let mut pos = gf_unescape(pos);
    if pos.starts_with(|c: char| c == '.' || c == ',' || c == '(') {
        pos.insert(0, '$');
    }
    let pos = pos.trim_end_matches(|c: char| c.is_ascii_digit());

    format!("{}\t{}\t--\t--\t{}", word, pos, parent)
}

fn is_inner_id(word: &str) -> bool {
    word.len() > 1 && word.starts_with('#') && word[1..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{gf_escape, gf_unescape, unescape_export_line};

    #[test]
    fn escape() {
        assert_eq!(gf_escape("$("), "LBR");
        assert_eq!(gf_escape("a--b-c"), "aMDASHbDASHc");
        assert_eq!(gf_escape("\"'/\\"), "DQSQSLASHBACKSLASH");
        assert_eq!(gf_escape("Haus"), "Haus");
    }

    #[test]
    fn unescape() {
        assert_eq!(gf_unescape("aMDASHbDASHc"), "a--b-c");
        assert_eq!(gf_unescape("BACKSLASH"), "\\");
        assert_eq!(gf_unescape("SLASH"), "/");
        assert_eq!(gf_unescape("LBRxRBR"), "(x)");
        for word in &["a--b-c", "\\/", "(\"x\")", "z.B.", "1,5"] {
            assert_eq!(gf_unescape(&gf_escape(word)), *word);
        }
    }

    #[test]
    fn export_line() {
        assert_eq!(
            unescape_export_line("PUNCT\tPUNCT1\t--\t--\t500\n"),
            ".\t$.\t--\t--\t500"
        );
        assert_eq!(
            unescape_export_line("  LBR LBR2 -- -- 0"),
            "(\t$(\t--\t--\t0"
        );
        assert_eq!(
            unescape_export_line("#501\tNP2\t--\t--\t502"),
            "#501\tNP\t--\t--\t502"
        );
        assert_eq!(
            unescape_export_line("zDASHB\tADV\t--\t--\t500"),
            "z-B\tADV\t--\t--\t500"
        );
        assert_eq!(unescape_export_line("#BOS 1  "), "#BOS 1");
        assert_eq!(
            unescape_export_line("Haus\tNN\tnsn\tHD\t500"),
            "Haus\tNN\tnsn\tHD\t500"
        );
    }
}
