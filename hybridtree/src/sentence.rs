use std::fmt;
use std::str::FromStr;

use failure::Error;
use itertools::Itertools;

use crate::token::NO_LABEL;
use crate::{ConstituentTerminal, ConstituentTree, Constituents, HybridTree};

/// Category of the inner node of `noparse_tree`s.
pub static NOPARSE: &str = "NOPARSE";

/// Line of a sentence file.
///
/// A line consists of a sentence id followed by whitespace separated `word/pos` tokens.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SentenceLine {
    id: String,
    words: Vec<(String, String)>,
}

impl SentenceLine {
    pub fn new(id: impl Into<String>, words: Vec<(String, String)>) -> Self {
        SentenceLine {
            id: id.into(),
            words,
        }
    }

    /// Construct the line of the full yield of `tree`.
    pub fn from_tree(id: impl Into<String>, tree: &HybridTree) -> Self {
        let words = tree
            .full_token_yield()
            .into_iter()
            .map(|token| {
                (
                    token.form().unwrap_or(NO_LABEL).to_owned(),
                    token.pos().unwrap_or(NO_LABEL).to_owned(),
                )
            })
            .collect();
        SentenceLine::new(id, words)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the `(word, pos)` pairs.
    pub fn words(&self) -> &[(String, String)] {
        &self.words
    }

    /// Get the words without tags.
    pub fn forms(&self) -> Vec<&str> {
        self.words.iter().map(|(word, _)| word.as_str()).collect()
    }
}

impl FromStr for SentenceLine {
    type Err = Error;

    /// Parse a sentence line, tokens without `/` are ignored.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let id = parts
            .next()
            .ok_or_else(|| format_err!("Sentence line without id: {}", line))?;
        let words = parts
            .filter_map(|token| {
                let split = token.rfind('/')?;
                let (word, pos) = (&token[..split], &token[split + 1..]);
                if word.is_empty() || pos.is_empty() {
                    None
                } else {
                    Some((word.to_owned(), pos.to_owned()))
                }
            })
            .collect();
        Ok(SentenceLine::new(id, words))
    }
}

impl fmt::Display for SentenceLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}",
            self.id,
            self.words
                .iter()
                .map(|(word, pos)| format!("{}/{}", word, pos))
                .join(" ")
        )
    }
}

/// Build a flat tree with all words of `sentence` below a single `NOPARSE` node.
pub fn noparse_tree(sentence: &SentenceLine) -> ConstituentTree {
    let mut tree = ConstituentTree::new(sentence.id());
    for (idx, (word, pos)) in sentence.words().iter().enumerate() {
        let id = (101 + idx).to_string();
        tree.add_leaf(&id, ConstituentTerminal::new(word.as_str(), pos.as_str()));
        tree.add_child("500", &id);
    }
    tree.set_label("500", NOPARSE);
    tree.add_to_root("500");
    tree
}

#[cfg(test)]
mod tests {
    use super::{noparse_tree, SentenceLine};
    use crate::io::{serialize, WriterConfig};
    use crate::{ConstituentTerminal, ConstituentTree, Constituents};

    #[test]
    fn parse_and_display() {
        let line = "12\tDas/ART Haus/NN 1/2/CARD ohne_tag ./$.".parse::<SentenceLine>().unwrap();
        assert_eq!(line.id(), "12");
        assert_eq!(line.forms(), vec!["Das", "Haus", "1/2", "."]);
        assert_eq!(line.words()[2].1, "CARD");
        assert_eq!(line.to_string(), "12\tDas/ART Haus/NN 1/2/CARD ./$.");
        assert!("".parse::<SentenceLine>().is_err());
        assert!("7".parse::<SentenceLine>().unwrap().words().is_empty());
    }

    #[test]
    fn from_tree() {
        let mut tree = ConstituentTree::new("3");
        tree.add_leaf("1", ConstituentTerminal::new("Ja", "ITJ"));
        tree.add_punct("2", "$.", ".");
        tree.set_label("X", "X");
        tree.add_to_root("X");
        tree.add_child("X", "1");
        let line = SentenceLine::from_tree("3", &tree);
        assert_eq!(line.to_string(), "3\tJa/ITJ ./$.");
    }

    #[test]
    fn noparse() {
        let line = "4\tDas/ART Haus/NN".parse::<SentenceLine>().unwrap();
        let tree = noparse_tree(&line);
        assert_eq!(tree.word_yield(), vec!["Das", "Haus"]);
        assert_eq!(tree.root().len(), 1);
        assert!(tree.complete());
        let config = WriterConfig {
            use_sentence_names: true,
            ..WriterConfig::default()
        };
        let target = "#BOS 4\n\
                      Das\tART\t--\t--\t500\n\
                      Haus\tNN\t--\t--\t500\n\
                      #500\tNOPARSE\t--\t--\t0\n\
                      #EOS 4\n";
        assert_eq!(serialize(&[tree], config).unwrap(), target);
    }
}
