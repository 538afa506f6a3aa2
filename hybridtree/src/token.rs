use std::fmt;
use std::mem;

use itertools::Itertools;

/// Edge label used when a token carries no label.
pub static NO_LABEL: &str = "--";

/// Enum representing the tokens attached to the nodes of a `HybridTree`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    /// CoNLL-X style token of a dependency tree.
    Dependency(DependencyToken),
    /// Terminal of a constituent tree.
    Terminal(ConstituentTerminal),
    /// Category of a non-terminal constituent node.
    Category(ConstituentCategory),
}

impl Token {
    /// Construct a dependency token from form and part of speech.
    ///
    /// Lemma, features and dependency relation are set to `"_"`, the coarse part of speech
    /// equals `pos`.
    pub fn conll(form: impl Into<String>, pos: impl Into<String>) -> Self {
        let pos = pos.into();
        Token::Dependency(DependencyToken::new(form, "_", pos.clone(), pos, "_", "_"))
    }

    /// Construct a constituent token.
    ///
    /// Returns a `Token::Terminal` with form `label` if `terminal` is true, otherwise a
    /// `Token::Category` labelled `label`. `pos` is ignored for categories.
    pub fn constituent(label: impl Into<String>, pos: impl Into<String>, terminal: bool) -> Self {
        if terminal {
            Token::Terminal(ConstituentTerminal::new(label, pos))
        } else {
            Token::Category(ConstituentCategory::new(label))
        }
    }

    /// Rank of the token.
    ///
    /// `0` for constituent terminals, `1` for categories and dependency tokens.
    pub fn rank(&self) -> usize {
        match self {
            Token::Terminal(_) => 0,
            Token::Category(_) | Token::Dependency(_) => 1,
        }
    }

    /// Get the label of the edge to the token's parent.
    ///
    /// For dependency tokens this is the dependency relation.
    pub fn edge(&self) -> &str {
        match self {
            Token::Dependency(dep) => dep.deprel(),
            Token::Terminal(terminal) => terminal.edge(),
            Token::Category(category) => category.edge(),
        }
    }

    /// Set the label of the edge to the token's parent.
    ///
    /// Returns the replaced label.
    pub fn set_edge_label(&mut self, edge: impl Into<String>) -> String {
        match self {
            Token::Dependency(dep) => dep.set_deprel(edge),
            Token::Terminal(terminal) => terminal.set_edge_label(edge),
            Token::Category(category) => category.set_edge_label(edge),
        }
    }

    /// Get the word form.
    ///
    /// Returns `None` for categories.
    pub fn form(&self) -> Option<&str> {
        match self {
            Token::Dependency(dep) => Some(dep.form()),
            Token::Terminal(terminal) => Some(terminal.form()),
            Token::Category(_) => None,
        }
    }

    /// Get the part of speech.
    ///
    /// Returns `None` for categories.
    pub fn pos(&self) -> Option<&str> {
        match self {
            Token::Dependency(dep) => Some(dep.pos()),
            Token::Terminal(terminal) => Some(terminal.pos()),
            Token::Category(_) => None,
        }
    }

    /// Get the category.
    ///
    /// Returns `None` if `self` is not a `Token::Category`.
    pub fn category(&self) -> Option<&str> {
        self.as_category().map(ConstituentCategory::category)
    }

    /// Get a `Option<&ConstituentTerminal>`.
    pub fn as_terminal(&self) -> Option<&ConstituentTerminal> {
        match self {
            Token::Terminal(terminal) => Some(terminal),
            _ => None,
        }
    }

    /// Get a `Option<&ConstituentCategory>`.
    pub fn as_category(&self) -> Option<&ConstituentCategory> {
        match self {
            Token::Category(category) => Some(category),
            _ => None,
        }
    }

    /// Get a `Option<&mut ConstituentCategory>`.
    pub fn as_category_mut(&mut self) -> Option<&mut ConstituentCategory> {
        match self {
            Token::Category(category) => Some(category),
            _ => None,
        }
    }

    /// Get a `Option<&DependencyToken>`.
    pub fn as_dependency(&self) -> Option<&DependencyToken> {
        match self {
            Token::Dependency(dep) => Some(dep),
            _ => None,
        }
    }

    /// Get a `Option<&mut DependencyToken>`.
    pub fn as_dependency_mut(&mut self) -> Option<&mut DependencyToken> {
        match self {
            Token::Dependency(dep) => Some(dep),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Dependency(dep) => fmt::Display::fmt(dep, f),
            Token::Terminal(terminal) => fmt::Display::fmt(terminal, f),
            Token::Category(category) => fmt::Display::fmt(category, f),
        }
    }
}

impl From<DependencyToken> for Token {
    fn from(token: DependencyToken) -> Self {
        Token::Dependency(token)
    }
}

impl From<ConstituentTerminal> for Token {
    fn from(token: ConstituentTerminal) -> Self {
        Token::Terminal(token)
    }
}

impl From<ConstituentCategory> for Token {
    fn from(token: ConstituentCategory) -> Self {
        Token::Category(token)
    }
}

/// CoNLL-X style token.
///
/// Only the dependency relation can be changed after construction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DependencyToken {
    form: String,
    lemma: String,
    cpos: String,
    pos: String,
    feats: String,
    deprel: String,
}

impl DependencyToken {
    pub fn new(
        form: impl Into<String>,
        lemma: impl Into<String>,
        cpos: impl Into<String>,
        pos: impl Into<String>,
        feats: impl Into<String>,
        deprel: impl Into<String>,
    ) -> Self {
        DependencyToken {
            form: form.into(),
            lemma: lemma.into(),
            cpos: cpos.into(),
            pos: pos.into(),
            feats: feats.into(),
            deprel: deprel.into(),
        }
    }

    pub fn form(&self) -> &str {
        self.form.as_str()
    }

    pub fn lemma(&self) -> &str {
        self.lemma.as_str()
    }

    /// Coarse part of speech.
    pub fn cpos(&self) -> &str {
        self.cpos.as_str()
    }

    pub fn pos(&self) -> &str {
        self.pos.as_str()
    }

    /// Feature string.
    pub fn feats(&self) -> &str {
        self.feats.as_str()
    }

    /// Dependency relation.
    pub fn deprel(&self) -> &str {
        self.deprel.as_str()
    }

    /// Replace the dependency relation. Return old value.
    pub fn set_deprel(&mut self, deprel: impl Into<String>) -> String {
        mem::replace(&mut self.deprel, deprel.into())
    }
}

impl fmt::Display for DependencyToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} : {} : {}", self.form, self.pos, self.deprel)
    }
}

/// Struct representing a Terminal.
///
/// `ConstituentTerminal`s are represented by:
/// * `form` - word form
/// * `pos` - part of speech tag
/// * `edge` - label of the incoming edge, `"--"` if unlabeled
/// * `morph` - morphological features, empty by default
/// * `lemma` - lemma, `"--"` if unknown
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ConstituentTerminal {
    form: String,
    pos: String,
    edge: String,
    morph: Vec<String>,
    lemma: String,
}

impl ConstituentTerminal {
    /// Construct a new terminal without edge label, morphology and lemma.
    pub fn new(form: impl Into<String>, pos: impl Into<String>) -> Self {
        ConstituentTerminal {
            form: form.into(),
            pos: pos.into(),
            edge: NO_LABEL.into(),
            morph: Vec::new(),
            lemma: NO_LABEL.into(),
        }
    }

    /// Set the edge label.
    pub fn with_edge(mut self, edge: impl Into<String>) -> Self {
        self.edge = edge.into();
        self
    }

    /// Set the lemma.
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    /// Set the morphological features.
    pub fn with_morph<S>(mut self, morph: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.morph = morph.into_iter().map(Into::into).collect();
        self
    }

    /// Return the terminal's form.
    pub fn form(&self) -> &str {
        self.form.as_str()
    }

    /// Return part of speech.
    pub fn pos(&self) -> &str {
        self.pos.as_str()
    }

    /// Return the lemma, `"--"` if unknown.
    pub fn lemma(&self) -> &str {
        self.lemma.as_str()
    }

    /// Return the morphological features.
    pub fn morph(&self) -> &[String] {
        &self.morph
    }

    /// Return the edge label.
    pub fn edge(&self) -> &str {
        self.edge.as_str()
    }

    /// Replace the edge label with `edge`. Return old value.
    pub fn set_edge_label(&mut self, edge: impl Into<String>) -> String {
        mem::replace(&mut self.edge, edge.into())
    }
}

impl fmt::Display for ConstituentTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let morph = if self.morph.is_empty() {
            NO_LABEL.to_string()
        } else {
            self.morph.iter().join("|")
        };
        write!(
            f,
            "{}[{}] : {}\t{}\t{}",
            self.form, self.lemma, self.pos, self.edge, morph
        )
    }
}

/// Struct representing the category of a non-terminal node.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ConstituentCategory {
    category: String,
    edge: String,
}

impl ConstituentCategory {
    /// Construct a new category without edge label.
    pub fn new(category: impl Into<String>) -> Self {
        ConstituentCategory {
            category: category.into(),
            edge: NO_LABEL.into(),
        }
    }

    /// Set the edge label.
    pub fn with_edge(mut self, edge: impl Into<String>) -> Self {
        self.edge = edge.into();
        self
    }

    /// Return the category.
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Replace the category. Return old value.
    pub fn set_category(&mut self, category: impl Into<String>) -> String {
        mem::replace(&mut self.category, category.into())
    }

    /// Return the edge label.
    pub fn edge(&self) -> &str {
        self.edge.as_str()
    }

    /// Replace the edge label. Return old value.
    pub fn set_edge_label(&mut self, edge: impl Into<String>) -> String {
        mem::replace(&mut self.edge, edge.into())
    }
}

impl fmt::Display for ConstituentCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.category, self.edge)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{ConstituentCategory, ConstituentTerminal, DependencyToken, Token};

    #[test]
    fn terminal() {
        let mut terminal = Token::from(
            ConstituentTerminal::new("Haus", "NN")
                .with_lemma("haus")
                .with_morph(vec!["nsn", "sg"]),
        );
        assert_eq!(terminal.rank(), 0);
        assert_eq!(terminal.form(), Some("Haus"));
        assert_eq!(terminal.pos(), Some("NN"));
        assert_eq!(terminal.category(), None);
        assert_eq!(terminal.edge(), "--");
        assert_eq!(terminal.set_edge_label("HD"), "--");
        assert_eq!(terminal.edge(), "HD");
        let inner = terminal.as_terminal().unwrap();
        assert_eq!(inner.lemma(), "haus");
        assert_eq!(inner.morph(), &["nsn".to_string(), "sg".to_string()]);
        assert_eq!(format!("{}", terminal), "Haus[haus] : NN\tHD\tnsn|sg");
    }

    #[test]
    fn category() {
        let mut category = Token::constituent("NP", "ignored", false);
        assert_eq!(category.rank(), 1);
        assert_eq!(category.form(), None);
        assert_eq!(category.category(), Some("NP"));
        assert_eq!(
            category.as_category_mut().unwrap().set_category("NX"),
            "NP"
        );
        category.set_edge_label("OA");
        assert_eq!(format!("{}", category), "NX\tOA");
        assert_eq!(
            category,
            Token::Category(ConstituentCategory::new("NX").with_edge("OA"))
        );
    }

    #[test]
    fn dependency() {
        let mut token = Token::conll("sleeps", "VBZ");
        assert_eq!(token.rank(), 1);
        assert_eq!(
            token.as_dependency().unwrap(),
            &DependencyToken::new("sleeps", "_", "VBZ", "VBZ", "_", "_")
        );
        assert_eq!(token.set_edge_label("root"), "_");
        assert_eq!(token.as_dependency().unwrap().deprel(), "root");
        assert_eq!(format!("{}", token), "sleeps : VBZ : root");
    }

    #[test]
    fn structural_equality() {
        let t1 = Token::from(ConstituentTerminal::new("a", "DT"));
        let t2 = Token::from(ConstituentTerminal::new("a", "DT"));
        let t3 = Token::from(ConstituentTerminal::new("a", "DT").with_lemma("a"));
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
        let set = vec![t1, t2, t3].into_iter().collect::<HashSet<_>>();
        assert_eq!(set.len(), 2);
    }
}
