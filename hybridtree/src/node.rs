use std::fmt;

use crate::Token;

/// Node in the arena of a `HybridTree`.
///
/// A `Node` pairs the corpus identifier of a node with its `Token`. Nodes are allocated on first
/// mention of their identifier, the token is attached once the node itself is added. The virtual
/// root never carries a token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    id: String,
    token: Option<Token>,
}

impl Node {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            token: None,
        }
    }

    /// Get the corpus identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Get the token.
    ///
    /// Returns `None` for the virtual root and for nodes that were referenced but never added.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Get the token mutably.
    pub fn token_mut(&mut self) -> Option<&mut Token> {
        self.token.as_mut()
    }

    /// Replace the token, return the old one.
    pub(crate) fn set_token(&mut self, token: Token) -> Option<Token> {
        self.token.replace(token)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{}", token),
            None => write!(f, "{}", self.id),
        }
    }
}
