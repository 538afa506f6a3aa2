use std::fmt;

/// Enum representing Edges in hybrid trees and DAGs.
///
/// Both variants carry the rank of the child among its parent's children of the same kind,
/// edges are listed in ascending rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    Primary(usize),
    Secondary(usize, String),
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Edge::Primary(rank) => write!(f, "{}", rank),
            Edge::Secondary(rank, label) => write!(f, "{}:{}", rank, label),
        }
    }
}

impl Edge {
    /// Return whether the Edge is primary.
    pub fn is_primary(&self) -> bool {
        if let Edge::Primary(_) = self {
            true
        } else {
            false
        }
    }

    /// Return whether the Edge is secondary.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary()
    }

    /// Get the rank of the child among its siblings.
    pub fn rank(&self) -> usize {
        match self {
            Edge::Primary(rank) => *rank,
            Edge::Secondary(rank, _) => *rank,
        }
    }

    /// Get the Edge label.
    ///
    /// Primary edges are unlabeled, their label is stored in the child's token.
    pub fn label(&self) -> Option<&str> {
        match self {
            Edge::Primary(_) => None,
            Edge::Secondary(_, label) => Some(label.as_str()),
        }
    }
}
