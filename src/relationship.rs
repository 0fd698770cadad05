//! Relationship records - an undirected pair of person identifiers

use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// A pairing between two persons.
///
/// The pair is unordered for lookups: a relationship is found through
/// either participant. Self-pairs and repeated pairs are stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "participantA")]
    pub participant_a: Identifier,
    #[serde(rename = "participantB")]
    pub participant_b: Identifier,
}

impl Relationship {
    pub fn new(participant_a: Identifier, participant_b: Identifier) -> Self {
        Self {
            participant_a,
            participant_b,
        }
    }

    /// Check whether `identifier` is on either side of the pair
    pub fn involves(&self, identifier: &str) -> bool {
        self.participant_a.as_str() == identifier || self.participant_b.as_str() == identifier
    }

    /// The other side of the pair, if `identifier` participates.
    ///
    /// For a self-pair this returns the same identifier.
    pub fn counterpart(&self, identifier: &str) -> Option<&Identifier> {
        if self.participant_a.as_str() == identifier {
            Some(&self.participant_b)
        } else if self.participant_b.as_str() == identifier {
            Some(&self.participant_a)
        } else {
            None
        }
    }
}
