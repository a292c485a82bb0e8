//! Query/mutation classification of RPC methods
//!
//! This is a naming heuristic: methods whose name starts with `get` or
//! `list` (any case) are treated as reads, everything else as writes. The
//! actual side effects of the RPC are never inspected.

use serde::{Deserialize, Serialize};

/// Name prefixes that mark a read-only method
const QUERY_PREFIXES: [&str; 2] = ["get", "list"];

/// GraphQL operation a method is exposed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Query,
    Mutation,
}

impl Operation {
    /// Operation keyword used in GraphQL documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Query => "query",
            Operation::Mutation => "mutation",
        }
    }

    /// Root type name in a GraphQL schema
    pub fn type_name(&self) -> &'static str {
        match self {
            Operation::Query => "Query",
            Operation::Mutation => "Mutation",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Classifies RPC methods into queries and mutations
pub struct MethodClassifier;

impl MethodClassifier {
    /// Classify a method by its name
    ///
    /// # Examples
    /// ```
    /// use proto_converter_common::{MethodClassifier, Operation};
    ///
    /// assert_eq!(MethodClassifier::classify("GetUser"), Operation::Query);
    /// assert_eq!(MethodClassifier::classify("createUser"), Operation::Mutation);
    /// ```
    pub fn classify(method_name: &str) -> Operation {
        if Self::is_query(method_name) {
            Operation::Query
        } else {
            Operation::Mutation
        }
    }

    pub fn is_query(method_name: &str) -> bool {
        QUERY_PREFIXES.iter().any(|prefix| {
            method_name
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
    }
}
