//! Authoring policy — maps an origin author to the destination author.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Author;

/// Decides who authors a change in the destination.
///
/// Every variant yields exactly one author for any input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authoring {
    /// Always use `default`, whoever wrote the origin change.
    Overwrite { default: Author },
    /// Keep the origin author when their email is in `allowed`, else `default`.
    Whitelisted {
        default: Author,
        allowed: BTreeSet<String>,
    },
    /// Keep the origin author unchanged.
    PassThru { default: Author },
}

impl Authoring {
    pub fn overwrite(default: Author) -> Self {
        Authoring::Overwrite { default }
    }

    pub fn pass_thru(default: Author) -> Self {
        Authoring::PassThru { default }
    }

    pub fn whitelisted<I, S>(default: Author, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Authoring::Whitelisted {
            default,
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// The fallback author configured on the policy.
    pub fn default_author(&self) -> &Author {
        match self {
            Authoring::Overwrite { default }
            | Authoring::Whitelisted { default, .. }
            | Authoring::PassThru { default } => default,
        }
    }

    /// Resolve the destination author for `origin_author`. Pure and total.
    pub fn resolve(&self, origin_author: &Author) -> Author {
        match self {
            Authoring::Overwrite { default } => default.clone(),
            Authoring::PassThru { .. } => origin_author.clone(),
            Authoring::Whitelisted { default, allowed } => {
                if allowed.contains(&origin_author.email) {
                    origin_author.clone()
                } else {
                    default.clone()
                }
            }
        }
    }
}

impl fmt::Display for Authoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authoring::Overwrite { default } => write!(f, "overwrite({default})"),
            Authoring::PassThru { default } => write!(f, "pass_thru({default})"),
            Authoring::Whitelisted { default, allowed } => {
                let allowed: Vec<&str> = allowed.iter().map(String::as_str).collect();
                write!(f, "whitelisted({default}, [{}])", allowed.join(", "))
            }
        }
    }
}
