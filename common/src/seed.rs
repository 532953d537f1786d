//! # Discovery Seed Model
//!
//! Defines the possible inputs for a discovery pass.
//!
//! A source adapter is seeded either with a single root domain or, during
//! root-domain widening, with a file holding a newline-delimited list of
//! domains.

use std::fmt;
use std::path::PathBuf;

/// The input handed to a source adapter for one discovery pass.
#[derive(Clone, Debug)]
pub enum DomainSeed {
    /// A single root domain, e.g. `example.com`.
    Single(String),
    /// A file with one domain per line, used when re-seeding widened roots.
    List(PathBuf),
}

impl DomainSeed {
    /// The single domain, if this seed is the single form.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            DomainSeed::Single(domain) => Some(domain),
            DomainSeed::List(_) => None,
        }
    }
}

impl fmt::Display for DomainSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainSeed::Single(domain) => write!(f, "{domain}"),
            DomainSeed::List(path) => write!(f, "list:{}", path.display()),
        }
    }
}
