//! Identifier lookup and reference search.
//!
//! The [`Resolver`] trait is the seam between the coordination layer and
//! whatever actually understands source code. The coordination layer only
//! needs two things from it: the identifier at a byte offset, and a pair of
//! channels that stream that identifier's references and any errors found
//! along the way.
//!
//! # Key Concepts
//! - **Identifier**: the definition site of the name under the cursor
//! - **Reference**: any other occurrence of that identifier in the tree
//! - **Streams**: references and errors arrive on separate channels that
//!   close independently once the search is exhausted

pub mod declarations;
pub mod lexical;

use crate::cancel::CancelToken;
use crate::error::{RefsError, Result};
use crate::position::Position;
use crossbeam_channel::Receiver;
use serde::Serialize;
use std::fmt;
use std::path::Path;

pub use lexical::TreeSitterResolver;

/// The identifier a search is about, located at its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    /// Identifier name.
    pub name: String,

    /// Where the identifier is defined.
    pub position: Position,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.position)
    }
}

/// One occurrence of the identifier elsewhere in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Where the occurrence is.
    pub position: Position,
}

/// The two result channels of a running search.
///
/// Each channel is closed by the producer independently of the other.
#[derive(Debug)]
pub struct ReferenceStreams {
    /// References, in the order the producer found them.
    pub references: Receiver<Reference>,

    /// Non-fatal errors hit during the search.
    pub errors: Receiver<RefsError>,
}

/// Identifier lookup and tree-wide reference search.
pub trait Resolver {
    /// Find the identifier covering `offset` in `file`, located at its
    /// definition.
    ///
    /// # Errors
    /// Fails when the offset does not correspond to a resolvable identifier
    /// or the file cannot be read.
    fn lookup(&self, file: &Path, offset: usize) -> Result<Identifier>;

    /// Start searching `root` for references to `ident`.
    ///
    /// Returns immediately; results stream in on the returned channels.
    /// Producers stop early once `cancel` fires.
    fn find_references(
        &self,
        ident: &Identifier,
        root: &Path,
        recursive: bool,
        cancel: &CancelToken,
    ) -> ReferenceStreams;
}
