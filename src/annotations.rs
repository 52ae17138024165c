//! Genes are annotated to GO terms
//!
//! Gene identifiers are interned when the background gene set is loaded.
//! Every gene of the background receives a dense [`GeneId`] and all
//! further gene sets ([`GeneGroup`]s) are expressed through those ids.
//! Genes that are not part of the background are never interned, so they
//! cannot be annotated to any term.

use core::fmt::Debug;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;

use crate::{GoError, GoResult};

mod group;
pub use group::{GeneGroup, GeneIds};

/// A unique identifier for a gene of the background set
#[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct GeneId {
    inner: u32,
}

impl GeneId {
    /// Returns the integer representation of the gene id
    pub fn as_u32(&self) -> u32 {
        self.inner
    }

    /// Returns the index of the gene inside the [`Background`]
    pub fn as_usize(&self) -> usize {
        self.inner as usize
    }
}

impl From<u32> for GeneId {
    fn from(inner: u32) -> Self {
        GeneId { inner }
    }
}

impl Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeneId:{}", self.inner)
    }
}

/// The background gene set, the universe of all genes considered for testing
///
/// The background interns gene identifiers to [`GeneId`]s. Duplicated
/// gene names are only added once.
#[derive(Debug, Default, Clone)]
pub struct Background {
    names: Vec<String>,
    ids: HashMap<String, GeneId>,
}

impl Background {
    /// Constructs a new, empty [`Background`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a gene to the background and returns its [`GeneId`]
    ///
    /// If the gene is already present, the existing id is returned.
    ///
    /// # Errors
    ///
    /// [`GoError::TooManyIds`] if the background would contain more than `u32::MAX` genes
    pub fn insert(&mut self, name: &str) -> GoResult<GeneId> {
        match self.ids.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let id = gene_id(self.names.len())?;
                self.names.push(name.to_string());
                entry.insert(id);
                Ok(id)
            }
        }
    }

    /// Returns the [`GeneId`] of the gene, or `None` if it is not part of the background
    pub fn get(&self, name: &str) -> Option<GeneId> {
        self.ids.get(name).copied()
    }

    /// Returns the name of a gene
    pub fn name(&self, id: GeneId) -> Option<&str> {
        self.names.get(id.as_usize()).map(String::as_str)
    }

    /// Returns the number of genes in the background
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the background does not contain any genes
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns all genes of the background as a [`GeneGroup`]
    pub fn genes(&self) -> GeneGroup {
        (0..self.names.len())
            .filter_map(|idx| gene_id(idx).ok())
            .collect()
    }
}

/// Converts a background index into a [`GeneId`]
fn gene_id(idx: usize) -> GoResult<GeneId> {
    u32::try_from(idx)
        .map(GeneId::from)
        .map_err(|_| GoError::TooManyIds("genes in background"))
}
