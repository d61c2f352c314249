//! Prototype registry keyed by full id.
//!
//! This is the pool boundary: it lists what can be placed and hands out fresh
//! instances of a chosen prototype. Instance reuse is not modelled; every claim
//! builds a new shape.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use super::{PlacedPiece, Prototype};
use crate::frame::AffineFrame;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown piece id {0:?}")]
    UnknownPiece(String),
}

/// Prototypes in a stable (sorted by full id) order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    prototypes: BTreeMap<String, Arc<Prototype>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `proto`, and its mirror image too when `with_flipped`.
    /// An existing entry with the same full id is replaced.
    pub fn insert(&mut self, proto: Prototype, with_flipped: bool) {
        if with_flipped {
            let flipped = proto.flipped();
            self.prototypes.insert(flipped.full_id(), Arc::new(flipped));
        }
        self.prototypes.insert(proto.full_id(), Arc::new(proto));
    }

    pub fn get(&self, full_id: &str) -> Result<&Arc<Prototype>, CatalogError> {
        self.prototypes
            .get(full_id)
            .ok_or_else(|| CatalogError::UnknownPiece(full_id.to_string()))
    }

    /// Every registered prototype, cheap to clone.
    pub fn available(&self) -> Vec<Arc<Prototype>> {
        self.prototypes.values().cloned().collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.prototypes.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// New world instance of `full_id` starting at `start`.
    pub fn claim(&self, full_id: &str, seq: u64, start: &AffineFrame) -> Result<PlacedPiece, CatalogError> {
        let proto = self.get(full_id)?;
        Ok(PlacedPiece {
            id: proto.id().clone(),
            seq,
            shape: proto.instantiate(start),
        })
    }
}
