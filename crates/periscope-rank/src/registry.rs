use std::collections::HashMap;

use crate::error::{RankError, Result};

/// Stable id -> slot assignment, in first-seen order.
///
/// Slots are never reused or removed. The order of [`IdentityRegistry::all_known_ids`]
/// is the order model outputs are decoded in.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    ids: Vec<String>,
    slots: HashMap<String, usize>,
    capacity: usize,
}

impl IdentityRegistry {
    pub fn new(capacity: usize) -> Self {
        Self { ids: Vec::new(), slots: HashMap::new(), capacity }
    }

    pub fn slot_of(&mut self, id: &str) -> Result<usize> {
        if let Some(&slot) = self.slots.get(id) {
            return Ok(slot);
        }
        if self.ids.len() >= self.capacity {
            return Err(RankError::CapacityExceeded { capacity: self.capacity, id: id.to_string() });
        }
        let slot = self.ids.len();
        self.ids.push(id.to_string());
        self.slots.insert(id.to_string(), slot);
        Ok(slot)
    }

    pub fn get(&self, id: &str) -> Option<usize> { self.slots.get(id).copied() }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn all_known_ids(&self) -> &[String] { &self.ids }
}
