//! Fixed-capacity body arena with generation-counted handles.

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};
use crate::objects::RigidBody;

/// Stable reference to a body in a `PhysicsWorld`.
///
/// The index names a slot; the generation changes every time the slot is
/// reused, so handles to destroyed bodies never resolve to a newer body.
/// `BodyHandle::default()` never refers to a live body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Slot index, the body's id for its lifetime.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<RigidBody>,
}

/// Owns every body of a world. Slots are never compacted, so a body keeps
/// its index until it is destroyed. New bodies take the lowest free slot.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    slots: Vec<Slot>,
    capacity: usize,
    len: usize,
}

impl BodyRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free slots left before `CapacityExceeded`.
    pub fn available(&self) -> usize {
        self.capacity - self.len
    }

    pub fn insert(&mut self, mut body: RigidBody) -> PhysicsResult<BodyHandle> {
        let index = match self.slots.iter().position(|slot| slot.body.is_none()) {
            Some(index) => index,
            None if self.slots.len() < self.capacity => {
                self.slots.push(Slot { generation: 0, body: None });
                self.slots.len() - 1
            }
            None => {
                return Err(PhysicsError::CapacityExceeded { capacity: self.capacity });
            }
        };

        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        let handle = BodyHandle {
            index: index as u32,
            generation: slot.generation,
        };
        body.set_handle(handle);
        slot.body = Some(body);
        self.len += 1;
        Ok(handle)
    }

    pub fn remove(&mut self, handle: BodyHandle) -> PhysicsResult<RigidBody> {
        let slot = self
            .slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(PhysicsError::InvalidHandle(handle))?;
        let body = slot.body.take().ok_or(PhysicsError::InvalidHandle(handle))?;
        self.len -= 1;
        Ok(body)
    }

    /// Drops every body. Slot generations survive so old handles stay invalid.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.body = None;
        }
        self.len = 0;
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    /// Live bodies in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = &RigidBody> {
        self.slots.iter().filter_map(|slot| slot.body.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RigidBody> {
        self.slots.iter_mut().filter_map(|slot| slot.body.as_mut())
    }

    /// The `n`-th live body in slot order.
    pub fn nth(&self, n: usize) -> Option<&RigidBody> {
        self.iter().nth(n)
    }

    /// Mutable access to two distinct bodies at once.
    pub fn pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        if a.index() == b.index() || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.index() < b.index() {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        // Get mutable references using split_at_mut to satisfy the borrow checker
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].body.as_mut()?;
        let second = tail[0].body.as_mut()?;
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }
}
