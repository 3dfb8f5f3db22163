use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::body::{Body, BodyHandle};

struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Owns every body. Slots are reused through a free list; the generation
/// counter makes handles to removed bodies resolve to `None`.
#[derive(Default)]
pub(crate) struct BodyArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_id: HashMap<String, BodyHandle>,
    /// Live handles in insertion order (drives deterministic iteration)
    order: Vec<BodyHandle>,
}

impl BodyArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Caller guarantees the id is not registered yet.
    pub(crate) fn insert(&mut self, body: Body) -> BodyHandle {
        let id = body.id.clone();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.body = Some(body);
                BodyHandle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, body: Some(body) });
                BodyHandle::new(index, 0)
            }
        };
        self.by_id.insert(id, handle);
        self.order.push(handle);
        handle
    }

    pub(crate) fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.by_id.remove(&body.id);
        self.order.retain(|h| *h != handle);
        Some(body)
    }

    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.body.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.by_id.clear();
        self.order.clear();
    }

    pub(crate) fn handle_of(&self, id: &str) -> Option<BodyHandle> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn get(&self, handle: BodyHandle) -> Option<&Body> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.body.as_ref()
    }

    pub(crate) fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.body.as_mut()
    }

    /// Mutable access to two distinct bodies at once.
    pub(crate) fn get2_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body, &mut Body)> {
        let (ia, ib) = (a.index() as usize, b.index() as usize);
        if ia == ib || ia >= self.slots.len() || ib >= self.slots.len() {
            return None;
        }
        let (slot_a, slot_b) = if ia < ib {
            let (lo, hi) = self.slots.split_at_mut(ib);
            (&mut lo[ia], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(ia);
            (&mut hi[0], &mut lo[ib])
        };
        if slot_a.generation != a.generation() || slot_b.generation != b.generation() {
            return None;
        }
        match (slot_a.body.as_mut(), slot_b.body.as_mut()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Live handles in insertion order.
    pub(crate) fn order(&self) -> &[BodyHandle] {
        &self.order
    }

    /// Bodies in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order
            .iter()
            .filter_map(move |&h| self.get(h).map(|b| (h, b)))
    }

    /// Bodies in slot order. Use when visiting order does not matter.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.body
                .as_mut()
                .map(move |b| (BodyHandle::new(index as u32, generation), b))
        })
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn par_bodies_mut(&mut self) -> impl ParallelIterator<Item = &mut Body> + '_ {
        self.slots.par_iter_mut().filter_map(|slot| slot.body.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: &str) -> Body {
        Body::new(id, 0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn stale_handles_do_not_resolve_after_slot_reuse() {
        let mut arena = BodyArena::new();
        let a = arena.insert(body("a"));
        assert_eq!(arena.remove(a).map(|b| b.id), Some("a".to_string()));

        let b = arena.insert(body("b"));
        assert_eq!(a.index(), b.index());
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).map(|b| b.id.as_str()), Some("b"));
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.handle_of("b"), Some(b));
        assert_eq!(arena.handle_of("a"), None);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut arena = BodyArena::new();
        let a = arena.insert(body("a"));
        arena.insert(body("b"));
        arena.insert(body("c"));
        arena.remove(a);
        arena.insert(body("d")); // reuses slot 0

        let ids: Vec<&str> = arena.iter().map(|(_, b)| b.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "d"]);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn get2_mut_requires_distinct_live_handles() {
        let mut arena = BodyArena::new();
        let a = arena.insert(body("a"));
        let b = arena.insert(body("b"));
        assert!(arena.get2_mut(a, a).is_none());

        let (x, y) = arena.get2_mut(b, a).unwrap();
        assert_eq!((x.id.as_str(), y.id.as_str()), ("b", "a"));

        arena.clear();
        assert!(arena.get2_mut(a, b).is_none());
        assert_eq!(arena.len(), 0);
        assert!(!arena.contains_id("a"));
    }
}
