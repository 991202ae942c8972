use super::RawHandle;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational slot store keyed by [`RawHandle`].
///
/// Slots are reused after release but carry a bumped generation, so every
/// lookup validates liveness: a stale handle simply resolves to `None`.
pub struct HandleRegistry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> HandleRegistry<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> RawHandle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            RawHandle { index, generation: slot.generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 1, value: Some(value) });
            RawHandle { index, generation: 1 }
        }
    }

    pub fn get(&self, handle: RawHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: RawHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Removes the resource and invalidates every copy of the handle.
    pub fn remove(&mut self, handle: RawHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1).max(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    pub fn contains(&self, handle: RawHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (RawHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    RawHandle { index: index as u32, generation: slot.generation },
                    value,
                )
            })
        })
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut reg = HandleRegistry::new();
        let h = reg.insert("a");
        assert_eq!(reg.get(h), Some(&"a"));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.remove(h), Some("a"));
        assert!(reg.is_empty());
    }

    #[test]
    fn stale_handle_is_rejected_after_slot_reuse() {
        let mut reg = HandleRegistry::new();
        let first = reg.insert(1u32);
        reg.remove(first);
        let second = reg.insert(2u32);
        // Same slot, new generation.
        assert_eq!(first.index, second.index);
        assert_ne!(first.generation, second.generation);
        assert!(reg.get(first).is_none());
        assert!(reg.remove(first).is_none());
        assert_eq!(reg.get(second), Some(&2));
    }

    #[test]
    fn double_remove_returns_none() {
        let mut reg = HandleRegistry::new();
        let h = reg.insert(5u8);
        assert!(reg.remove(h).is_some());
        assert!(reg.remove(h).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn iter_skips_freed_slots() {
        let mut reg = HandleRegistry::new();
        let a = reg.insert("a");
        let _b = reg.insert("b");
        reg.remove(a);
        let values: Vec<_> = reg.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["b"]);
    }
}
