/// Stable handle into a [`SlotArena`]. The generation invalidates stale handles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SlotId {
    pub index: u32,
    pub generation: u32,
}

/// Slot storage with generational indices and a free list. Removing an item
/// never shifts the others, so handles stay valid while pruning.
#[derive(Clone, Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    count: usize,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    pub fn insert(&mut self, item: T) -> SlotId {
        self.count += 1;
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.slots[idx] = Some(item);
            SlotId {
                index,
                generation: self.generations[idx],
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(item));
            self.generations.push(0);
            SlotId {
                index,
                generation: 0,
            }
        }
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let idx = id.index as usize;
        if idx >= self.slots.len() || self.generations[idx] != id.generation {
            return None;
        }
        let item = self.slots[idx].take()?;
        self.release(idx);
        Some(item)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        let idx = id.index as usize;
        if idx < self.slots.len() && self.generations[idx] == id.generation {
            self.slots[idx].as_ref()
        } else {
            None
        }
    }

    /// Drop every item the predicate rejects; returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        for idx in 0..self.slots.len() {
            let drop_it = matches!(&self.slots[idx], Some(item) if !keep(item));
            if drop_it {
                self.slots[idx] = None;
                self.release(idx);
                removed += 1;
            }
        }
        removed
    }

    /// Iterate (handle, item) over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.as_ref().map(|item| {
                (
                    SlotId {
                        index: i as u32,
                        generation: self.generations[i],
                    },
                    item,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn release(&mut self, idx: usize) {
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(idx as u32);
        self.count -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generational_handles_invalidate_after_remove() {
        let mut arena = SlotArena::new();
        let a = arena.insert("first");
        assert_eq!(arena.get(a), Some(&"first"));

        assert_eq!(arena.remove(a), Some("first"));
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());

        let b = arena.insert("second");
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);
    }

    #[test]
    fn retain_prunes_without_disturbing_survivors() {
        let mut arena = SlotArena::new();
        let ids: Vec<SlotId> = (0..5).map(|i| arena.insert(i)).collect();

        let removed = arena.retain(|v| v % 2 == 0);
        assert_eq!(removed, 2);
        assert_eq!(arena.len(), 3);
        assert!(!arena.is_empty());
        assert_eq!(arena.get(ids[0]), Some(&0));
        assert_eq!(arena.get(ids[4]), Some(&4));
        assert!(arena.get(ids[1]).is_none());

        let survivors: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(survivors, vec![0, 2, 4]);
    }
}
