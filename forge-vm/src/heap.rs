use crate::error::{RuntimeError, RuntimeResult};
use crate::stack_value::StackValue;

/// Index into a [`Heap`]'s arena. Stable across collections: a live object
/// never moves, so a `HeapId` captured before a `collect()` still resolves
/// to the same object afterward (or fails with `UndefinedHeapReference` if
/// that object didn't survive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapId(u32);

impl HeapId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Heap-allocated runtime data. Primitive string *literals* live in the
/// virtual machine's flat intern table, not here — this is for values whose
/// size or lifetime isn't known at compile time: runtime string results
/// (concatenation) and arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum HeapObject {
    Str(String),
    Array(Vec<StackValue>),
}

impl HeapObject {
    fn estimated_size(&self) -> usize {
        match self {
            HeapObject::Str(s) => 16 + s.len(),
            HeapObject::Array(elems) => 16 + elems.len() * std::mem::size_of::<StackValue>(),
        }
    }

    fn child_refs(&self, out: &mut Vec<HeapId>) {
        if let HeapObject::Array(elems) = self {
            for elem in elems {
                if let StackValue::HeapRef(id) = elem {
                    out.push(*id);
                }
            }
        }
    }
}

/// A slab-arena heap with mark-and-sweep collection. The arena is a plain
/// `Vec<Option<HeapObject>>` indexed by `HeapId`, with freed slots queued on
/// `free_list` for reuse by the next allocation. `bytesAllocated`/`nextGC`
/// carry over unchanged: collection triggers once allocated bytes exceed the
/// threshold, and the threshold doubles after every allocation.
#[derive(Debug, Default)]
pub struct Heap {
    entries: Vec<Option<HeapObject>>,
    free_list: Vec<HeapId>,
    bytes_allocated: usize,
    next_gc: usize,
}

const INITIAL_GC_THRESHOLD: usize = 1024;

impl Heap {
    pub fn new() -> Self {
        Self { next_gc: INITIAL_GC_THRESHOLD, ..Self::default() }
    }

    pub fn bytes_allocated(&self) -> usize {
        self.bytes_allocated
    }

    pub fn next_gc(&self) -> usize {
        self.next_gc
    }

    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Allocates `object`, running a collection first if the byte threshold
    /// has been crossed. `roots` must enumerate every `HeapId` currently
    /// reachable from the virtual machine's stack, locals, globals, and call
    /// frames — anything not reachable from them is swept.
    pub fn allocate(&mut self, object: HeapObject, roots: &[HeapId]) -> HeapId {
        let size = object.estimated_size();

        let id = if let Some(id) = self.free_list.pop() {
            self.entries[id.index()] = Some(object);
            id
        } else {
            let id = HeapId(self.entries.len() as u32);
            self.entries.push(Some(object));
            id
        };

        self.bytes_allocated += size;
        if self.bytes_allocated > self.next_gc {
            self.collect(roots);
        }
        self.next_gc = self.bytes_allocated.max(INITIAL_GC_THRESHOLD) * 2;

        id
    }

    pub fn get(&self, id: HeapId) -> RuntimeResult<&HeapObject> {
        self.entries
            .get(id.index())
            .and_then(|slot| slot.as_ref())
            .ok_or(RuntimeError::UndefinedHeapReference)
    }

    pub fn get_mut(&mut self, id: HeapId) -> RuntimeResult<&mut HeapObject> {
        self.entries
            .get_mut(id.index())
            .and_then(|slot| slot.as_mut())
            .ok_or(RuntimeError::UndefinedHeapReference)
    }

    /// Marks everything reachable from `roots` via breadth-first traversal,
    /// then frees every unmarked slot.
    pub fn collect(&mut self, roots: &[HeapId]) {
        let mut reachable = vec![false; self.entries.len()];
        let mut work_list: Vec<HeapId> = roots.to_vec();

        while let Some(id) = work_list.pop() {
            let idx = id.index();
            if idx >= reachable.len() || reachable[idx] {
                continue;
            }
            reachable[idx] = true;
            if let Some(Some(obj)) = self.entries.get(idx) {
                obj.child_refs(&mut work_list);
            }
        }

        for (idx, slot) in self.entries.iter_mut().enumerate() {
            if reachable[idx] {
                continue;
            }
            if let Some(obj) = slot.take() {
                self.bytes_allocated = self.bytes_allocated.saturating_sub(obj.estimated_size());
                self.free_list.push(HeapId(idx as u32));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_objects_are_collected() {
        let mut heap = Heap::new();
        let kept = heap.allocate(HeapObject::Str("kept".into()), &[]);
        let _garbage = heap.allocate(HeapObject::Str("garbage".into()), &[]);

        heap.collect(&[kept]);

        assert!(heap.get(kept).is_ok());
        assert_eq!(heap.live_count(), 1);
    }

    #[test]
    fn reachable_array_keeps_its_elements_alive() {
        let mut heap = Heap::new();
        let inner = heap.allocate(HeapObject::Str("inner".into()), &[]);
        let outer = heap.allocate(HeapObject::Array(vec![StackValue::HeapRef(inner)]), &[inner]);

        heap.collect(&[outer]);

        assert!(heap.get(outer).is_ok());
        assert!(heap.get(inner).is_ok());
    }

    #[test]
    fn freed_slots_are_recycled() {
        let mut heap = Heap::new();
        let a = heap.allocate(HeapObject::Str("a".into()), &[]);
        heap.collect(&[]);
        assert!(heap.get(a).is_err());

        let b = heap.allocate(HeapObject::Str("b".into()), &[]);
        assert_eq!(a.index(), b.index());
    }

    #[test]
    fn gc_threshold_doubles_after_each_allocation() {
        let mut heap = Heap::new();
        assert_eq!(heap.next_gc(), INITIAL_GC_THRESHOLD);
        heap.allocate(HeapObject::Str("x".into()), &[]);
        assert!(heap.next_gc() > INITIAL_GC_THRESHOLD);
    }
}
