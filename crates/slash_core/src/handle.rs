//! Type-safe generational handles and the arena built on them
//!
//! A handle is only valid while the slot it points at still holds the value
//! it was issued for. Removing a value bumps the slot generation, so a handle
//! kept by a renderer after its body was sliced simply stops resolving.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A type-safe handle to a value of type T stored in a [`HandleMap`]
#[repr(transparent)]
pub struct Handle<T> {
    /// Lower 32 bits: index, Upper 32 bits: generation
    bits: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Create a new handle from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
            _marker: PhantomData,
        }
    }

    /// Create an invalid/null handle
    #[inline]
    pub const fn null() -> Self {
        Self {
            bits: u64::MAX,
            _marker: PhantomData,
        }
    }

    /// Check if this handle is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    /// Get the index portion
    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    /// Get the generation portion
    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }
}

// Manual trait implementations to avoid T bounds
impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Handle(null)")
        } else {
            write!(f, "Handle({}v{})", self.index(), self.generation())
        }
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index(), self.generation())
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

/// Allocates handles with generation tracking
pub struct HandleAllocator<T> {
    /// Generation of each slot
    generations: Vec<u32>,
    /// Whether each slot is currently handed out
    live: Vec<bool>,
    /// Free list of available indices
    free_list: Vec<u32>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HandleAllocator<T> {
    /// Create a new handle allocator
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create with specific initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Allocate a new handle
    pub fn allocate(&mut self) -> Handle<T> {
        if let Some(index) = self.free_list.pop() {
            self.live[index as usize] = true;
            Handle::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            debug_assert!(index < u32::MAX, "handle allocator exhausted");
            self.generations.push(0);
            self.live.push(true);
            Handle::new(index, 0)
        }
    }

    /// Free a handle, making its index available for reuse
    pub fn free(&mut self, handle: Handle<T>) -> bool {
        if !self.is_valid(handle) {
            return false;
        }
        let index = handle.index() as usize;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.live[index] = false;
        self.free_list.push(handle.index());
        true
    }

    /// Check if a handle is still valid
    pub fn is_valid(&self, handle: Handle<T>) -> bool {
        if handle.is_null() {
            return false;
        }
        let index = handle.index() as usize;
        index < self.generations.len()
            && self.live[index]
            && self.generations[index] == handle.generation()
    }

    /// Current handle for a slot, if the slot is live
    fn handle_at(&self, index: usize) -> Option<Handle<T>> {
        if *self.live.get(index)? {
            Some(Handle::new(index as u32, self.generations[index]))
        } else {
            None
        }
    }

    /// Get the number of allocated handles
    pub fn len(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }

    /// Check if no handles are allocated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for HandleAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle map that stores values associated with handles
///
/// Iteration order is slot order, which is stable for a given sequence of
/// inserts and removals.
pub struct HandleMap<T> {
    allocator: HandleAllocator<T>,
    values: Vec<Option<T>>,
}

impl<T> HandleMap<T> {
    /// Create a new handle map
    pub fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            values: Vec::new(),
        }
    }

    /// Insert a value and get a handle to it
    pub fn insert(&mut self, value: T) -> Handle<T> {
        let handle = self.allocator.allocate();
        let index = handle.index() as usize;

        if index >= self.values.len() {
            self.values.resize_with(index + 1, || None);
        }
        self.values[index] = Some(value);
        handle
    }

    /// Remove a value by its handle
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        if !self.allocator.free(handle) {
            return None;
        }
        self.values[handle.index() as usize].take()
    }

    /// Get a reference to a value by its handle
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if !self.allocator.is_valid(handle) {
            return None;
        }
        self.values.get(handle.index() as usize)?.as_ref()
    }

    /// Get a mutable reference to a value by its handle
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if !self.allocator.is_valid(handle) {
            return None;
        }
        self.values.get_mut(handle.index() as usize)?.as_mut()
    }

    /// Get the number of values
    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.allocator.is_empty()
    }

    /// Snapshot of every live handle, in slot order
    pub fn handles(&self) -> Vec<Handle<T>> {
        (0..self.values.len())
            .filter_map(|i| self.allocator.handle_at(i))
            .collect()
    }

    /// Iterate over all valid handles and values
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let allocator = &self.allocator;
        self.values
            .iter()
            .enumerate()
            .filter_map(move |(i, opt)| Some((allocator.handle_at(i)?, opt.as_ref()?)))
    }

    /// Iterate over all valid handles and mutable values
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> {
        let allocator = &self.allocator;
        self.values
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, opt)| Some((allocator.handle_at(i)?, opt.as_mut()?)))
    }

    /// Remove every value for which `keep` returns false, returning the
    /// handles that were dropped
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<Handle<T>>
    where
        F: FnMut(Handle<T>, &T) -> bool,
    {
        let doomed: Vec<Handle<T>> = self
            .iter()
            .filter(|(handle, value)| !keep(*handle, value))
            .map(|(handle, _)| handle)
            .collect();
        for handle in &doomed {
            self.remove(*handle);
        }
        doomed
    }

    /// Remove every value
    pub fn clear(&mut self) {
        for handle in self.handles() {
            self.remove(handle);
        }
    }
}

impl<T> Default for HandleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_allocation() {
        let mut alloc: HandleAllocator<i32> = HandleAllocator::new();
        let h1 = alloc.allocate();
        let h2 = alloc.allocate();

        assert!(alloc.is_valid(h1));
        assert!(alloc.is_valid(h2));
        assert_ne!(h1, h2);

        assert!(alloc.free(h1));
        assert!(!alloc.is_valid(h1));
        assert!(!alloc.free(h1), "double free must be rejected");

        let h3 = alloc.allocate();
        assert_eq!(h3.index(), h1.index());
        assert_ne!(h3.generation(), h1.generation());
    }

    #[test]
    fn test_null_handle_never_valid() {
        let alloc: HandleAllocator<u8> = HandleAllocator::new();
        assert!(!alloc.is_valid(Handle::null()));
        assert!(Handle::<u8>::default().is_null());
    }

    #[test]
    fn test_handle_map() {
        let mut map: HandleMap<String> = HandleMap::new();
        let h1 = map.insert("hello".to_string());
        let h2 = map.insert("world".to_string());

        assert_eq!(map.get(h1), Some(&"hello".to_string()));
        assert_eq!(map.get(h2), Some(&"world".to_string()));

        map.remove(h1);
        assert_eq!(map.get(h1), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut map: HandleMap<u32> = HandleMap::new();
        let old = map.insert(1);
        map.remove(old);
        let new = map.insert(2);

        assert_eq!(old.index(), new.index());
        assert_eq!(map.get(old), None);
        assert_eq!(map.get(new), Some(&2));
    }

    #[test]
    fn test_retain_and_clear() {
        let mut map: HandleMap<u32> = HandleMap::new();
        let handles: Vec<_> = (0..6).map(|i| map.insert(i)).collect();

        let dropped = map.retain(|_, v| v % 2 == 0);
        assert_eq!(dropped, vec![handles[1], handles[3], handles[5]]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![0, 2, 4]);

        map.clear();
        assert!(map.is_empty());
        assert!(map.handles().is_empty());
    }
}
