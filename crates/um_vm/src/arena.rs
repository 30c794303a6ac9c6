//! Handle-indexed arrays with LIFO handle reuse.
//!
//! Slots are never removed from the table, so handles stay stable; an
//! abandoned slot is set to `None` and its handle pushed on the free stack.

use crate::{error::Fault, Platter};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Arena {
    slots: Vec<Option<Vec<Platter>>>,
    free: Vec<Platter>,
}

impl Arena {
    /// Create an arena whose handle 0 holds `program`.
    pub fn new(program: Vec<Platter>) -> Self {
        Self { slots: vec![Some(program)], free: Vec::new() }
    }

    /// The array currently at handle 0.
    pub fn program(&self) -> &[Platter] {
        // Handle 0 can be neither abandoned nor replaced by a vacant slot.
        self.slots[0].as_deref().unwrap_or(&[])
    }

    pub fn get(&self, handle: Platter) -> Result<&[Platter], Fault> {
        self.slots
            .get(handle as usize)
            .and_then(|s| s.as_deref())
            .ok_or(Fault::InvalidHandle(handle))
    }

    fn get_mut(&mut self, handle: Platter) -> Result<&mut Vec<Platter>, Fault> {
        self.slots
            .get_mut(handle as usize)
            .and_then(|s| s.as_mut())
            .ok_or(Fault::InvalidHandle(handle))
    }

    /// Create a zero-filled array of `len` platters. The most recently
    /// abandoned handle is reused first; otherwise a fresh one is appended.
    /// A length the host cannot back is `AllocationFailed` and leaves the arena as it was.
    pub fn allocate(&mut self, len: Platter) -> Result<Platter, Fault> {
        let mut array = Vec::new();
        array
            .try_reserve_exact(len as usize)
            .map_err(|_| Fault::AllocationFailed { len })?;
        array.resize(len as usize, 0);
        if let Some(handle) = self.free.pop() {
            trace!(handle, len, "reusing abandoned handle");
            self.slots[handle as usize] = Some(array);
            return Ok(handle);
        }
        let handle = Platter::try_from(self.slots.len()).map_err(|_| Fault::ArenaExhausted)?;
        self.slots.push(Some(array));
        Ok(handle)
    }

    pub fn abandon(&mut self, handle: Platter) -> Result<(), Fault> {
        if handle == 0 {
            return Err(Fault::DoubleFree(0));
        }
        match self.slots.get_mut(handle as usize) {
            None => Err(Fault::InvalidHandle(handle)),
            Some(None) => Err(Fault::DoubleFree(handle)),
            Some(slot) => {
                *slot = None;
                self.free.push(handle);
                Ok(())
            }
        }
    }

    pub fn read(&self, handle: Platter, offset: Platter) -> Result<Platter, Fault> {
        let array = self.get(handle)?;
        array
            .get(offset as usize)
            .copied()
            .ok_or(Fault::OutOfBounds { handle, offset, len: array.len() })
    }

    pub fn write(&mut self, handle: Platter, offset: Platter, value: Platter) -> Result<(), Fault> {
        let array = self.get_mut(handle)?;
        let len = array.len();
        let cell = array
            .get_mut(offset as usize)
            .ok_or(Fault::OutOfBounds { handle, offset, len })?;
        *cell = value;
        Ok(())
    }

    /// Replace the contents of handle 0 with a copy of `handle`'s array.
    /// Handle 0 itself is left untouched.
    pub fn replace_zero(&mut self, handle: Platter) -> Result<(), Fault> {
        if handle == 0 {
            return Ok(());
        }
        let copy = self.get(handle)?.to_vec();
        self.slots[0] = Some(copy);
        Ok(())
    }

    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_reused_lifo() {
        let mut arena = Arena::new(vec![]);
        assert_eq!(arena.allocate(1), Ok(1));
        assert_eq!(arena.allocate(1), Ok(2));
        arena.abandon(1).unwrap();
        assert_eq!(arena.allocate(4), Ok(1));
        assert_eq!(arena.allocate(4), Ok(3));

        arena.abandon(2).unwrap();
        arena.abandon(3).unwrap();
        assert_eq!(arena.free_count(), 2);
        assert_eq!(arena.allocate(0), Ok(3));
        assert_eq!(arena.allocate(0), Ok(2));
        assert_eq!(arena.live_count(), 4);
    }

    #[test]
    fn failed_allocation_leaves_free_stack_alone() {
        let mut arena = Arena::new(vec![]);
        let h = arena.allocate(1).unwrap();
        arena.abandon(h).unwrap();
        assert_eq!(arena.allocate(Platter::MAX), Err(Fault::AllocationFailed { len: Platter::MAX }));
        assert_eq!(arena.free_count(), 1);
        assert_eq!(arena.allocate(0), Ok(h));
    }

    #[test]
    fn reused_array_is_zeroed_and_resized() {
        let mut arena = Arena::new(vec![]);
        let h = arena.allocate(2).unwrap();
        arena.write(h, 1, 99).unwrap();
        arena.abandon(h).unwrap();
        let h2 = arena.allocate(5).unwrap();
        assert_eq!(h, h2);
        assert_eq!(arena.get(h2).unwrap(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn offset_equal_to_length_is_out_of_bounds() {
        let mut arena = Arena::new(vec![7, 8]);
        let h = arena.allocate(3).unwrap();
        assert_eq!(arena.read(h, 3), Err(Fault::OutOfBounds { handle: h, offset: 3, len: 3 }));
        assert_eq!(arena.write(h, 3, 1), Err(Fault::OutOfBounds { handle: h, offset: 3, len: 3 }));
        assert_eq!(arena.read(0, 1), Ok(8));
        assert_eq!(arena.read(0, 2), Err(Fault::OutOfBounds { handle: 0, offset: 2, len: 2 }));
    }

    #[test]
    fn freed_and_unknown_handles_are_rejected() {
        let mut arena = Arena::new(vec![]);
        let h = arena.allocate(1).unwrap();
        arena.abandon(h).unwrap();
        assert_eq!(arena.read(h, 0), Err(Fault::InvalidHandle(h)));
        assert_eq!(arena.write(h, 0, 1), Err(Fault::InvalidHandle(h)));
        assert_eq!(arena.replace_zero(h), Err(Fault::InvalidHandle(h)));
        assert_eq!(arena.read(42, 0), Err(Fault::InvalidHandle(42)));
        assert_eq!(arena.abandon(42), Err(Fault::InvalidHandle(42)));
    }

    #[test]
    fn double_free_and_program_free() {
        let mut arena = Arena::new(vec![1]);
        let h = arena.allocate(1).unwrap();
        arena.abandon(h).unwrap();
        assert_eq!(arena.abandon(h), Err(Fault::DoubleFree(h)));
        assert_eq!(arena.abandon(0), Err(Fault::DoubleFree(0)));
        assert_eq!(arena.free_count(), 1);
        assert_eq!(arena.program(), &[1]);
    }

    #[test]
    fn replace_zero_copies() {
        let mut arena = Arena::new(vec![1, 2, 3]);
        let h = arena.allocate(2).unwrap();
        arena.write(h, 0, 10).unwrap();
        arena.write(h, 1, 11).unwrap();
        arena.replace_zero(h).unwrap();
        assert_eq!(arena.program(), &[10, 11]);
        arena.write(h, 0, 0).unwrap();
        assert_eq!(arena.program(), &[10, 11]);

        arena.replace_zero(0).unwrap();
        assert_eq!(arena.program(), &[10, 11]);
    }
}
