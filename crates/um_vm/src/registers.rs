use crate::{decode::Reg, Platter};
use std::ops::{Index, IndexMut};

/// The eight general-purpose registers. All start at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers([Platter; 8]);

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_array(&self) -> &[Platter; 8] {
        &self.0
    }
}

impl Index<Reg> for Registers {
    type Output = Platter;

    fn index(&self, r: Reg) -> &Platter {
        &self.0[r.index()]
    }
}

impl IndexMut<Reg> for Registers {
    fn index_mut(&mut self, r: Reg) -> &mut Platter {
        &mut self.0[r.index()]
    }
}
