//! Binary cell state.

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellState {
    Dead = 0,
    Alive = 1,
}

impl CellState {
    /// True for [`CellState::Alive`].
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    pub(crate) const fn from_raw(raw: u8) -> Self {
        if raw == 0 { Self::Dead } else { Self::Alive }
    }

    pub(crate) const fn to_raw(self) -> u8 {
        self as u8
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive { Self::Alive } else { Self::Dead }
    }
}
