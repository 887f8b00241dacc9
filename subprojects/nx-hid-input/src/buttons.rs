//! Logical button channels and their hardware masks.

use crate::shmem::NpadButton;

/// Number of logical button channels.
pub const BUTTON_COUNT: usize = 26;

/// Logical button channel. The discriminant is the channel index reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Button {
    A = 0,
    B,
    X,
    Y,
    LStick,
    RStick,
    L,
    R,
    Zl,
    Zr,
    Plus,
    Minus,
    Left,
    Up,
    Right,
    Down,
    LStickLeft,
    LStickUp,
    LStickDown,
    LStickRight,
    RStickLeft,
    RStickUp,
    RStickDown,
    RStickRight,
    Sl,
    Sr,
}

/// Channel to hardware mask table, in channel order.
pub const BUTTON_MAP: [(Button, NpadButton); BUTTON_COUNT] = [
    (Button::A, NpadButton::A),
    (Button::B, NpadButton::B),
    (Button::X, NpadButton::X),
    (Button::Y, NpadButton::Y),
    (Button::LStick, NpadButton::STICK_L),
    (Button::RStick, NpadButton::STICK_R),
    (Button::L, NpadButton::L),
    (Button::R, NpadButton::R),
    (Button::Zl, NpadButton::ZL),
    (Button::Zr, NpadButton::ZR),
    (Button::Plus, NpadButton::PLUS),
    (Button::Minus, NpadButton::MINUS),
    (Button::Left, NpadButton::LEFT),
    (Button::Up, NpadButton::UP),
    (Button::Right, NpadButton::RIGHT),
    (Button::Down, NpadButton::DOWN),
    (Button::LStickLeft, NpadButton::STICK_L_LEFT),
    (Button::LStickUp, NpadButton::STICK_L_UP),
    (Button::LStickDown, NpadButton::STICK_L_DOWN),
    (Button::LStickRight, NpadButton::STICK_L_RIGHT),
    (Button::RStickLeft, NpadButton::STICK_R_LEFT),
    (Button::RStickUp, NpadButton::STICK_R_UP),
    (Button::RStickDown, NpadButton::STICK_R_DOWN),
    (Button::RStickRight, NpadButton::STICK_R_RIGHT),
    (Button::Sl, NpadButton::ANY_SL),
    (Button::Sr, NpadButton::ANY_SR),
];

// Every channel has exactly one entry, at its own index, with a mask no other channel shares.
const _: () = assert!(is_complete_mapping(&BUTTON_MAP));

/// Whether `map` lists each channel once in index order with non-empty, disjoint masks.
pub const fn is_complete_mapping(map: &[(Button, NpadButton)]) -> bool {
    if map.len() != BUTTON_COUNT {
        return false;
    }

    let mut i = 0;
    while i < map.len() {
        let (button, mask) = map[i];
        if button as usize != i || mask.is_empty() {
            return false;
        }

        let mut j = i + 1;
        while j < map.len() {
            if mask.bits() & map[j].1.bits() != 0 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }

    true
}

impl Button {
    /// All channels in index order.
    pub const ALL: [Button; BUTTON_COUNT] = {
        let mut all = [Button::A; BUTTON_COUNT];
        let mut i = 0;
        while i < BUTTON_COUNT {
            all[i] = BUTTON_MAP[i].0;
            i += 1;
        }
        all
    };

    /// Channel index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Hardware bits that press this channel.
    #[inline]
    pub const fn mask(self) -> NpadButton {
        BUTTON_MAP[self.index()].1
    }

    /// Whether any of this channel's bits are set in `buttons`.
    #[inline]
    pub const fn is_pressed_in(self, buttons: NpadButton) -> bool {
        buttons.bits() & self.mask().bits() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_complete() {
        assert!(is_complete_mapping(&BUTTON_MAP));
        for (i, button) in Button::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
        }
    }

    #[test]
    fn rejects_duplicate_and_missing_entries() {
        let mut duplicated = BUTTON_MAP;
        duplicated[1] = (Button::A, NpadButton::A);
        assert!(!is_complete_mapping(&duplicated));

        let mut empty_mask = BUTTON_MAP;
        empty_mask[5] = (Button::RStick, NpadButton::empty());
        assert!(!is_complete_mapping(&empty_mask));

        let mut overlapping = BUTTON_MAP;
        overlapping[25] = (Button::Sr, NpadButton::LEFT_SL);
        assert!(!is_complete_mapping(&overlapping));

        assert!(!is_complete_mapping(&BUTTON_MAP[..25]));
    }

    #[test]
    fn stick_directions_follow_channel_names() {
        // hardware orders stick bits left, up, right, down
        assert_eq!(Button::LStickDown.mask(), NpadButton::STICK_L_DOWN);
        assert_eq!(Button::LStickRight.mask(), NpadButton::STICK_L_RIGHT);
        assert_eq!(Button::RStickDown.mask(), NpadButton::STICK_R_DOWN);
    }

    #[test]
    fn side_buttons_match_either_joycon() {
        assert!(Button::Sl.is_pressed_in(NpadButton::LEFT_SL));
        assert!(Button::Sl.is_pressed_in(NpadButton::RIGHT_SL));
        assert!(Button::Sr.is_pressed_in(NpadButton::RIGHT_SR));
        assert!(!Button::Sr.is_pressed_in(NpadButton::LEFT_SL));
    }
}
