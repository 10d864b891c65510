//! Piece kinds, and the wire letter each one is encoded as.

use cornerjump_protocol::Side;
use serde::{Deserialize, Serialize};

use crate::square::{ALL_DIRECTIONS, DIAGONAL, Direction, ORTHOGONAL};

/// What a piece is, independent of which side owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// Steps one square orthogonally. Never captures.
    Defender,
    /// Slides and captures along ranks and files.
    OrthogonalSlider,
    /// Slides and captures along diagonals.
    DiagonalSlider,
    /// Slides and captures in all eight directions.
    OmniSlider,
    /// Obstacle piece from the blocker variant. Slides up to three
    /// squares or jumps; never captures and can't be captured over.
    Blocker,
}

impl PieceKind {
    /// Directions this kind scans when looking for captures. Sliders
    /// also move (without capturing) along the same set.
    pub fn capture_directions(self) -> &'static [Direction] {
        match self {
            Self::OrthogonalSlider => &ORTHOGONAL,
            Self::DiagonalSlider => &DIAGONAL,
            Self::OmniSlider => &ALL_DIRECTIONS,
            Self::Defender | Self::Blocker => &[],
        }
    }

    /// Attackers are the pieces counted for the win condition.
    pub fn is_attacker(self) -> bool {
        matches!(
            self,
            Self::OrthogonalSlider | Self::DiagonalSlider | Self::OmniSlider
        )
    }

    fn letter(self) -> char {
        match self {
            Self::Defender => 'D',
            Self::OrthogonalSlider => 'R',
            Self::DiagonalSlider => 'B',
            Self::OmniSlider => 'Q',
            Self::Blocker => 'X',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'D' => Some(Self::Defender),
            'R' => Some(Self::OrthogonalSlider),
            'B' => Some(Self::DiagonalSlider),
            'Q' => Some(Self::OmniSlider),
            'X' => Some(Self::Blocker),
            _ => None,
        }
    }
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Single-letter wire code. Uppercase is [`Side::First`].
    pub fn code(self) -> char {
        let letter = self.kind.letter();
        match self.side {
            Side::First => letter,
            Side::Second => letter.to_ascii_lowercase(),
        }
    }

    /// Parses a wire code produced by [`Piece::code`].
    pub fn from_code(code: char) -> Option<Self> {
        let kind = PieceKind::from_letter(code.to_ascii_uppercase())?;
        let side = if code.is_ascii_uppercase() {
            Side::First
        } else {
            Side::Second
        };
        Some(Self { kind, side })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_case_follows_side() {
        let first = Piece::new(PieceKind::OmniSlider, Side::First);
        let second = Piece::new(PieceKind::OmniSlider, Side::Second);
        assert_eq!(first.code(), 'Q');
        assert_eq!(second.code(), 'q');
        assert_eq!(Piece::from_code('q'), Some(second));
    }

    #[test]
    fn test_from_code_unknown_letter() {
        assert_eq!(Piece::from_code('k'), None);
        assert_eq!(Piece::from_code('.'), None);
    }

    #[test]
    fn test_only_sliders_are_attackers() {
        assert!(!PieceKind::Defender.is_attacker());
        assert!(!PieceKind::Blocker.is_attacker());
        assert!(PieceKind::OrthogonalSlider.is_attacker());
        assert!(PieceKind::DiagonalSlider.is_attacker());
        assert!(PieceKind::OmniSlider.is_attacker());
    }

    #[test]
    fn test_defender_and_blocker_have_no_capture_directions() {
        assert!(PieceKind::Defender.capture_directions().is_empty());
        assert!(PieceKind::Blocker.capture_directions().is_empty());
        assert_eq!(PieceKind::OmniSlider.capture_directions().len(), 8);
    }
}
