//! Length units used throughout the compositor.
//!
//! All layout math is carried out in PDF points ([`Pt`], 1/72 of an inch).
//! [`Mm`] exists for margins given in millimetres and converts into points.

use derive_more::{
    Add, AddAssign, Deref, DerefMut, Display, Div, From, Into, Mul, MulAssign, Sub, SubAssign, Sum,
};
use serde::{Deserialize, Serialize};

/// A length in PDF points
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Mul,
    Div,
    MulAssign,
    Sum,
    Deref,
    DerefMut,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Pt(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, From, Into, Display)]
pub struct Mm(pub f32);

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    /// The larger of two lengths
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// The smaller of two lengths
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    /// `true` if the value is finite and not negative
    pub fn is_valid_length(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl std::ops::Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Pt {
        Pt(-self.0)
    }
}

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * 72.0 / 25.4)
    }
}

impl From<Pt> for Mm {
    fn from(value: Pt) -> Self {
        Mm(value.0 * 25.4 / 72.0)
    }
}
