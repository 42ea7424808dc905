//! Types of ISOTXS scattering blocks

use serde::Serialize;

/// Reaction type of a scattering block, from `IDSCT = 100 * type + order`
///
/// # Assumption on n2n
///
/// ISOTXS does not say whether an n2n block holds the reaction cross section
/// or the neutron production cross section. Blocks are taken to be reaction
/// based, so the production matrix is the stored matrix scaled by the
/// [multiplicity](ScatterKind::multiplicity) of 2. Nothing is converted on
/// read or write, the stored values are kept as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScatterKind {
    Total,
    Elastic,
    Inelastic,
    N2n,
}

impl ScatterKind {
    /// Split `IDSCT` into the block type and the first Legendre order
    ///
    /// ```rust
    /// # use cccc_scatter::ScatterKind;
    /// assert_eq!(ScatterKind::from_idsct(100), Some((ScatterKind::Elastic, 0)));
    /// assert_eq!(ScatterKind::from_idsct(301), Some((ScatterKind::N2n, 1)));
    /// assert_eq!(ScatterKind::from_idsct(400), None);
    /// ```
    pub fn from_idsct(idsct: i32) -> Option<(Self, usize)> {
        if idsct < 0 {
            return None;
        }
        let kind = match idsct / 100 {
            0 => Self::Total,
            1 => Self::Elastic,
            2 => Self::Inelastic,
            3 => Self::N2n,
            _ => return None,
        };
        Some((kind, (idsct % 100) as usize))
    }

    /// `IDSCT` of a block of this type starting at `first_order`
    pub fn idsct(&self, first_order: usize) -> i32 {
        let base = match self {
            Self::Total => 0,
            Self::Elastic => 100,
            Self::Inelastic => 200,
            Self::N2n => 300,
        };
        base + first_order as i32
    }

    /// Neutrons emitted per reaction
    pub fn multiplicity(&self) -> f32 {
        match self {
            Self::N2n => 2.0,
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for ScatterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Total => write!(f, "total"),
            Self::Elastic => write!(f, "elastic"),
            Self::Inelastic => write!(f, "inelastic"),
            Self::N2n => write!(f, "n2n"),
        }
    }
}
