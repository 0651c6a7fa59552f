use std::fmt;

use crate::base::constants::{CO_WD_BARYON_NUMBER, HE_WD_BARYON_NUMBER, ONE_WD_BARYON_NUMBER};

/// Stellar type classification reported for every evolved star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StellarType {
    /// Fully convective main sequence star (M <= 0.7 Msol).
    MainSequenceLowMass,
    MainSequence,
    HeliumWhiteDwarf,
    CarbonOxygenWhiteDwarf,
    OxygenNeonWhiteDwarf,
    NeutronStar,
    BlackHole,
    MasslessRemnant,
}

impl StellarType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MainSequenceLowMass => "Main_Sequence_<=_0.7",
            Self::MainSequence => "Main_Sequence_>_0.7",
            Self::HeliumWhiteDwarf => "Helium_White_Dwarf",
            Self::CarbonOxygenWhiteDwarf => "Carbon-Oxygen_White_Dwarf",
            Self::OxygenNeonWhiteDwarf => "Oxygen-Neon_White_Dwarf",
            Self::NeutronStar => "Neutron_Star",
            Self::BlackHole => "Black_Hole",
            Self::MasslessRemnant => "Massless_Remnant",
        }
    }

    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::MainSequenceLowMass => "MS_lte_07",
            Self::MainSequence => "MS_gt_07",
            Self::HeliumWhiteDwarf => "HeWD",
            Self::CarbonOxygenWhiteDwarf => "COWD",
            Self::OxygenNeonWhiteDwarf => "ONeWD",
            Self::NeutronStar => "NS",
            Self::BlackHole => "BH",
            Self::MasslessRemnant => "MR",
        }
    }

    /// Main sequence type for a zero-age star of `mass`.
    pub fn main_sequence(mass: f64) -> Self {
        if mass <= 0.7 {
            Self::MainSequenceLowMass
        } else {
            Self::MainSequence
        }
    }

    pub const fn is_white_dwarf(self) -> bool {
        matches!(
            self,
            Self::HeliumWhiteDwarf | Self::CarbonOxygenWhiteDwarf | Self::OxygenNeonWhiteDwarf
        )
    }

    pub const fn is_compact(self) -> bool {
        matches!(self, Self::NeutronStar | Self::BlackHole)
    }

    /// Baryon number of the white dwarf composition, used by the cooling law.
    pub const fn baryon_number(self) -> Option<f64> {
        match self {
            Self::HeliumWhiteDwarf => Some(HE_WD_BARYON_NUMBER),
            Self::CarbonOxygenWhiteDwarf => Some(CO_WD_BARYON_NUMBER),
            Self::OxygenNeonWhiteDwarf => Some(ONE_WD_BARYON_NUMBER),
            _ => None,
        }
    }
}

impl fmt::Display for StellarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
