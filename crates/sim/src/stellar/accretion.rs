//! Accretion regimes and the shell each one feeds.

use std::fmt;

/// Physical mode under which a white dwarf currently accretes.
///
/// Set by the evolution engine; the white dwarf kernel only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccretionRegime {
    #[default]
    Unset,
    HeliumAccumulation,
    HeliumFlashes,
    HeliumStableBurning,
    HeliumOptThickWinds,
    HeliumWhiteDwarfHeliumSubChandrasekhar,
    HeliumWhiteDwarfHeliumIgnition,
    HydrogenFlashes,
    HydrogenStableBurning,
    HydrogenOptThickWinds,
    HeliumWhiteDwarfHydrogenFlashes,
    HeliumWhiteDwarfHydrogenAccumulation,
}

/// Surface shell that receives accreted material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Hydrogen,
    Helium,
}

impl AccretionRegime {
    pub const ALL: [AccretionRegime; 12] = [
        Self::Unset,
        Self::HeliumAccumulation,
        Self::HeliumFlashes,
        Self::HeliumStableBurning,
        Self::HeliumOptThickWinds,
        Self::HeliumWhiteDwarfHeliumSubChandrasekhar,
        Self::HeliumWhiteDwarfHeliumIgnition,
        Self::HydrogenFlashes,
        Self::HydrogenStableBurning,
        Self::HydrogenOptThickWinds,
        Self::HeliumWhiteDwarfHydrogenFlashes,
        Self::HeliumWhiteDwarfHydrogenAccumulation,
    ];

    /// Shell fed in this regime; `None` for an unset regime.
    pub const fn shell(self) -> Option<Shell> {
        match self {
            Self::Unset => None,
            Self::HeliumAccumulation
            | Self::HeliumFlashes
            | Self::HeliumStableBurning
            | Self::HeliumOptThickWinds
            | Self::HeliumWhiteDwarfHeliumSubChandrasekhar
            | Self::HeliumWhiteDwarfHeliumIgnition => Some(Shell::Helium),
            Self::HydrogenFlashes
            | Self::HydrogenStableBurning
            | Self::HydrogenOptThickWinds
            | Self::HeliumWhiteDwarfHydrogenFlashes
            | Self::HeliumWhiteDwarfHydrogenAccumulation => Some(Shell::Hydrogen),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::HeliumAccumulation => "helium accumulation",
            Self::HeliumFlashes => "helium flashes",
            Self::HeliumStableBurning => "helium stable burning",
            Self::HeliumOptThickWinds => "helium optically thick winds",
            Self::HeliumWhiteDwarfHeliumSubChandrasekhar => "helium on HeWD, sub-Chandrasekhar",
            Self::HeliumWhiteDwarfHeliumIgnition => "helium on HeWD, ignition",
            Self::HydrogenFlashes => "hydrogen flashes",
            Self::HydrogenStableBurning => "hydrogen stable burning",
            Self::HydrogenOptThickWinds => "hydrogen optically thick winds",
            Self::HeliumWhiteDwarfHydrogenFlashes => "hydrogen on HeWD, flashes",
            Self::HeliumWhiteDwarfHydrogenAccumulation => "hydrogen on HeWD, accumulation",
        }
    }
}

impl fmt::Display for AccretionRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
