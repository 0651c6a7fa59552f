use std::fmt;

/// Terminal (or in-progress) state of a population run or of one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvolutionStatus {
    Continue,
    Done,
    Stopped,
    Error,
    TimesUp,
    StellarMerger,
    Unbound,
    DoubleCompactObject,
    WhiteDwarfWhiteDwarf,
    MasslessRemnant,
    AisExploratory,
}

impl EvolutionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Continue => "Simulation in progress",
            Self::Done => "Simulation completed",
            Self::Stopped => "Simulation stopped",
            Self::Error => "An error occurred",
            Self::TimesUp => "Allowed time exceeded",
            Self::StellarMerger => "Stars merged",
            Self::Unbound => "Unbound binary",
            Self::DoubleCompactObject => "Double compact object formed",
            Self::WhiteDwarfWhiteDwarf => "Double white dwarf formed",
            Self::MasslessRemnant => "Massless remnant formed",
            Self::AisExploratory => "Exploratory phase of adaptive importance sampling completed",
        }
    }

    /// Everything except `Continue` ends an evolution loop.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }

    /// Run-level statuses that mean the population was not fully processed.
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Stopped | Self::Error)
    }
}

impl fmt::Display for EvolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
