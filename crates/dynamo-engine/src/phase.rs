//! The phase seam: one step of one component chain per tick.
//!
//! A [`Phase`] is the unit of simulation logic. The engine runs its
//! phases in a fixed order every tick, each seeing the writes of the
//! phases before it. Phases own their key strings (built once at
//! construction) and read and write the store through the typed
//! accessors, so a mis-shaped store surfaces as a [`PhaseError`]
//! instead of a panic.

use std::error::Error;
use std::fmt;

use rand_chacha::ChaCha8Rng;

use dynamo_core::{TickId, VarError};
use dynamo_store::VarStore;

/// Everything a phase may touch during one tick.
///
/// The store reference points into the locked [`VarStore`]; the RNG is
/// the engine's seeded stream, shared across phases in order so a
/// fixed seed reproduces the whole trajectory.
pub struct PhaseContext<'a> {
    /// The locked variable store.
    pub vars: &'a mut VarStore,
    /// The engine's deterministic random stream.
    pub rng: &'a mut ChaCha8Rng,
    /// The tick being executed.
    pub tick: TickId,
}

/// One ordered step of the simulation pipeline.
pub trait Phase: Send {
    /// Stable name, used in metrics and failure reports.
    fn name(&self) -> &str;

    /// Advance this phase's component by one tick.
    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError>;
}

/// A phase could not complete its step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseError {
    /// A typed variable access failed.
    Var(VarError),
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(e) => write!(f, "{e}"),
        }
    }
}

impl Error for PhaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Var(e) => Some(e),
        }
    }
}

impl From<VarError> for PhaseError {
    fn from(e: VarError) -> Self {
        Self::Var(e)
    }
}
