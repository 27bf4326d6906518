//! Session-held seed and request phase.

use rand::Rng;

/// Largest seed value handed out by [`Session::regenerate_seed`].
pub const SEED_MAX: u32 = 999_999;

/// Where a session is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing pending.
    Idle,
    /// The user is editing inputs.
    Composing,
    /// A generation call is in flight.
    Requesting,
    /// The last request produced an image.
    Succeeded,
    /// The last request failed.
    Failed,
}

/// Caller-owned state for one interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    seed: u32,
    phase: Phase,
}

impl Session {
    /// Start a session with a freshly drawn seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(draw_seed(&mut rand::thread_rng()))
    }

    /// Start a session with a locked seed.
    #[must_use]
    pub fn with_seed(seed: u32) -> Self {
        Self { seed, phase: Phase::Idle }
    }

    /// The current seed.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Replace the seed with a new uniform draw in `0..=SEED_MAX`.
    pub fn regenerate_seed(&mut self) -> u32 {
        self.regenerate_seed_with(&mut rand::thread_rng())
    }

    /// Same as [`Session::regenerate_seed`] with an explicit RNG.
    pub fn regenerate_seed_with<R: Rng>(&mut self, rng: &mut R) -> u32 {
        self.seed = draw_seed(rng);
        tracing::debug!(seed = self.seed, "seed regenerated");
        self.seed
    }

    /// Mark the user as editing inputs.
    pub fn edit(&mut self) {
        if self.phase != Phase::Requesting {
            self.phase = Phase::Composing;
        }
    }

    /// Enter `Requesting` and return the seed the request must carry.
    pub fn begin_request(&mut self) -> u32 {
        self.phase = Phase::Requesting;
        self.seed
    }

    /// Record the outcome of the in-flight request.
    pub fn finish_request(&mut self, succeeded: bool) {
        self.phase = if succeeded { Phase::Succeeded } else { Phase::Failed };
    }

    /// Return to `Idle` once the outcome has been shown.
    pub fn acknowledge(&mut self) {
        if matches!(self.phase, Phase::Succeeded | Phase::Failed) {
            self.phase = Phase::Idle;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_seed<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(0..=SEED_MAX)
}
