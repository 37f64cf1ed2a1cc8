use crate::error::LedgerError;

/// Converts wall-clock time into 1-based round indices.
///
/// Both parameters are fixed at construction; round N spans
/// `[start + (N-1)*duration, start + N*duration)` in unix seconds.
#[derive(Debug, Clone, Copy)]
pub struct RoundClock {
    round_duration: u64,
    rounds_start_time: u64,
}

impl RoundClock {
    /// `constructed_at` is the wall-clock time at configuration; the first
    /// round must start strictly after it so no round is already ambiguous
    /// when the ledger comes up.
    pub fn new(
        round_duration: u64,
        rounds_start_time: u64,
        constructed_at: u64,
    ) -> Result<Self, LedgerError> {
        if round_duration == 0 {
            return Err(LedgerError::InvalidConfig(
                "round duration needs to be greater than 0",
            ));
        }
        if rounds_start_time <= constructed_at {
            return Err(LedgerError::InvalidConfig(
                "rounds start time needs to be in the future",
            ));
        }
        Ok(Self {
            round_duration,
            rounds_start_time,
        })
    }

    pub fn round_duration(&self) -> u64 {
        self.round_duration
    }

    pub fn rounds_start_time(&self) -> u64 {
        self.rounds_start_time
    }

    pub fn current_round(&self, now: u64) -> Result<u64, LedgerError> {
        if now < self.rounds_start_time {
            return Err(LedgerError::NotStarted);
        }
        Ok((now - self.rounds_start_time) / self.round_duration + 1)
    }
}
