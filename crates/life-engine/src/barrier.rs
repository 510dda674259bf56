//! Reusable N-party rendezvous.

use std::thread;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// The barrier was poisoned by a failed party; waiting is pointless.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("barrier poisoned by a failed worker")]
pub struct BarrierPoisoned;

/// Returned by [`Barrier::wait`]; exactly one party per round is the leader.
#[derive(Debug, Clone, Copy)]
pub struct BarrierWaitResult {
    leader: bool,
}

impl BarrierWaitResult {
    /// True for the single party that completed the round.
    #[must_use]
    pub const fn is_leader(self) -> bool {
        self.leader
    }
}

struct BarrierState {
    arrived: usize,
    epoch: u64,
    poisoned: bool,
}

/// A rendezvous for exactly `parties` threads, reusable across rounds.
///
/// [`Barrier::wait`] blocks until all parties have called it for the current
/// round; the internal count then resets automatically, so one instance
/// serves every generation boundary of a run. Rounds are tracked by an epoch
/// counter rather than the arrival count, which is what makes the reset safe
/// while released waiters are still waking up.
///
/// There is no timeout. Instead, a party that cannot continue calls
/// [`Barrier::poison`], which wakes every current and future waiter with
/// [`BarrierPoisoned`] so a single failure cannot deadlock its peers.
pub struct Barrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl Barrier {
    /// Create a barrier for `parties` threads.
    ///
    /// # Panics
    ///
    /// Panics if `parties` is zero.
    #[must_use]
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "barrier requires at least one party");
        Self {
            parties,
            state: Mutex::new(BarrierState {
                arrived: 0,
                epoch: 0,
                poisoned: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Block until all `parties` threads have called `wait` for this round.
    pub fn wait(&self) -> Result<BarrierWaitResult, BarrierPoisoned> {
        let mut state = self.state.lock();
        if state.poisoned {
            return Err(BarrierPoisoned);
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            // Last party in: release the round and reset for the next one.
            state.arrived = 0;
            state.epoch = state.epoch.wrapping_add(1);
            self.cvar.notify_all();
            return Ok(BarrierWaitResult { leader: true });
        }

        let epoch = state.epoch;
        while state.epoch == epoch && !state.poisoned {
            self.cvar.wait(&mut state);
        }
        if state.poisoned {
            Err(BarrierPoisoned)
        } else {
            Ok(BarrierWaitResult { leader: false })
        }
    }

    /// Poison the barrier, waking every current and future waiter with
    /// [`BarrierPoisoned`].
    pub fn poison(&self) {
        let mut state = self.state.lock();
        state.poisoned = true;
        self.cvar.notify_all();
    }
}

/// Poisons the barrier if the owning thread unwinds, so a panicking worker
/// cannot strand its peers at the rendezvous.
pub(crate) struct PoisonOnPanic<'a>(pub &'a Barrier);

impl Drop for PoisonOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.poison();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn single_party_barrier_is_always_ready() {
        let barrier = Barrier::new(1);
        for _ in 0..100 {
            assert!(barrier.wait().unwrap().is_leader());
        }
    }

    #[test]
    fn all_parties_release_together_across_rounds() {
        const PARTIES: usize = 4;
        const ROUNDS: usize = 10;

        let barrier = Barrier::new(PARTIES);
        let counter = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..PARTIES {
                scope.spawn(|| {
                    for round in 0..ROUNDS {
                        counter.fetch_add(1, Ordering::SeqCst);
                        barrier.wait().unwrap();
                        // Every party's increment for this round is in.
                        assert_eq!(counter.load(Ordering::SeqCst), PARTIES * (round + 1));
                        barrier.wait().unwrap();
                    }
                });
            }
        });

        assert_eq!(counter.load(Ordering::SeqCst), PARTIES * ROUNDS);
    }

    #[test]
    fn exactly_one_leader_per_round() {
        const PARTIES: usize = 3;
        const ROUNDS: usize = 20;

        let barrier = Barrier::new(PARTIES);
        let leaders = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..PARTIES {
                scope.spawn(|| {
                    for _ in 0..ROUNDS {
                        if barrier.wait().unwrap().is_leader() {
                            leaders.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(leaders.load(Ordering::SeqCst), ROUNDS);
    }

    #[test]
    fn poison_wakes_a_blocked_waiter() {
        let barrier = Arc::new(Barrier::new(2));

        let waiter = {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || barrier.wait())
        };

        barrier.poison();
        assert!(matches!(waiter.join().unwrap(), Err(BarrierPoisoned)));
    }

    #[test]
    fn poisoned_barrier_rejects_new_waiters() {
        let barrier = Barrier::new(2);
        barrier.poison();
        assert!(matches!(barrier.wait(), Err(BarrierPoisoned)));
    }

    #[test]
    fn poison_on_panic_guard_poisons_only_on_unwind() {
        let barrier = Barrier::new(2);
        {
            let _guard = PoisonOnPanic(&barrier);
        }
        // Normal drop leaves the barrier usable.
        let waiter_result = thread::scope(|scope| {
            let handle = scope.spawn(|| barrier.wait());
            barrier.wait().unwrap();
            handle.join().unwrap()
        });
        assert!(waiter_result.is_ok());
    }
}
