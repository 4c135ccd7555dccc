use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use colored::Colorize;

use crate::git::{CommitResult, Committer};
use crate::ui::{self, SpinnerSlot};

pub const CANCEL_NOTICE: &str = "Operation cancelled by user. Exiting.";

/// Serializes Ctrl-C against `git commit`.
///
/// The commit holds the gate while git runs. The interrupt handler only
/// exits when it can take the gate, and keeps it until the process is gone,
/// so a commit never starts after an interrupt.
#[derive(Debug, Clone, Default)]
pub struct CommitGate(Arc<Mutex<()>>);

impl CommitGate {
    /// Take the gate unless a commit holds it.
    pub fn try_claim(&self) -> Option<MutexGuard<'_, ()>> {
        match self.0.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    fn claim(&self) -> MutexGuard<'_, ()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Install the Ctrl-C handler: clear the spinner, print a notice, exit 0.
///
/// An interrupt that arrives while git is committing is ignored; git gets
/// to finish and the session reports its result.
pub fn install(gate: CommitGate, spinner: SpinnerSlot) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let Some(_held) = gate.try_claim() else {
            log::debug!("Interrupt ignored while git commit runs");
            return;
        };
        ui::clear_spinner(&spinner);
        println!("\n{}", CANCEL_NOTICE.yellow().bold());
        std::process::exit(0);
    })
}

/// A `Committer` that holds the gate for the whole commit.
pub struct GatedCommitter<C> {
    inner: C,
    gate: CommitGate,
}

impl<C: Committer> GatedCommitter<C> {
    pub fn new(inner: C, gate: CommitGate) -> Self {
        GatedCommitter { inner, gate }
    }
}

impl<C: Committer> Committer for GatedCommitter<C> {
    fn commit(&self, message: &str) -> CommitResult {
        let _held = self.gate.claim();
        self.inner.commit(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommitError;
    use crate::git::MockCommitter;

    #[test]
    fn gate_is_busy_for_the_whole_commit() {
        let gate = CommitGate::default();
        let seen = gate.clone();

        let mut inner = MockCommitter::new();
        inner
            .expect_commit()
            .times(1)
            .returning(move |_| {
                assert!(seen.try_claim().is_none(), "interrupt must wait for git");
                Ok("[main abc123] feat: x".to_string())
            });

        let committer = GatedCommitter::new(inner, gate.clone());
        assert_eq!(committer.commit("feat: x").unwrap(), "[main abc123] feat: x");
        assert!(gate.try_claim().is_some());
    }

    #[test]
    fn gate_is_released_when_git_rejects() {
        let gate = CommitGate::default();
        let mut inner = MockCommitter::new();
        inner.expect_commit().returning(|_| {
            Err(CommitError::Rejected {
                output: "nothing to commit".into(),
            })
        });

        let committer = GatedCommitter::new(inner, gate.clone());
        assert!(committer.commit("feat: x").is_err());
        assert!(gate.try_claim().is_some());
    }

    #[test]
    fn claimed_gate_holds_back_commits() {
        let gate = CommitGate::default();
        let held = gate.try_claim().expect("gate starts free");

        let other = gate.clone();
        let waiter = std::thread::spawn(move || {
            let _claimed = other.claim();
            true
        });
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(!waiter.is_finished());

        drop(held);
        assert!(waiter.join().unwrap());
    }
}
