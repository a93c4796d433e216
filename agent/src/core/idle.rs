//! Idle-governor accounting for the polling loop.

/// Loop counters threaded through each polling cycle.
///
/// `idle_cycles` counts consecutive cycles in which neither an exit sentinel
/// nor a step script was found; it resets the moment a script is detected,
/// before the outcome of its execution is known. `executions` counts every
/// script ever detected and never resets.
///
/// The idle timeout only applies while `executions == 0`: once a node has
/// executed at least one script it waits indefinitely for the exit sentinel.
/// This warm-node policy is deliberate (see DESIGN.md).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdleState {
    /// Consecutive cycles without a signal, measured in cycles, not seconds.
    pub idle_cycles: u32,
    /// Scripts detected since process start.
    pub executions: u32,
}

impl IdleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a detected step script: resets the idle counter and bumps the
    /// execution counter.
    pub fn record_script(&mut self) {
        self.idle_cycles = 0;
        self.executions += 1;
    }

    /// Record an idle cycle. Returns `true` when the idle timeout fires:
    /// more than `threshold` consecutive idle cycles with zero executions.
    pub fn record_idle(&mut self, threshold: u32) -> bool {
        self.idle_cycles += 1;
        self.executions == 0 && self.idle_cycles > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_out_after_threshold_with_zero_executions() {
        let mut state = IdleState::new();
        for _ in 0..600 {
            assert!(!state.record_idle(600));
        }
        // The 601st consecutive idle cycle crosses the threshold.
        assert!(state.record_idle(600));
        assert_eq!(state.idle_cycles, 601);
    }

    #[test]
    fn script_detection_resets_idle_counter() {
        let mut state = IdleState::new();
        for _ in 0..10 {
            state.record_idle(600);
        }
        state.record_script();
        assert_eq!(state.idle_cycles, 0);
        assert_eq!(state.executions, 1);
    }

    #[test]
    fn timeout_is_disabled_after_first_execution() {
        let mut state = IdleState::new();
        state.record_script();
        for _ in 0..1000 {
            assert!(!state.record_idle(1));
        }
        assert_eq!(state.idle_cycles, 1000);
    }
}
