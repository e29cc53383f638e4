//! Fresh name generation.

/// Monotonic source of state names and rule serials.
///
/// Owned by a compiler value, so independent compilations never share
/// counters.
#[derive(Debug, Clone, Default)]
pub struct NameGen {
    next_state: usize,
    next_serial: usize,
}

impl NameGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start state numbering after `q0`, which is reserved for entry rules.
    pub fn after_entry() -> Self {
        Self {
            next_state: 1,
            next_serial: 0,
        }
    }

    /// Next unused state name: `q<n>`.
    pub fn fresh_state(&mut self) -> String {
        let state = format!("q{}", self.next_state);
        self.next_state += 1;
        state
    }

    /// Next rule serial.
    pub fn serial(&mut self) -> usize {
        let serial = self.next_serial;
        self.next_serial += 1;
        serial
    }
}
