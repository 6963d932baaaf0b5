//! Bounded click counter shared by Rose Day and Hug Day.

/// Counts discrete actions toward a fixed target and reports the moment the
/// target is first reached. Counting past the target is allowed and harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdCounter {
    count: u32,
    target: u32,
    fired: bool,
}

impl ThresholdCounter {
    pub fn new(target: u32) -> Self {
        Self {
            count: 0,
            target,
            fired: false,
        }
    }

    /// Add one. Returns `true` exactly once: on the increment that first
    /// reaches the target.
    pub fn increment(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        if !self.fired && self.count >= self.target {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn reached(&self) -> bool {
        self.fired
    }

    /// Progress toward the target, capped at 100.
    pub fn percent(&self) -> u32 {
        if self.target == 0 {
            return 100;
        }
        ((self.count as u64 * 100) / self.target as u64).min(100) as u32
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_at_target() {
        let mut c = ThresholdCounter::new(3);
        assert!(!c.increment());
        assert!(!c.increment());
        assert!(c.increment());
        assert!(!c.increment());
        assert!(!c.increment());
        assert_eq!(c.count(), 5);
        assert!(c.reached());
    }

    #[test]
    fn percent_is_capped() {
        let mut c = ThresholdCounter::new(20);
        for _ in 0..5 {
            c.increment();
        }
        assert_eq!(c.percent(), 25);
        for _ in 0..30 {
            c.increment();
        }
        assert_eq!(c.percent(), 100);
    }

    #[test]
    fn reset_rearms() {
        let mut c = ThresholdCounter::new(1);
        assert!(c.increment());
        c.reset();
        assert_eq!(c.count(), 0);
        assert!(c.increment());
    }
}
