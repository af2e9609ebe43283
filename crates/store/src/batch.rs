/// One failed row in a bulk write.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Row key (CN number, manifest number, or entry date).
    pub key: String,
    pub reason: String,
}

/// Outcome of a row-by-row bulk write. There is no rollback: rows that
/// succeeded before a failure stay committed, so callers must treat a
/// nonzero failure count as partial success, not as no-op.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn record_ok(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, key: impl Into<String>, reason: impl Into<String>) {
        self.attempted += 1;
        self.failures.push(BatchFailure {
            key: key.into(),
            reason: reason.into(),
        });
    }

    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() && self.succeeded > 0
    }
}

impl std::fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} rows", self.succeeded, self.attempted)?;
        if !self.failures.is_empty() {
            write!(f, " ({} failed)", self.failures.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accounting() {
        let mut outcome = BatchOutcome::default();
        outcome.record_ok();
        outcome.record_ok();
        outcome.record_failure("CN7", "duplicate");
        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 2);
        assert!(!outcome.all_ok());
        assert!(outcome.is_partial());
        assert_eq!(outcome.to_string(), "2/3 rows (1 failed)");
    }

    #[test]
    fn clean_outcome() {
        let mut outcome = BatchOutcome::default();
        outcome.record_ok();
        assert!(outcome.all_ok());
        assert!(!outcome.is_partial());
        assert_eq!(outcome.to_string(), "1/1 rows");
    }
}
