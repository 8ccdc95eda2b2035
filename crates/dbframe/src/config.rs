/// What the executor does with a row whose read failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Count the row as skipped and keep reading (default).
    #[default]
    SkipRow,
    /// End the pass with the row's error.
    Abort,
}

/// Configuration for an execution pass.
///
/// Misconfiguration errors end the pass whatever the policy.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Handling of row-level read failures. Default is [`ErrorPolicy::SkipRow`].
    pub error_policy: ErrorPolicy,
    /// Whether readers get `begin_pass` before the first row. Default is `true`.
    pub reset_readers: bool,
    /// Stop after this many rows. `None` means read to the end (default).
    pub row_limit: Option<usize>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            reset_readers: true,
            row_limit: None,
        }
    }
}

impl ExecConfig {
    /// Create a new configuration with defaults (skip failed rows, reset readers, no limit).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Abort on the first failed row.
    pub fn strict(self) -> Self {
        self.with_error_policy(ErrorPolicy::Abort)
    }

    /// Skip failed rows and keep reading.
    pub fn skip_failed_rows(self) -> Self {
        self.with_error_policy(ErrorPolicy::SkipRow)
    }

    /// Keep reader state from earlier passes.
    ///
    /// Useful when several datasets feed the same destination and master
    /// entries from an earlier pass must keep their detail readers.
    pub fn keep_reader_state(mut self) -> Self {
        self.reset_readers = false;
        self
    }

    /// Stop after `limit` rows.
    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }
}
