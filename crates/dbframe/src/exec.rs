//! The execution driver: bind, execute, then feed every row to a reader.

use crate::bind::Binder;
use crate::config::{ErrorPolicy, ExecConfig};
use crate::dataset::Dataset;
use crate::error::{OrmError, OrmResult};
use crate::reader::{DatasetReader, FieldReader};

/// Row counts of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Rows pulled from the dataset.
    pub rows: usize,
    /// Rows the reader accepted.
    pub read: usize,
    /// Rows whose read failed and were skipped.
    pub skipped: usize,
    /// The pass stopped at the configured row limit.
    pub row_limit_reached: bool,
}

/// Drives a dataset through a reader, one row at a time.
///
/// # Example
///
/// ```ignore
/// let executor = Executor::new(ExecConfig::new().strict());
/// let stats = executor.execute(&mut dataset, Some(&binder), Some(&mut reader))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecConfig,
}

impl Executor {
    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Run one pass: bind, execute, then read rows until the dataset is exhausted.
    ///
    /// Without a binder no parameters are bound. Without a reader the
    /// statement is executed and no row is consumed.
    pub fn execute<D: Dataset>(
        &self,
        dataset: &mut D,
        binder: Option<&dyn Binder<D>>,
        reader: Option<&mut dyn DatasetReader<D::Row>>,
    ) -> OrmResult<PassStats> {
        let _span = tracing::debug_span!(
            target: "dbframe.exec",
            "dbframe.pass",
            policy = ?self.config.error_policy,
            row_limit = ?self.config.row_limit,
        )
        .entered();

        if let Some(binder) = binder {
            binder.bind(dataset)?;
        }
        dataset.execute()?;

        let mut stats = PassStats::default();
        let Some(reader) = reader else {
            tracing::debug!(target: "dbframe.exec", "executed without reader");
            return Ok(stats);
        };

        if self.config.reset_readers {
            reader.begin_pass();
        }

        loop {
            if self.config.row_limit.is_some_and(|limit| stats.rows >= limit) {
                stats.row_limit_reached = true;
                break;
            }
            if !dataset.advance() {
                break;
            }
            let row = dataset
                .current()
                .ok_or_else(|| OrmError::misconfigured("dataset advanced but exposes no current row"))?;
            stats.rows += 1;

            match reader.read(row) {
                Ok(()) => stats.read += 1,
                Err(err) if self.skips(&err) => {
                    stats.skipped += 1;
                    tracing::debug!(
                        target: "dbframe.exec",
                        row = stats.rows,
                        error = %err,
                        "row skipped"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        target: "dbframe.exec",
                        row = stats.rows,
                        error = %err,
                        "pass aborted"
                    );
                    return Err(err);
                }
            }
        }

        tracing::debug!(
            target: "dbframe.exec",
            rows = stats.rows,
            read = stats.read,
            skipped = stats.skipped,
            limited = stats.row_limit_reached,
            "pass finished"
        );
        Ok(stats)
    }

    /// Read every row of `dataset` into `dest` with `reader`.
    ///
    /// The reader is borrowed, so its state (and counters such as
    /// [`MasterDetailReader::detail_failures`]) can be inspected afterwards.
    ///
    /// [`MasterDetailReader::detail_failures`]: crate::reader::MasterDetailReader::detail_failures
    pub fn read_all<D, F, C>(&self, dataset: &mut D, reader: &mut F, dest: &mut C) -> OrmResult<PassStats>
    where
        D: Dataset,
        F: FieldReader<D::Row, C>,
        C: ?Sized,
    {
        if self.config.reset_readers {
            reader.reset();
        }
        let mut top = |row: &D::Row| reader.read(row, dest);
        self.execute(dataset, None, Some(&mut top as &mut dyn DatasetReader<D::Row>))
    }

    fn skips(&self, err: &OrmError) -> bool {
        self.config.error_policy == ErrorPolicy::SkipRow && err.is_row_level()
    }
}

#[cfg(test)]
mod tests;
