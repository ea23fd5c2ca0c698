//! Diagnostic sink and results

use crate::config::ElabConfig;
use crate::error::{ElabError, ErrorCategory};
use tracing::debug;

/// Result of elaborating one declaration, scope or subtree
///
/// A failed outcome never stops the walk; it only records that some error
/// was reported underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[must_use]
pub enum Outcome {
    #[default]
    Clean,
    Failed,
}

impl Outcome {
    /// Failed if either side failed
    pub fn and(self, other: Self) -> Self {
        if self == Self::Clean && other == Self::Clean {
            Self::Clean
        } else {
            Self::Failed
        }
    }

    #[must_use]
    pub fn is_clean(self) -> bool {
        self == Self::Clean
    }
}

/// State shared by every step of the pass
#[derive(Debug)]
pub struct ElabContext<'ctx> {
    config: &'ctx ElabConfig,
    diagnostics: Vec<ElabError>,
    error_count: usize,
    warning_count: usize,
}

impl<'ctx> ElabContext<'ctx> {
    #[must_use]
    pub fn new(config: &'ctx ElabConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &'ctx ElabConfig {
        self.config
    }

    /// Records a diagnostic and bumps the matching counter
    pub fn report(&mut self, error: ElabError) {
        debug!(severity = ?error.severity(), %error, "diagnostic");
        if error.severity().is_error() {
            self.error_count += 1;
        } else {
            self.warning_count += 1;
        }
        self.diagnostics.push(error);
    }

    /// Adds errors the parser already reported against a declaration
    pub fn add_parse_errors(&mut self, count: u32) {
        self.error_count += count as usize;
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[ElabError] {
        &self.diagnostics
    }

    /// Failed if any error was counted after the `before` snapshot
    pub fn outcome_since(&self, before: usize) -> Outcome {
        if self.error_count > before {
            Outcome::Failed
        } else {
            Outcome::Clean
        }
    }

    pub fn into_report(self, outcome: Outcome) -> ElabReport {
        ElabReport {
            outcome,
            diagnostics: self.diagnostics,
            error_count: self.error_count,
            warning_count: self.warning_count,
        }
    }
}

/// Everything the pass reports back to its caller
#[derive(Debug, Clone, PartialEq)]
pub struct ElabReport {
    pub outcome: Outcome,
    /// Diagnostics in the order they were raised
    pub diagnostics: Vec<ElabError>,
    /// Errors, including sorry, internal and parser errors
    pub error_count: usize,
    pub warning_count: usize,
}

impl ElabReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn in_category(&self, category: ErrorCategory) -> impl Iterator<Item = &ElabError> {
        self.diagnostics
            .iter()
            .filter(move |error| error.category() == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vl_span::FileSpan;

    #[test]
    fn test_outcome_and() {
        assert_eq!(Outcome::Clean.and(Outcome::Clean), Outcome::Clean);
        assert_eq!(Outcome::Clean.and(Outcome::Failed), Outcome::Failed);
        assert_eq!(Outcome::Failed.and(Outcome::Clean), Outcome::Failed);
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let config = ElabConfig::default();
        let mut ctx = ElabContext::new(&config);
        ctx.report(ElabError::ScalarPortVectorNet {
            name: "a".to_string(),
            net_range: "[1:0]".to_string(),
            span: FileSpan::detached(),
        });
        assert_eq!(ctx.outcome_since(0), Outcome::Clean);
        assert_eq!(ctx.warning_count(), 1);

        ctx.add_parse_errors(2);
        assert_eq!(ctx.outcome_since(0), Outcome::Failed);

        let report = ctx.into_report(Outcome::Failed);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.has_errors());
        assert_eq!(report.in_category(ErrorCategory::Range).count(), 1);
    }
}
