// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{PainterId, RunGeneration, RunId};

/// Error type for selection queries.
///
/// Every failure here describes a mark that cannot be answered against the
/// run it was given with. Degenerate inputs (empty runs, collapsed selections,
/// points outside every glyph) are never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The painter that was asked to answer the query.
    painter: PainterId,

    /// Lineage and generation recorded in the offending mark.
    mark: (RunId, RunGeneration),

    /// Lineage and generation the mark was checked against, when known.
    expected: Option<(RunId, RunGeneration)>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The painter that rejected the mark.
    pub fn painter(&self) -> PainterId {
        self.painter
    }

    /// The run lineage and generation recorded in the offending mark.
    pub fn mark(&self) -> (RunId, RunGeneration) {
        self.mark
    }

    /// The run lineage and generation the mark was expected to match.
    pub fn expected(&self) -> Option<(RunId, RunGeneration)> {
        self.expected
    }

    pub(crate) fn foreign_mark(
        painter: PainterId,
        mark: (RunId, RunGeneration),
        expected: Option<(RunId, RunGeneration)>,
    ) -> Self {
        Self {
            kind: ErrorKind::ForeignMark,
            painter,
            mark,
            expected,
        }
    }

    pub(crate) fn mismatched_marks(
        painter: PainterId,
        mark: (RunId, RunGeneration),
        expected: (RunId, RunGeneration),
    ) -> Self {
        Self {
            kind: ErrorKind::MismatchedMarks,
            painter,
            mark,
            expected: Some(expected),
        }
    }

    pub(crate) fn stale_mark(
        painter: PainterId,
        mark: (RunId, RunGeneration),
        expected: (RunId, RunGeneration),
    ) -> Self {
        Self {
            kind: ErrorKind::StaleMark,
            painter,
            mark,
            expected: Some(expected),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (run, generation) = self.mark;
        match self.kind {
            ErrorKind::ForeignMark => write!(
                f,
                "mark for {run} at {generation} did not originate from {}",
                self.painter
            )?,
            ErrorKind::MismatchedMarks => {
                write!(f, "selection endpoints disagree: {run} at {generation}")?;
            }
            ErrorKind::StaleMark => {
                write!(f, "stale mark: {run} at {generation} was invalidated")?;
            }
        }
        if let Some((run, generation)) = self.expected {
            write!(f, " (expected {run} at {generation})")?;
        }
        Ok(())
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The mark was produced by another painter instance or for another run.
    ForeignMark,

    /// The two endpoints of a selection belong to different runs or generations.
    MismatchedMarks,

    /// The mark was produced against a run generation that has since been replaced.
    StaleMark,
}
