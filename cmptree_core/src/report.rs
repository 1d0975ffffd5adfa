use cmptree_common::{
    ComparisonOutcome, ComparisonSet, FileKind, FullComparison, PartialComparison, Palette,
    ReportConfig,
};
use serde::Serialize;
use std::io::{self, Write};

/// Match counts against the number of entries of each kind that were seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub file_matches: u64,
    pub max_file_matches: u64,
    pub dir_matches: u64,
    pub max_dir_matches: u64,
}

impl Totals {
    pub fn from_comparisons(comparisons: &ComparisonSet) -> Self {
        let mut totals = Self::default();
        for comparison in comparisons {
            totals.record(&comparison.partial);
        }
        totals
    }

    /// A kind is "seen" once per path when either side has it
    fn record(&mut self, partial: &PartialComparison) {
        let seen = |kind: FileKind| partial.first_kind == kind || partial.second_kind == kind;

        if seen(FileKind::Directory) {
            self.max_dir_matches += 1;
        }
        if seen(FileKind::Regular) {
            self.max_file_matches += 1;
        }

        if partial.outcome.is_match() {
            match partial.first_kind {
                FileKind::Regular => self.file_matches += 1,
                FileKind::Directory => self.dir_matches += 1,
                FileKind::Other | FileKind::Missing => {}
            }
        }
    }
}

/// The report line for one comparison, without styling or line ending
pub fn describe(comparison: &FullComparison) -> String {
    let first = &comparison.first_path;
    let second = &comparison.second_path;

    match comparison.outcome() {
        ComparisonOutcome::Match => format!("{:?} == {:?}", first, second),
        ComparisonOutcome::MismatchType => {
            format!("{:?} is not of the same type as {:?}", first, second)
        }
        ComparisonOutcome::MismatchContent => format!("{:?} differs from {:?}", first, second),
        ComparisonOutcome::MismatchNeitherExists => {
            format!("Neither {:?} nor {:?} exist", first, second)
        }
        ComparisonOutcome::MismatchOnlyFirstExists => {
            format!("{:?} exists, but {:?} does NOT exist", first, second)
        }
        ComparisonOutcome::MismatchOnlySecondExists => {
            format!("{:?} does NOT exist, but {:?} does exist", first, second)
        }
    }
}

/// Writes a finished comparison as human readable text
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    config: ReportConfig,
    palette: Palette,
}

impl Reporter {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            palette: config.palette(),
        }
    }

    pub fn write_report<W: Write>(&self, out: &mut W, comparisons: &ComparisonSet) -> io::Result<()> {
        if self.config.silent {
            return Ok(());
        }

        for comparison in comparisons {
            self.write_comparison(out, comparison)?;
        }

        if self.config.show_totals {
            self.write_totals(out, &Totals::from_comparisons(comparisons))?;
        }

        out.flush()
    }

    pub fn write_comparison<W: Write>(&self, out: &mut W, comparison: &FullComparison) -> io::Result<()> {
        let style = if comparison.outcome().is_match() {
            if !self.config.show_matches {
                return Ok(());
            }
            self.palette.match_style
        } else {
            self.palette.mismatch_style
        };

        writeln!(out, "{}{}{}", style, describe(comparison), self.palette.normal)
    }

    pub fn write_totals<W: Write>(&self, out: &mut W, totals: &Totals) -> io::Result<()> {
        writeln!(out, "All done!")?;
        writeln!(
            out,
            "File byte-for-byte matches: {}/{}",
            totals.file_matches, totals.max_file_matches
        )?;
        writeln!(
            out,
            "Directory matches: {}/{}",
            totals.dir_matches, totals.max_dir_matches
        )
    }
}
