use serde::{Deserialize, Serialize};

/// Below this many paths per worker, splitting the work is not worth a thread
pub const DEFAULT_MIN_BATCH_SIZE: usize = 64;

/// Presentation switches for the reporter. None of these affect comparison results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Also print paths that matched
    #[serde(default)]
    pub show_matches: bool,

    /// Wrap lines in ANSI styles
    #[serde(default)]
    pub colorize: bool,

    /// Print the totals footer
    #[serde(default)]
    pub show_totals: bool,

    /// Print nothing at all
    #[serde(default)]
    pub silent: bool,
}

impl ReportConfig {
    pub fn with_matches(mut self, enabled: bool) -> Self {
        self.show_matches = enabled;
        self
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.colorize = enabled;
        self
    }

    pub fn with_totals(mut self, enabled: bool) -> Self {
        self.show_totals = enabled;
        self
    }

    pub fn with_silent(mut self, enabled: bool) -> Self {
        self.silent = enabled;
        self
    }

    pub fn palette(&self) -> Palette {
        if self.colorize {
            Palette::ansi()
        } else {
            Palette::plain()
        }
    }
}

/// Settings for the comparison engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker count; `None` uses the available hardware concurrency
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Minimum number of paths a worker must receive before another worker is added
    #[serde(default = "default_min_batch_size")]
    pub min_batch_size: usize,

    /// Regular files of equal size match without their contents being read
    #[serde(default)]
    pub shallow_pass: bool,
}

fn default_min_batch_size() -> usize {
    DEFAULT_MIN_BATCH_SIZE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: None,
            min_batch_size: DEFAULT_MIN_BATCH_SIZE,
            shallow_pass: false,
        }
    }
}

impl EngineConfig {
    pub fn with_parallelism(mut self, parallelism: Option<usize>) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_min_batch_size(mut self, min_batch_size: usize) -> Self {
        self.min_batch_size = min_batch_size;
        self
    }

    pub fn with_shallow_pass(mut self, enabled: bool) -> Self {
        self.shallow_pass = enabled;
        self
    }

    /// Requested worker count, falling back to the hardware concurrency. Never below 1.
    pub fn resolved_parallelism(&self) -> usize {
        self.parallelism
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

/// Escape sequences for each semantic style the reporter uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub normal: &'static str,
    pub match_style: &'static str,
    pub mismatch_style: &'static str,
}

impl Palette {
    /// Bold green for matches, bold red for mismatches
    pub fn ansi() -> Self {
        Self {
            normal: "\x1b[0m",
            match_style: "\x1b[1m\x1b[32m",
            mismatch_style: "\x1b[1m\x1b[31m",
        }
    }

    pub fn plain() -> Self {
        Self {
            normal: "",
            match_style: "",
            mismatch_style: "",
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::plain()
    }
}
