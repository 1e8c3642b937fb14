// src/progress.rs
/// Lightweight progress reporting for a run.
/// Frontends implement this to surface status to users; the library never prints.
pub trait Progress {
    /// Called at the start with the number of stages.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called before a stage starts.
    fn stage_start(&mut self, _stage: Stage) {}

    /// Called when one stage completes.
    fn stage_done(&mut self, _stage: Stage) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Recognize,
    Dates,
    Results,
    LoadTemplate,
    Populate,
    Write,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Recognize, Stage::Dates, Stage::Results,
        Stage::LoadTemplate, Stage::Populate, Stage::Write,
    ];

    pub fn number(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).map_or(0, |i| i + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Recognize    => "Extracting text from image",
            Stage::Dates        => "Extracting test dates",
            Stage::Results      => "Extracting test results",
            Stage::LoadTemplate => "Loading template",
            Stage::Populate     => "Populating template with results",
            Stage::Write        => "Saving results",
        }
    }
}
