//! # Parse Step Trace
//!
//! Both parsers report their progress as an append-only list of [`ParseStep`]s.
//! Steps are written to a [`StepSink`] supplied by the caller: a
//! `Vec<ParseStep>` records them, [`NoSteps`] discards them without building
//! any snapshot. The parser code is the same in both cases.
use smartstring::alias::String;
use std::fmt;

/// The kind of action a parse step records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseAction {
    Shift,
    Reduce,
    Accept,
    /// A descent-level or bookkeeping step that consumes nothing.
    Process,
}

impl ParseAction {
    pub fn name(self) -> &'static str {
        match self {
            ParseAction::Shift => "Shift",
            ParseAction::Reduce => "Reduce",
            ParseAction::Accept => "Accept",
            ParseAction::Process => "Process",
        }
    }
}

impl fmt::Display for ParseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One entry of a parse trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStep {
    /// Zero-based position of this step in its trace.
    pub index: usize,
    pub action: ParseAction,
    /// Symbol names on the parse stack (bottom first), or the active descent
    /// path for the recursive-descent parser.
    pub stack: Vec<String>,
    /// Texts of the tokens not yet consumed, end marker included.
    pub input: Vec<String>,
    /// Grammar rule label such as `E → E + T`, for reductions.
    pub rule: Option<String>,
    pub description: String,
}

impl ParseStep {
    pub fn new(index: usize, action: ParseAction, description: impl AsRef<str>) -> Self {
        Self {
            index,
            action,
            stack: Vec::new(),
            input: Vec::new(),
            rule: None,
            description: String::from(description.as_ref()),
        }
    }

    pub fn with_stack<I, S>(mut self, stack: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stack = stack.into_iter().map(|s| String::from(s.as_ref())).collect();
        self
    }

    pub fn with_input<I, S>(mut self, input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.input = input.into_iter().map(|s| String::from(s.as_ref())).collect();
        self
    }

    pub fn with_rule(mut self, rule: impl AsRef<str>) -> Self {
        self.rule = Some(String::from(rule.as_ref()));
        self
    }
}

/// Single-line rendering used by the command-line tool:
/// `index action [stack] | input | rule | description`.
impl fmt::Display for ParseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}  {:<7}  [{}]  |  {}",
            self.index,
            self.action,
            self.stack.join(" "),
            self.input.join(" ")
        )?;
        if let Some(rule) = &self.rule {
            write!(f, "  |  {rule}")?;
        }
        write!(f, "  |  {}", self.description)
    }
}

/// Destination for parse steps.
///
/// `record` receives a constructor rather than a finished step so that sinks
/// which discard steps never pay for building the snapshots.
pub trait StepSink {
    /// Records the step built by `make`, which is given the step's index.
    fn record<F>(&mut self, make: F)
    where
        F: FnOnce(usize) -> ParseStep;
}

/// A sink that discards every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSteps;

impl StepSink for NoSteps {
    #[inline]
    fn record<F>(&mut self, _make: F)
    where
        F: FnOnce(usize) -> ParseStep,
    {
    }
}

impl StepSink for Vec<ParseStep> {
    fn record<F>(&mut self, make: F)
    where
        F: FnOnce(usize) -> ParseStep,
    {
        let step = make(self.len());
        log::trace!("{}", step);
        self.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_numbers_steps_consecutively() {
        let mut steps: Vec<ParseStep> = Vec::new();
        steps.record(|i| ParseStep::new(i, ParseAction::Process, "first"));
        steps.record(|i| ParseStep::new(i, ParseAction::Shift, "second"));
        steps.record(|i| ParseStep::new(i, ParseAction::Accept, "third"));
        let indices: Vec<usize> = steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(steps[1].action, ParseAction::Shift);
    }

    #[test]
    fn no_steps_never_builds_a_step() {
        let mut sink = NoSteps;
        sink.record(|_| panic!("step constructor must not run"));
    }

    #[test]
    fn display_includes_rule_when_present() {
        let step = ParseStep::new(4, ParseAction::Reduce, "Reduce by rule: E → T")
            .with_stack(["E"])
            .with_input(["+", "2", "$"])
            .with_rule("E → T");
        assert_eq!(
            step.to_string(),
            "  4  Reduce   [E]  |  + 2 $  |  E → T  |  Reduce by rule: E → T"
        );

        let step = ParseStep::new(0, ParseAction::Process, "Starting").with_input(["1", "$"]);
        assert_eq!(step.to_string(), "  0  Process  []  |  1 $  |  Starting");
    }
}
