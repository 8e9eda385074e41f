pub mod ast;
pub mod batch;
pub mod check;
pub mod input;
pub mod tokens;


/// How a command finished when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The command ran, but what it found should fail the process (e.g. `check --strict`).
    Failure,
}
