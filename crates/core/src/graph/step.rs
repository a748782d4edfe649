//! Step trait and the suspension protocol.
//!
//! A step body is an explicit state machine. Every time the executor runs
//! a step it passes a [`StepContext`] whose [`Entry`] says where the body
//! starts: at the top ([`Entry::Fresh`]) or at the continuation of a
//! suspension point that just received its resume value
//! ([`Entry::Resumed`]). Code before that suspension point is not run
//! again.
//!
//! A body pauses the run by returning [`Transition::Suspend`]. The
//! executor checkpoints the state as it is at that moment, so everything
//! the body appended before suspending is visible when it is re-entered.
//! Local variables are not; a body that needs them back must capture them
//! in the [`Interrupt`]'s continuation.

use crate::graph::error::StepError;
use async_trait::async_trait;
use gk_protocol::state_models::State;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Where a step body starts executing.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// From the top of the body.
    Fresh,

    /// At the continuation of a resolved suspension point.
    Resumed(Resume),
}

impl Entry {
    /// Occurrence number the next suspension from this entry receives.
    ///
    /// 1 on a fresh entry, `k + 1` after resuming occurrence `k`.
    pub fn next_occurrence(&self) -> u32 {
        match self {
            Entry::Fresh => 1,
            Entry::Resumed(resume) => resume.occurrence + 1,
        }
    }
}

/// A resume value delivered to a specific suspension point.
#[derive(Debug, Clone, PartialEq)]
pub struct Resume {
    /// Ordinal of the suspension point being resolved.
    pub occurrence: u32,

    /// The externally supplied value.
    pub value: String,

    /// Data the body captured when it suspended.
    pub continuation: Option<Value>,
}

impl Resume {
    /// Decode the captured continuation.
    pub fn continuation<T: DeserializeOwned>(&self) -> Result<Option<T>, StepError> {
        self.continuation
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(StepError::from)
    }
}

/// Signal raised by a step body to pause the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Interrupt {
    /// Description of the awaited input.
    pub prompt: String,

    /// Data restored to the body on re-entry.
    pub continuation: Option<Value>,
}

impl Interrupt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            continuation: None,
        }
    }

    /// Capture `data` for re-entry.
    pub fn with_continuation<T: Serialize>(mut self, data: &T) -> Result<Self, StepError> {
        self.continuation = Some(serde_json::to_value(data)?);
        Ok(self)
    }
}

/// What a step asks the executor to do after it returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Follow the static edge.
    Next,

    /// Continue at the named step, overriding the static edge.
    Goto(String),

    /// Pause the run until a resume value arrives.
    Suspend(Interrupt),
}

impl Transition {
    pub fn suspend(prompt: impl Into<String>) -> Self {
        Transition::Suspend(Interrupt::new(prompt))
    }
}

/// Per-execution context handed to a step body.
#[derive(Debug, Clone)]
pub struct StepContext {
    session_id: String,
    step: String,
    entry: Entry,
}

impl StepContext {
    pub fn new(session_id: impl Into<String>, step: impl Into<String>, entry: Entry) -> Self {
        Self {
            session_id: session_id.into(),
            step: step.into(),
            entry,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Name of the step being executed.
    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// The resume value, if the step was re-entered at a suspension point.
    pub fn resume(&self) -> Option<&Resume> {
        match &self.entry {
            Entry::Fresh => None,
            Entry::Resumed(resume) => Some(resume),
        }
    }

    /// Error for a re-entry at an occurrence the body does not define.
    pub fn unexpected_resume(&self) -> StepError {
        StepError::UnexpectedResume {
            step: self.step.clone(),
            occurrence: self.resume().map_or(0, |r| r.occurrence),
        }
    }
}

/// Behavior bound to a step name.
#[async_trait]
pub trait Step: Send + Sync {
    /// Run the step body.
    ///
    /// The body may only append to `state`. Mutations are persisted when
    /// the step returns `Ok`; on `Err` they are discarded.
    async fn run(&self, state: &mut State, ctx: &StepContext) -> Result<Transition, StepError>;
}

/// A step backed by a synchronous closure.
pub struct FnStep<F> {
    f: F,
}

/// Wrap a closure as a [`Step`].
pub fn step_fn<F>(f: F) -> FnStep<F>
where
    F: Fn(&mut State, &StepContext) -> Result<Transition, StepError> + Send + Sync,
{
    FnStep { f }
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: Fn(&mut State, &StepContext) -> Result<Transition, StepError> + Send + Sync,
{
    async fn run(&self, state: &mut State, ctx: &StepContext) -> Result<Transition, StepError> {
        (self.f)(state, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gk_protocol::message_models::Message;
    use serde::Deserialize;

    #[test]
    fn test_next_occurrence() {
        assert_eq!(Entry::Fresh.next_occurrence(), 1);

        let resumed = Entry::Resumed(Resume {
            occurrence: 2,
            value: "v".to_string(),
            continuation: None,
        });
        assert_eq!(resumed.next_occurrence(), 3);
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Counter {
        seen: u32,
    }

    #[test]
    fn test_continuation_round_trip() {
        let interrupt = Interrupt::new("wait")
            .with_continuation(&Counter { seen: 3 })
            .unwrap();

        let resume = Resume {
            occurrence: 1,
            value: "go".to_string(),
            continuation: interrupt.continuation,
        };
        let counter: Option<Counter> = resume.continuation().unwrap();
        assert_eq!(counter, Some(Counter { seen: 3 }));
    }

    #[test]
    fn test_missing_continuation_decodes_to_none() {
        let resume = Resume {
            occurrence: 1,
            value: "go".to_string(),
            continuation: None,
        };
        let counter: Option<Counter> = resume.continuation().unwrap();
        assert!(counter.is_none());
    }

    #[tokio::test]
    async fn test_fn_step_runs_closure() {
        let step = step_fn(|state: &mut State, ctx: &StepContext| {
            state.append(Message::system(format!("in {}", ctx.step())));
            Ok(Transition::Next)
        });

        let mut state = State::new();
        let ctx = StepContext::new("0", "start", Entry::Fresh);
        let transition = step.run(&mut state, &ctx).await.unwrap();

        assert_eq!(transition, Transition::Next);
        assert_eq!(state.messages()[0].content, "in start");
    }

    #[test]
    fn test_unexpected_resume_reports_occurrence() {
        let ctx = StepContext::new(
            "0",
            "human",
            Entry::Resumed(Resume {
                occurrence: 5,
                value: "v".to_string(),
                continuation: None,
            }),
        );
        assert!(matches!(
            ctx.unexpected_resume(),
            StepError::UnexpectedResume { occurrence: 5, .. }
        ));
    }
}
