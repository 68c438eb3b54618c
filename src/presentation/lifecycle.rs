//! Presentation lifecycle: Idle → Presenting → Presented → Dismissing → Idle.
//!
//! Every timed transition is scheduled twice: the primary completion after
//! the animation duration, and a timeout fallback after a multiple of it.
//! Whichever arrives first moves the state on; the other finds the state
//! already past the guard and is ignored.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use crate::effect::{CancelId, Effect};
use crate::mvi::{Action, Reducer, State};

pub const DEFAULT_TIMEOUT_MULTIPLIER: f64 = 2.5;
pub const MIN_TIMEOUT_MULTIPLIER: f64 = 2.0;
pub const MAX_TIMEOUT_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationStatus {
    #[default]
    Idle,
    Presenting,
    Presented,
    Dismissing,
}

impl PresentationStatus {
    /// The only status this one may move to.
    pub fn successor(self) -> Self {
        match self {
            Self::Idle => Self::Presenting,
            Self::Presenting => Self::Presented,
            Self::Presented => Self::Dismissing,
            Self::Dismissing => Self::Idle,
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self.successor() == next
    }
}

impl fmt::Display for PresentationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Presenting => "presenting",
            Self::Presented => "presented",
            Self::Dismissing => "dismissing",
        };
        f.write_str(label)
    }
}

/// Presentation state of one piece of content (usually a destination).
///
/// `content` is present in every status except `Idle`.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState<C> {
    status: PresentationStatus,
    content: Option<C>,
    duration: Duration,
}

impl<C> Default for PresentationState<C> {
    fn default() -> Self {
        Self {
            status: PresentationStatus::Idle,
            content: None,
            duration: Duration::ZERO,
        }
    }
}

impl<C: State> State for PresentationState<C> {}

impl<C> PresentationState<C> {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PresentationStatus {
        self.status
    }

    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    /// Mutable access to the content while it is shown. `None` while `Idle`.
    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    /// Animation duration of the current presentation.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// True while anything is on screen, including enter/exit animations.
    pub fn is_visible(&self) -> bool {
        self.status != PresentationStatus::Idle
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.status,
            PresentationStatus::Presenting | PresentationStatus::Dismissing
        )
    }

    /// Move to `next` if it is the legal successor. Returns whether it moved.
    fn advance(&mut self, next: PresentationStatus) -> bool {
        if !self.status.can_transition_to(next) {
            tracing::trace!(from = %self.status, to = %next, "Presentation transition rejected");
            return false;
        }
        tracing::debug!(from = %self.status, to = %next, "Presentation transition");
        self.status = next;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleAction<C> {
    /// Start presenting `content` with an enter animation of `duration`.
    Show { content: C, duration: Duration },
    /// Start dismissing the presented content.
    Hide,
    PresentationCompleted,
    PresentationTimeout,
    DismissalCompleted,
    DismissalTimeout,
}

impl<C> LifecycleAction<C> {
    pub fn show(content: C, duration: Duration) -> Self {
        Self::Show { content, duration }
    }
}

impl<C: Send + 'static> Action for LifecycleAction<C> {}

/// Tuning for a [`PresentationLifecycle`].
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleConfig {
    id: CancelId,
    timeout_multiplier: f64,
    dismiss_duration: Option<Duration>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new("presentation")
    }
}

impl LifecycleConfig {
    /// `id` namespaces this lifecycle's timers; use one id per lifecycle.
    pub fn new(id: impl Into<CancelId>) -> Self {
        Self {
            id: id.into(),
            timeout_multiplier: DEFAULT_TIMEOUT_MULTIPLIER,
            dismiss_duration: None,
        }
    }

    /// Fallback delay as a multiple of the animation duration, clamped to 2..=3.
    pub fn with_timeout_multiplier(mut self, multiplier: f64) -> Self {
        self.timeout_multiplier = if multiplier.is_nan() {
            DEFAULT_TIMEOUT_MULTIPLIER
        } else {
            multiplier.clamp(MIN_TIMEOUT_MULTIPLIER, MAX_TIMEOUT_MULTIPLIER)
        };
        self
    }

    /// Exit animation duration. Defaults to the enter duration.
    pub fn with_dismiss_duration(mut self, duration: Duration) -> Self {
        self.dismiss_duration = Some(duration);
        self
    }

    pub fn id(&self) -> &CancelId {
        &self.id
    }

    pub fn timeout_multiplier(&self) -> f64 {
        self.timeout_multiplier
    }

    pub fn dismiss_duration(&self) -> Option<Duration> {
        self.dismiss_duration
    }

    /// Cancellation id of the enter timers.
    pub fn presenting_id(&self) -> CancelId {
        self.id.child("presenting")
    }

    /// Cancellation id of the exit timers.
    pub fn dismissing_id(&self) -> CancelId {
        self.id.child("dismissing")
    }
}

/// `duration × multiplier`, saturating at `Duration::MAX`.
pub fn fallback_delay(duration: Duration, multiplier: f64) -> Duration {
    Duration::try_from_secs_f64(duration.as_secs_f64() * multiplier).unwrap_or(Duration::MAX)
}

/// Schedule `primary` after `duration` and `fallback` after `duration × multiplier`,
/// both cancellable under `id`.
pub fn schedule_with_fallback<A: Send + 'static>(
    duration: Duration,
    multiplier: f64,
    primary: A,
    fallback: A,
    id: CancelId,
) -> Effect<A> {
    Effect::batch(vec![
        Effect::after_delay(duration, primary),
        Effect::after_delay(fallback_delay(duration, multiplier), fallback),
    ])
    .cancellable(id)
}

/// Reducer for the presentation state machine.
///
/// Generic over the dependencies type so it can be scoped into any parent.
pub struct PresentationLifecycle<C, D = ()> {
    config: LifecycleConfig,
    _marker: PhantomData<fn() -> (C, D)>,
}

impl<C, D> PresentationLifecycle<C, D> {
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }
}

impl<C, D> Default for PresentationLifecycle<C, D> {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl<C, D> Reducer for PresentationLifecycle<C, D>
where
    C: State,
    D: Send + Sync + 'static,
{
    type State = PresentationState<C>;
    type Action = LifecycleAction<C>;
    type Dependencies = D;

    fn reduce(
        &self,
        mut state: PresentationState<C>,
        action: LifecycleAction<C>,
        _dependencies: &D,
    ) -> (PresentationState<C>, Effect<LifecycleAction<C>>) {
        match action {
            LifecycleAction::Show { content, duration } => {
                if !state.advance(PresentationStatus::Presenting) {
                    return (state, Effect::none());
                }
                state.content = Some(content);
                state.duration = duration;
                let effect = schedule_with_fallback(
                    duration,
                    self.config.timeout_multiplier,
                    LifecycleAction::PresentationCompleted,
                    LifecycleAction::PresentationTimeout,
                    self.config.presenting_id(),
                );
                (state, effect)
            }

            LifecycleAction::PresentationCompleted | LifecycleAction::PresentationTimeout => {
                if !state.advance(PresentationStatus::Presented) {
                    return (state, Effect::none());
                }
                // The losing timer of the pair is no longer needed.
                (state, Effect::cancel(self.config.presenting_id()))
            }

            LifecycleAction::Hide => {
                if !state.advance(PresentationStatus::Dismissing) {
                    return (state, Effect::none());
                }
                let duration = self.config.dismiss_duration.unwrap_or(state.duration);
                let effect = schedule_with_fallback(
                    duration,
                    self.config.timeout_multiplier,
                    LifecycleAction::DismissalCompleted,
                    LifecycleAction::DismissalTimeout,
                    self.config.dismissing_id(),
                );
                (state, effect)
            }

            LifecycleAction::DismissalCompleted | LifecycleAction::DismissalTimeout => {
                if !state.advance(PresentationStatus::Idle) {
                    return (state, Effect::none());
                }
                state.content = None;
                state.duration = Duration::ZERO;
                (state, Effect::cancel(self.config.dismissing_id()))
            }
        }
    }
}
