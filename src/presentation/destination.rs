//! Routing of actions to the active variant of a polymorphic child.

use crate::mvi::{Action, State};

/// A tagged union of child feature states, one variant per case.
pub trait Destination: State {
    fn case_tag(&self) -> &'static str;
}

/// The action union paired with a [`Destination`].
pub trait DestinationAction: Action {
    fn case_tag(&self) -> &'static str;
}

/// Log an action the generated routing reducer did not forward.
#[doc(hidden)]
pub fn absorb<S: Destination, A: DestinationAction>(state: &S, action: &A) {
    if action.is_dismiss() {
        tracing::trace!(case = action.case_tag(), "Dismiss left to the parent");
    } else {
        tracing::trace!(
            active = state.case_tag(),
            case = action.case_tag(),
            "Stale destination action ignored"
        );
    }
}

/// Generate a destination state enum, its action enum, and the routing reducer.
///
/// ```
/// use navistore::effect::Effect;
/// use navistore::mvi::{Action, Reducer, State};
///
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Draft(String);
/// impl State for Draft {}
///
/// #[derive(Debug, Clone)]
/// pub enum DraftAction { Type(char) }
/// impl Action for DraftAction {}
///
/// pub struct DraftReducer;
///
/// impl Reducer for DraftReducer {
///     type State = Draft;
///     type Action = DraftAction;
///     type Dependencies = ();
///
///     fn reduce(&self, mut state: Draft, action: DraftAction, _: &()) -> (Draft, Effect<DraftAction>) {
///         let DraftAction::Type(c) = action;
///         state.0.push(c);
///         (state, Effect::none())
///     }
/// }
///
/// navistore::destination! {
///     pub state Destination;
///     pub action DestinationAction;
///     pub reducer DestinationReducer(());
///     cases {
///         Compose = "compose" => DraftReducer,
///     }
/// }
///
/// let reducer = DestinationReducer::new(DraftReducer);
/// let (state, _) = reducer.reduce(
///     Destination::Compose(Draft(String::new())),
///     DestinationAction::Compose(navistore::presentation::PresentationAction::Presented(DraftAction::Type('x'))),
///     &(),
/// );
/// assert_eq!(state, Destination::Compose(Draft("x".into())));
/// assert!(DestinationAction::is_registered("compose"));
/// ```
///
/// Adding `wire;` after the reducer line also generates `into_envelope` and
/// `from_envelope`, converting the action union to and from
/// [`RawEnvelope`](crate::presentation::RawEnvelope). Every child action must
/// then implement `Serialize` and `DeserializeOwned`.
///
/// For each case the generated reducer:
/// - forwards `Presented(child_action)` to the case's reducer when the
///   current destination is the same case, re-wrapping state and effect
/// - ignores `Dismiss`, leaving removal to the parent
/// - ignores actions tagged for a case other than the active one
#[macro_export]
macro_rules! destination {
    (
        $svis:vis state $state:ident;
        $avis:vis action $action:ident;
        $rvis:vis reducer $reducer:ident ($deps:ty);
        wire;
        cases {
            $( $case:ident = $tag:literal => $child:ty ),+ $(,)?
        }
    ) => {
        $crate::destination! {
            $svis state $state;
            $avis action $action;
            $rvis reducer $reducer($deps);
            cases {
                $( $case = $tag => $child ),+
            }
        }

        #[allow(dead_code)]
        impl $action {
            /// Encode as `{"caseTag": ..., "action": ...}`.
            pub fn into_envelope(
                self,
            ) -> ::std::result::Result<$crate::presentation::RawEnvelope, $crate::presentation::EnvelopeError> {
                match self {
                    $(
                        Self::$case(action) => $crate::presentation::ActionEnvelope {
                            case_tag: ::std::string::String::from($tag),
                            action,
                        }
                        .into_raw(),
                    )+
                }
            }

            /// Decode a wire envelope, selecting the case by its tag.
            pub fn from_envelope(
                envelope: $crate::presentation::RawEnvelope,
            ) -> ::std::result::Result<Self, $crate::presentation::EnvelopeError> {
                let case_tag = envelope.case_tag.clone();
                match case_tag.as_str() {
                    $(
                        $tag => ::std::result::Result::Ok(Self::$case(envelope.decode()?.action)),
                    )+
                    _ => ::std::result::Result::Err(
                        $crate::presentation::EnvelopeError::UnknownCase(case_tag.clone()),
                    ),
                }
            }
        }
    };
    (
        $svis:vis state $state:ident;
        $avis:vis action $action:ident;
        $rvis:vis reducer $reducer:ident ($deps:ty);
        cases {
            $( $case:ident = $tag:literal => $child:ty ),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        $svis enum $state {
            $( $case(<$child as $crate::mvi::Reducer>::State), )+
        }

        impl $crate::mvi::State for $state {}

        impl $crate::presentation::Destination for $state {
            fn case_tag(&self) -> &'static str {
                match self {
                    $( Self::$case(_) => $tag, )+
                }
            }
        }

        #[derive(Debug, Clone)]
        $avis enum $action {
            $( $case($crate::presentation::PresentationAction<<$child as $crate::mvi::Reducer>::Action>), )+
        }

        #[allow(dead_code)]
        impl $action {
            pub const CASE_TAGS: &'static [&'static str] = &[$( $tag ),+];

            pub fn is_registered(tag: &str) -> bool {
                Self::CASE_TAGS.contains(&tag)
            }
        }

        impl $crate::mvi::Action for $action {
            fn is_dismiss(&self) -> bool {
                match self {
                    $( Self::$case(inner) => $crate::mvi::Action::is_dismiss(inner), )+
                }
            }
        }

        impl $crate::presentation::DestinationAction for $action {
            fn case_tag(&self) -> &'static str {
                match self {
                    $( Self::$case(_) => $tag, )+
                }
            }
        }

        #[allow(non_snake_case)]
        $rvis struct $reducer {
            $( $case: $child, )+
        }

        #[allow(dead_code)]
        impl $reducer {
            #[allow(non_snake_case, clippy::too_many_arguments)]
            pub fn new($( $case: $child ),+) -> Self {
                Self { $( $case ),+ }
            }
        }

        impl $crate::mvi::Reducer for $reducer {
            type State = $state;
            type Action = $action;
            type Dependencies = $deps;

            fn reduce(
                &self,
                state: $state,
                action: $action,
                dependencies: &$deps,
            ) -> ($state, $crate::effect::Effect<$action>) {
                match (state, action) {
                    $(
                        (
                            $state::$case(child),
                            $action::$case($crate::presentation::PresentationAction::Presented(child_action)),
                        ) => {
                            let (child, effect) = $crate::mvi::Reducer::reduce(
                                &self.$case,
                                child,
                                child_action,
                                dependencies,
                            );
                            (
                                $state::$case(child),
                                effect.map(|action| {
                                    $action::$case($crate::presentation::PresentationAction::Presented(action))
                                }),
                            )
                        }
                    )+
                    (state, action) => {
                        $crate::presentation::absorb(&state, &action);
                        (state, $crate::effect::Effect::none())
                    }
                }
            }
        }
    };
}
