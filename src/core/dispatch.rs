//! Single-invocation command pipeline.
//!
//! lookup -> authorize -> coerce -> invoke. Each step short-circuits, and
//! every failure ends as one Alert to the invoking actor. Authorization runs
//! strictly before coercion: a denied actor never reaches argument parsing or
//! the handler, however malformed the arguments are.

use crate::core::coerce::{self, Args};
use crate::core::error::DispatchError;
use crate::core::feedback::{FeedbackChannel, Severity};
use crate::core::registry::{CommandDescriptor, CommandRegistry};
use crate::core::role::RoleHierarchy;
use crate::core::time::new_event_id;
use crate::core::world::Actor;
use std::sync::Arc;

/// What a handler sees: the invoking actor and a way to talk back to it.
pub struct CommandContext<'a> {
    actor: &'a mut dyn Actor,
    feedback: &'a dyn FeedbackChannel,
}

impl<'a> CommandContext<'a> {
    pub fn new(actor: &'a mut dyn Actor, feedback: &'a dyn FeedbackChannel) -> Self {
        Self { actor, feedback }
    }

    pub fn actor(&self) -> &dyn Actor {
        &*self.actor
    }

    pub fn actor_mut(&mut self) -> &mut dyn Actor {
        &mut *self.actor
    }

    pub fn send(&self, text: &str, severity: Severity) {
        self.feedback.send(self.actor.name(), text, severity);
    }

    pub fn announce(&self, text: &str) {
        self.send(text, Severity::Announcement);
    }

    pub fn info(&self, text: &str) {
        self.send(text, Severity::Info);
    }

    pub fn alert(&self, text: &str) {
        self.send(text, Severity::Alert);
    }
}

/// Result of one dispatch, for hosts that want to log or meter it. The actor
/// has already been told either way.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome {
    Completed,
    Failed(DispatchError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            Outcome::Completed => None,
            Outcome::Failed(e) => Some(e),
        }
    }
}

pub struct CommandDispatcher {
    roles: Arc<RoleHierarchy>,
    registry: Arc<CommandRegistry>,
    feedback: Arc<dyn FeedbackChannel>,
}

impl CommandDispatcher {
    pub fn new(
        roles: Arc<RoleHierarchy>,
        registry: Arc<CommandRegistry>,
        feedback: Arc<dyn FeedbackChannel>,
    ) -> Self {
        Self {
            roles,
            registry,
            feedback,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn roles(&self) -> &RoleHierarchy {
        &self.roles
    }

    /// Run one command for `actor`. Never fails to the caller.
    pub fn dispatch<S: AsRef<str>>(&self, actor: &mut dyn Actor, command: &str, raw_args: &[S]) -> Outcome {
        let span = tracing::debug_span!("dispatch", id = %new_event_id(), command, actor = actor.name());
        let _enter = span.enter();

        match self.try_dispatch(actor, command, raw_args) {
            Ok(()) => {
                tracing::debug!("command completed");
                Outcome::Completed
            }
            Err(err) => {
                match &err {
                    DispatchError::PermissionDenied { role, .. } => {
                        tracing::warn!(%role, "permission denied")
                    }
                    other => tracing::debug!(error = %other, "command failed"),
                }
                self.feedback.send(actor.name(), &err.to_string(), Severity::Alert);
                Outcome::Failed(err)
            }
        }
    }

    fn try_dispatch<S: AsRef<str>>(
        &self,
        actor: &mut dyn Actor,
        command: &str,
        raw_args: &[S],
    ) -> Result<(), DispatchError> {
        let descriptor = self.registry.lookup(command)?;
        self.authorize(&*actor, descriptor)?;
        let args: Args = coerce::coerce(raw_args, descriptor.params())?;

        let mut ctx = CommandContext::new(actor, self.feedback.as_ref());
        descriptor.invoke(&mut ctx, &args)
    }

    fn authorize(&self, actor: &dyn Actor, descriptor: &CommandDescriptor) -> Result<(), DispatchError> {
        if self.roles.supersedes(actor.role(), descriptor.required_role()) {
            return Ok(());
        }
        Err(DispatchError::PermissionDenied {
            command: descriptor.name().to_string(),
            role: actor.role().name().to_string(),
        })
    }
}
