//! Debounced username availability checking.
//!
//! [`UsernameChecker`] turns a stream of edits into a single visible
//! [`UsernameCheck`]. Edits that match the persisted username or break the
//! local format rule settle synchronously. Everything else goes `Pending`
//! and, once typing has been quiet for the debounce delay, asks the server.
//!
//! Responses are fenced with [`RequestFence`] tickets: only the response to
//! the most recently issued request may publish a status, and every edit
//! retires whatever request is still in flight. Shutting the checker down
//! (or dropping it) cancels the pending timer and retires the fence, so late
//! responses land nowhere.

use parking_lot::Mutex;
use plaza_config::UsernameCheckConfig;
use plaza_config::models::{DEFAULT_FALLBACK_ERROR, DEFAULT_USERNAME_DEBOUNCE};
use plaza_core::{CandidateRule, REQUIRED_MESSAGE};
use plaza_model::UsernameAvailability;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::fence::{RequestFence, RequestTicket};
use crate::infra::error::ClientResult;
use crate::infra::services::AvailabilityClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsernameStatus {
    /// Same as the persisted username; nothing to check.
    Unchanged,
    InvalidFormat,
    Pending,
    Available,
    Taken,
    Error,
}

impl UsernameStatus {
    /// Whether the surrounding form may be submitted in this state.
    pub fn allows_submit(self) -> bool {
        matches!(self, Self::Unchanged | Self::Available)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::InvalidFormat => "invalid-format",
            Self::Pending => "pending",
            Self::Available => "available",
            Self::Taken => "taken",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for UsernameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Snapshot published to observers after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameCheck {
    pub status: UsernameStatus,
    pub message: Option<String>,
    /// Trimmed candidate this status describes.
    pub candidate: String,
}

impl UsernameCheck {
    fn new(
        status: UsernameStatus,
        candidate: &str,
        message: Option<String>,
    ) -> Self {
        Self {
            status,
            message,
            candidate: candidate.to_string(),
        }
    }

    pub fn unchanged(baseline: &str) -> Self {
        Self::new(UsernameStatus::Unchanged, baseline.trim(), None)
    }

    pub fn allows_submit(&self) -> bool {
        self.status.allows_submit()
    }
}

#[derive(Debug, Clone)]
pub struct CheckerSettings {
    pub debounce: Duration,
    /// Shown for failures the server did not explain.
    pub fallback_error: String,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_USERNAME_DEBOUNCE,
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
        }
    }
}

impl From<&UsernameCheckConfig> for CheckerSettings {
    fn from(config: &UsernameCheckConfig) -> Self {
        Self {
            debounce: config.debounce,
            fallback_error: config.fallback_error.clone(),
        }
    }
}

struct Shared {
    baseline: String,
    rule: Arc<dyn CandidateRule>,
    client: Arc<dyn AvailabilityClient>,
    settings: CheckerSettings,
    state: Mutex<CheckerState>,
}

/// Everything a response handler compares or mutates lives behind one lock,
/// so the fence check and the publish happen together.
struct CheckerState {
    fence: RequestFence,
    /// Bumped on every edit; a timer only fires for the edit that armed it.
    edit_seq: u64,
    timer: Option<JoinHandle<()>>,
    closed: bool,
    status_tx: watch::Sender<UsernameCheck>,
}

impl CheckerState {
    fn cancel_pending(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if self.fence.in_flight() {
            trace!("abandoning in-flight username check");
        }
        self.fence.supersede();
    }

    fn publish(&self, check: UsernameCheck) {
        debug!(
            status = %check.status,
            candidate = %check.candidate,
            "username status changed"
        );
        self.status_tx.send_replace(check);
    }
}

pub struct UsernameChecker {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for UsernameChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("UsernameChecker")
            .field("baseline", &self.shared.baseline)
            .field("rule", &self.shared.rule)
            .field("debounce", &self.shared.settings.debounce)
            .field("status", &state.status_tx.borrow().status)
            .field("in_flight", &state.fence.in_flight())
            .field("closed", &state.closed)
            .finish()
    }
}

impl UsernameChecker {
    pub fn new(
        baseline: impl Into<String>,
        rule: Arc<dyn CandidateRule>,
        client: Arc<dyn AvailabilityClient>,
        settings: CheckerSettings,
    ) -> Self {
        let baseline = baseline.into().trim().to_string();
        let (status_tx, _) = watch::channel(UsernameCheck::unchanged(&baseline));

        Self {
            shared: Arc::new(Shared {
                baseline,
                rule,
                client,
                settings,
                state: Mutex::new(CheckerState {
                    fence: RequestFence::new(),
                    edit_seq: 0,
                    timer: None,
                    closed: false,
                    status_tx,
                }),
            }),
        }
    }

    /// Build a checker using the configured rule, delay and fallback text.
    pub fn from_config(
        baseline: impl Into<String>,
        config: &UsernameCheckConfig,
        client: Arc<dyn AvailabilityClient>,
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(
            baseline,
            config.shared_rule()?,
            client,
            CheckerSettings::from(config),
        ))
    }

    pub fn baseline(&self) -> &str {
        &self.shared.baseline
    }

    /// Latest published snapshot.
    pub fn current(&self) -> UsernameCheck {
        self.shared.state.lock().status_tx.borrow().clone()
    }

    /// Observe every future transition. The receiver sees the current value
    /// immediately and is closed once the checker is gone.
    pub fn subscribe(&self) -> watch::Receiver<UsernameCheck> {
        self.shared.state.lock().status_tx.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Feed one edit of the username field.
    ///
    /// Must be called from within a Tokio runtime for candidates that need a
    /// server check; outside one the edit settles as `Error`.
    pub fn on_edit(&self, raw: &str) {
        let shared = &self.shared;
        let candidate = raw.trim();
        let mut state = shared.state.lock();

        if state.closed {
            debug!(candidate, "ignoring edit after shutdown");
            return;
        }

        state.edit_seq += 1;
        state.cancel_pending();

        if candidate == shared.baseline {
            state.publish(UsernameCheck::new(
                UsernameStatus::Unchanged,
                candidate,
                None,
            ));
            return;
        }

        if candidate.is_empty() {
            state.publish(UsernameCheck::new(
                UsernameStatus::InvalidFormat,
                candidate,
                Some(REQUIRED_MESSAGE.to_string()),
            ));
            return;
        }

        if let Err(violation) = shared.rule.check(candidate) {
            state.publish(UsernameCheck::new(
                UsernameStatus::InvalidFormat,
                candidate,
                Some(violation.message().to_string()),
            ));
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!(candidate, "no async runtime available for username check");
            state.publish(UsernameCheck::new(
                UsernameStatus::Error,
                candidate,
                Some(shared.settings.fallback_error.clone()),
            ));
            return;
        };

        state.publish(UsernameCheck::new(
            UsernameStatus::Pending,
            candidate,
            None,
        ));

        let timer = runtime.spawn(debounce_then_check(
            Arc::downgrade(shared),
            state.edit_seq,
            candidate.to_string(),
            shared.settings.debounce,
        ));
        state.timer = Some(timer);
    }

    /// Cancel the pending timer and ignore every later response and edit.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        state.cancel_pending();
        debug!(baseline = %self.shared.baseline, "username checker shut down");
    }
}

impl Drop for UsernameChecker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn debounce_then_check(
    shared: Weak<Shared>,
    edit_seq: u64,
    candidate: String,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    let Some(strong) = shared.upgrade() else {
        return;
    };

    let ticket = {
        let mut state = strong.state.lock();
        if state.closed || state.edit_seq != edit_seq {
            return;
        }
        state.timer = None;
        state.fence.issue()
    };

    debug!(%ticket, candidate = %candidate, "checking username availability");

    // The request outlives this timer task so a later abort cannot cancel
    // it; its result is fenced instead.
    let client = Arc::clone(&strong.client);
    drop(strong);
    tokio::spawn(async move {
        let outcome = client.check_username(&candidate).await;
        if let Some(shared) = shared.upgrade() {
            shared.settle(ticket, &candidate, outcome);
        } else {
            trace!(%ticket, "username checker gone before response");
        }
    });
}

impl Shared {
    fn settle(
        &self,
        ticket: RequestTicket,
        candidate: &str,
        outcome: ClientResult<UsernameAvailability>,
    ) {
        let mut state = self.state.lock();
        if state.closed || !state.fence.complete(ticket) {
            debug!(%ticket, candidate, "discarding stale username response");
            return;
        }

        let check = match outcome {
            Ok(answer) if answer.success => {
                let status = if answer.available {
                    UsernameStatus::Available
                } else {
                    UsernameStatus::Taken
                };
                UsernameCheck::new(status, candidate, non_blank(answer.message))
            }
            Ok(answer) => UsernameCheck::new(
                UsernameStatus::Error,
                candidate,
                Some(
                    non_blank(answer.message)
                        .unwrap_or_else(|| self.settings.fallback_error.clone()),
                ),
            ),
            Err(err) => {
                warn!(%ticket, candidate, error = %err, "username check failed");
                UsernameCheck::new(
                    UsernameStatus::Error,
                    candidate,
                    Some(
                        err.server_message()
                            .map(str::to_string)
                            .unwrap_or_else(|| {
                                self.settings.fallback_error.clone()
                            }),
                    ),
                )
            }
        };

        state.publish(check);
    }
}

fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::error::ClientError;
    use async_trait::async_trait;
    use mockall::mock;
    use plaza_core::UsernameRule;

    mock! {
        Availability {}

        #[async_trait]
        impl AvailabilityClient for Availability {
            async fn check_username(
                &self,
                candidate: &str,
            ) -> ClientResult<UsernameAvailability>;
        }
    }

    fn checker(client: MockAvailability) -> UsernameChecker {
        UsernameChecker::new(
            "alice",
            Arc::new(UsernameRule::default()),
            Arc::new(client),
            CheckerSettings::default(),
        )
    }

    #[test]
    fn submit_gate_accepts_only_unchanged_and_available() {
        use UsernameStatus::*;
        let allowed: Vec<_> = [Unchanged, InvalidFormat, Pending, Available, Taken, Error]
            .into_iter()
            .filter(|s| s.allows_submit())
            .collect();
        assert_eq!(allowed, vec![Unchanged, Available]);
    }

    #[test]
    fn starts_unchanged_with_trimmed_baseline() {
        let checker = UsernameChecker::new(
            "  alice ",
            Arc::new(UsernameRule::default()),
            Arc::new(MockAvailability::new()),
            CheckerSettings::default(),
        );
        assert_eq!(checker.baseline(), "alice");
        assert_eq!(checker.current(), UsernameCheck::unchanged("alice"));
    }

    #[tokio::test(start_paused = true)]
    async fn local_outcomes_never_reach_the_server() {
        let mut client = MockAvailability::new();
        client.expect_check_username().never();
        let checker = checker(client);

        checker.on_edit("  alice  ");
        assert_eq!(checker.current().status, UsernameStatus::Unchanged);

        checker.on_edit("   ");
        let check = checker.current();
        assert_eq!(check.status, UsernameStatus::InvalidFormat);
        assert_eq!(check.message.as_deref(), Some(REQUIRED_MESSAGE));

        checker.on_edit("a");
        assert_eq!(checker.current().status, UsernameStatus::InvalidFormat);

        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn server_failure_prefers_server_message() {
        let mut client = MockAvailability::new();
        client
            .expect_check_username()
            .times(1)
            .returning(|_| Err(ClientError::Status {
                status: 503,
                message: Some("Try again soon".into()),
            }));
        let checker = checker(client);
        let mut rx = checker.subscribe();

        checker.on_edit("alice2");
        let check = rx
            .wait_for(|c| c.status == UsernameStatus::Error)
            .await
            .unwrap()
            .clone();
        assert_eq!(check.message.as_deref(), Some("Try again soon"));
        assert_eq!(check.candidate, "alice2");
    }

    #[tokio::test(start_paused = true)]
    async fn unexplained_failure_uses_fallback() {
        let mut client = MockAvailability::new();
        client
            .expect_check_username()
            .times(1)
            .returning(|_| Ok(UsernameAvailability::failure(Some("  ".into()))));
        let checker = checker(client);
        let mut rx = checker.subscribe();

        checker.on_edit("alice2");
        let check = rx
            .wait_for(|c| c.status == UsernameStatus::Error)
            .await
            .unwrap()
            .clone();
        assert_eq!(check.message.as_deref(), Some(DEFAULT_FALLBACK_ERROR));
    }

    #[tokio::test(start_paused = true)]
    async fn edits_after_shutdown_are_ignored() {
        let mut client = MockAvailability::new();
        client.expect_check_username().never();
        let checker = checker(client);

        checker.on_edit("alice2");
        checker.shutdown();
        checker.shutdown();
        checker.on_edit("a");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(checker.is_closed());
        assert_eq!(checker.current().status, UsernameStatus::Pending);
    }

    #[test]
    fn edit_outside_runtime_settles_as_error() {
        let mut client = MockAvailability::new();
        client.expect_check_username().never();
        let checker = checker(client);

        checker.on_edit("alice2");
        let check = checker.current();
        assert_eq!(check.status, UsernameStatus::Error);
        assert_eq!(check.message.as_deref(), Some(DEFAULT_FALLBACK_ERROR));
    }
}
