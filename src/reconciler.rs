//! Reconciler for ToadLester generator settings.
//!
//! The remote service has no notion of resources. This module maps the
//! create/read/update/delete lifecycle onto its two primitives and decides,
//! from a fresh snapshot, whether a setting has drifted.
//!
//! Create, update and delete are the same operation: a reseed of the named
//! generator followed by an echo check of the response text. They all go
//! through [`Reconciler::reseed`].

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ReconcileError, Result};
use crate::identity::{AGGREGATE_TAG, IdentityStrategy, ResourceIdentity};
use crate::toadlester::{RemoteConfigSnapshot, SeriesApi, Setting};

/// Lifecycle intent, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Start a new sequence.
    Create,
    /// Observe the current value.
    Read,
    /// Replace the current sequence.
    Update,
    /// Discard the current sequence.
    Delete,
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Observed setting plus the identity tag issued for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciled {
    /// Setting as observed after the operation.
    pub setting: Setting,
    /// Identity tag for host bookkeeping.
    pub identity: ResourceIdentity,
}

/// Result of an aggregate read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRead {
    /// Every generator variable and its current value.
    pub snapshot: RemoteConfigSnapshot,
    /// Base endpoint the snapshot came from.
    pub endpoint: String,
    /// Identity tag for host bookkeeping.
    pub identity: ResourceIdentity,
}

/// Reconciler driving one ToadLester endpoint.
#[derive(Debug)]
pub struct Reconciler<A: SeriesApi> {
    /// Remote API.
    api: A,
    /// Identity tag generation.
    identity_strategy: IdentityStrategy,
}

impl<A: SeriesApi> Reconciler<A> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self {
            api,
            identity_strategy: IdentityStrategy::Timestamp,
        }
    }

    /// Sets the identity strategy.
    #[must_use]
    pub const fn with_identity_strategy(mut self, strategy: IdentityStrategy) -> Self {
        self.identity_strategy = strategy;
        self
    }

    /// Returns the underlying API.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Starts a new sequence for `desired`.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or a validation error if the response does
    /// not echo the name, value and algorithm.
    pub async fn create(&self, desired: &Setting) -> Result<Reconciled> {
        self.reseed(desired, Lifecycle::Create).await
    }

    /// Replaces the sequence for `desired`. Same as [`Self::create`].
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    pub async fn update(&self, desired: &Setting) -> Result<Reconciled> {
        self.reseed(desired, Lifecycle::Update).await
    }

    /// Discards the sequence for `desired` by reseeding it with the given
    /// value. Same as [`Self::create`].
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    pub async fn delete(&self, desired: &Setting) -> Result<Reconciled> {
        self.reseed(desired, Lifecycle::Delete).await
    }

    /// Reads the current value for `desired`.
    ///
    /// The observed setting keeps `name` and `algo` from `desired` and takes
    /// `value` from the snapshot; a differing value is drift.
    ///
    /// # Errors
    ///
    /// Returns a transport error, a parse error if the body is not a
    /// snapshot, or a drift error if the snapshot has no entry for the name.
    pub async fn read(&self, desired: &Setting) -> Result<Reconciled> {
        debug!("{} {}", Lifecycle::Read, desired.name);

        let body = self.api.read_series(desired).await?;
        let snapshot = RemoteConfigSnapshot::parse(&body)?;

        let Some(actual) = snapshot.get(&desired.name) else {
            warn!("{} is missing from the remote configuration", desired.name);
            return Err(ReconcileError::Drift {
                name: desired.name.clone(),
                body,
            }
            .into());
        };

        if actual != desired.value {
            warn!(
                "Drift on {}: desired {}, observed {actual}",
                desired.name, desired.value
            );
        }

        Ok(Reconciled {
            setting: desired.with_value(actual),
            identity: self.tag(&desired.name),
        })
    }

    /// Reads the whole remote configuration.
    ///
    /// # Errors
    ///
    /// Returns a transport error or a parse error.
    pub async fn read_aggregate(&self) -> Result<AggregateRead> {
        debug!("Reading full remote configuration");

        let body = self.api.read_series(&Setting::default()).await?;
        let snapshot = RemoteConfigSnapshot::parse(&body)?;

        debug!("Snapshot holds {} variables", snapshot.len());
        Ok(AggregateRead {
            snapshot,
            endpoint: self.api.endpoint(),
            identity: self.tag(AGGREGATE_TAG),
        })
    }

    /// Compares every desired setting with the remote configuration.
    ///
    /// # Errors
    ///
    /// Returns the first transport or parse error; a missing key is recorded
    /// as [`DriftStatus::Missing`] instead.
    pub async fn check_drift(&self, desired: &[Setting]) -> Result<DriftReport> {
        info!("Checking drift for {} settings", desired.len());

        let mut entries = Vec::with_capacity(desired.len());
        for setting in desired {
            let status = match self.read(setting).await {
                Ok(observed) if observed.setting.value == setting.value => DriftStatus::InSync,
                Ok(observed) => DriftStatus::Drifted {
                    observed: observed.setting.value,
                },
                Err(e) if e.is_drift() => DriftStatus::Missing,
                Err(e) => return Err(e),
            };
            entries.push(DriftEntry {
                desired: setting.clone(),
                status,
            });
        }

        Ok(DriftReport { entries })
    }

    /// Converges every desired setting: missing ones are created, drifted
    /// ones updated, in-sync ones left alone.
    ///
    /// Errors are recorded per setting and the loop carries on.
    pub async fn reconcile(&self, desired: &[Setting]) -> ReconciliationResult {
        info!("Reconciling {} settings", desired.len());

        let mut result = ReconciliationResult::default();
        for setting in desired {
            let outcome = self.reconcile_one(setting).await;
            match &outcome.action {
                Some(Lifecycle::Create) => result.created += 1,
                Some(Lifecycle::Update) => result.updated += 1,
                Some(_) => {}
                None if outcome.error.is_none() => result.unchanged += 1,
                None => {}
            }
            if let Some(error) = &outcome.error {
                result.errors.push(format!("{}: {error}", setting.name));
            }
            result.outcomes.push(outcome);
        }

        result.success = result.errors.is_empty();
        result
    }

    async fn reconcile_one(&self, setting: &Setting) -> SettingOutcome {
        let (action, applied) = match self.read(setting).await {
            Ok(observed) if observed.setting.value == setting.value => {
                debug!("{} is in sync", setting.name);
                return SettingOutcome {
                    name: setting.name.clone(),
                    action: None,
                    identity: Some(observed.identity),
                    error: None,
                };
            }
            Ok(_) => (Lifecycle::Update, self.update(setting).await),
            Err(e) if e.is_drift() => (Lifecycle::Create, self.create(setting).await),
            Err(e) => {
                return SettingOutcome {
                    name: setting.name.clone(),
                    action: None,
                    identity: None,
                    error: Some(e.to_string()),
                };
            }
        };

        match applied {
            Ok(reconciled) => SettingOutcome {
                name: setting.name.clone(),
                action: Some(action),
                identity: Some(reconciled.identity),
                error: None,
            },
            Err(e) => SettingOutcome {
                name: setting.name.clone(),
                action: None,
                identity: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Shared create/update/delete path.
    async fn reseed(&self, desired: &Setting, intent: Lifecycle) -> Result<Reconciled> {
        debug!("{intent} {}", desired);

        let body = self.api.reseed(desired).await?;
        Self::verify_echo(desired, &body)?;

        info!("{intent} {} succeeded", desired.name);
        Ok(Reconciled {
            setting: desired.clone(),
            identity: self.tag(&desired.name),
        })
    }

    /// The confirmation text must contain all three fields.
    fn verify_echo(desired: &Setting, body: &str) -> Result<()> {
        let missing: Vec<String> = [&desired.name, &desired.value, &desired.algo]
            .into_iter()
            .filter(|token| !body.contains(token.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReconcileError::Validation {
                name: desired.name.clone(),
                missing,
                body: body.to_string(),
            }
            .into())
        }
    }

    fn tag(&self, name: &str) -> ResourceIdentity {
        ResourceIdentity::generate(name, self.identity_strategy)
    }
}

/// Drift state of one desired setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DriftStatus {
    /// Observed value equals desired value.
    InSync,
    /// Observed value differs.
    Drifted {
        /// Value currently reported by the service.
        observed: String,
    },
    /// The service has no record of the name.
    Missing,
}

/// One line of a drift report.
#[derive(Debug, Clone, Serialize)]
pub struct DriftEntry {
    /// Desired setting.
    pub desired: Setting,
    /// Comparison outcome.
    pub status: DriftStatus,
}

/// Report of drift detection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DriftReport {
    /// One entry per desired setting, in input order.
    pub entries: Vec<DriftEntry>,
}

impl DriftReport {
    /// Returns true if every setting is in sync.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.entries
            .iter()
            .all(|e| matches!(e.status, DriftStatus::InSync))
    }

    /// Names of settings that are drifted or missing.
    #[must_use]
    pub fn drifted(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !matches!(e.status, DriftStatus::InSync))
            .map(|e| e.desired.name.as_str())
            .collect()
    }
}

impl std::fmt::Display for DriftReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_converged() {
            return write!(f, "No drift detected - remote configuration matches");
        }
        writeln!(f, "Drift detected:")?;
        for entry in &self.entries {
            match &entry.status {
                DriftStatus::InSync => {}
                DriftStatus::Drifted { observed } => writeln!(
                    f,
                    "  ~ {}: desired {}, observed {observed}",
                    entry.desired.name, entry.desired.value
                )?,
                DriftStatus::Missing => {
                    writeln!(f, "  + {}: missing remotely", entry.desired.name)?;
                }
            }
        }
        Ok(())
    }
}

/// What happened to one setting during [`Reconciler::reconcile`].
#[derive(Debug, Clone, Serialize)]
pub struct SettingOutcome {
    /// Setting name.
    pub name: String,
    /// Lifecycle action taken, `None` when nothing was applied.
    pub action: Option<Lifecycle>,
    /// Identity issued by the last successful operation.
    pub identity: Option<ResourceIdentity>,
    /// Error message, if the setting could not be reconciled.
    pub error: Option<String>,
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationResult {
    /// Whether every setting was reconciled.
    pub success: bool,
    /// Number of settings created.
    pub created: usize,
    /// Number of settings updated.
    pub updated: usize,
    /// Number of settings unchanged.
    pub unchanged: usize,
    /// Errors encountered.
    pub errors: Vec<String>,
    /// Per-setting outcomes, in input order.
    pub outcomes: Vec<SettingOutcome>,
}

impl std::fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.success { "successful" } else { "failed" };
        writeln!(f, "Reconciliation {status}:")?;
        writeln!(f, "  Created: {}", self.created)?;
        writeln!(f, "  Updated: {}", self.updated)?;
        writeln!(f, "  Unchanged: {}", self.unchanged)?;

        if !self.errors.is_empty() {
            writeln!(f, "  Errors:")?;
            for error in &self.errors {
                writeln!(f, "    - {error}")?;
            }
        }

        Ok(())
    }
}
