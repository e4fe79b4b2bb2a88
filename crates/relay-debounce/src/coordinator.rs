//! Orchestration of inbound updates, immediate firing, and the periodic
//! sweep.

use std::sync::Arc;

use relay_models::{DispatchTarget, EntityId, TrackedEntity};
use tracing::{debug, info, warn};

use crate::error::{DebounceError, Result};
use crate::policy::DebouncePolicy;
use crate::store::TriggerStore;
use crate::traits::{Clock, Dispatcher, EntityRegistry, Notifier, NotifyOutcome};

/// Outcome of handling one inbound update event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The trigger was (re)scheduled for a later time.
    Scheduled {
        /// Earliest time the trigger may fire, epoch milliseconds.
        next_trigger_time: i64,
    },
    /// The trigger was due immediately and the dispatch succeeded.
    Fired,
    /// The trigger was due immediately but the dispatch failed; the
    /// record stays pending and the next sweep retries.
    DispatchFailed,
    /// The entity is tracked but has no dispatch target; acknowledged,
    /// no state change.
    NoTarget,
    /// The entity is not in the registry; acknowledged, no state change.
    Unknown,
}

/// Summary of one sweep over the tracked entities.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    /// Entities enumerated from the registry.
    pub scanned: usize,
    /// Entities skipped for lack of a dispatch target.
    pub skipped: usize,
    /// Due entities whose dispatch succeeded.
    pub fired: usize,
    /// Due entities whose dispatch or record cleanup failed.
    pub failed: usize,
}

/// Coordinates the per-entity trigger state machine.
///
/// Each entity moves through Idle (no record, or not pending), Pending
/// (record scheduled), and Firing (dispatch in flight). A successful
/// dispatch deletes the record; a failed one leaves it intact so the next
/// sweep retries. At-least-once, never silently dropped.
pub struct Coordinator {
    trigger_store: TriggerStore,
    policy: DebouncePolicy,
    registry: Arc<dyn EntityRegistry>,
    dispatcher: Arc<dyn Dispatcher>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl Coordinator {
    /// Creates a coordinator with all collaborators injected.
    pub fn new(
        trigger_store: TriggerStore,
        policy: DebouncePolicy,
        registry: Arc<dyn EntityRegistry>,
        dispatcher: Arc<dyn Dispatcher>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            trigger_store,
            policy,
            registry,
            dispatcher,
            notifier,
            clock,
        }
    }

    /// Returns the configured debounce policy.
    pub fn policy(&self) -> DebouncePolicy {
        self.policy
    }

    /// Returns the trigger record currently stored for an entity, if any.
    pub async fn trigger_state(&self, entity_id: &EntityId) -> Option<relay_models::TriggerRecord> {
        self.trigger_store.get(entity_id).await
    }

    /// Handles one qualifying inbound update for an entity.
    ///
    /// Entities without a dispatch target are filtered out before any
    /// state is written: the event is acknowledged but produces no record
    /// and no dispatch.
    pub async fn notify_update(&self, entity_id: &EntityId) -> Result<UpdateOutcome> {
        let entity = self
            .registry
            .find_entity(entity_id)
            .await
            .map_err(|e| DebounceError::Registry(e.to_string()))?;

        let entity = match entity {
            Some(entity) => entity,
            None => {
                debug!(entity = %entity_id, "Update for unknown entity; no action");
                self.send_note(&format!("Update for unknown database {entity_id}; ignored."))
                    .await;
                return Ok(UpdateOutcome::Unknown);
            }
        };

        let target = match entity.dispatch_target.clone() {
            Some(target) => target,
            None => {
                debug!(entity = %entity_id, title = %entity.title, "Entity has no dispatch target; no action");
                self.send_note(&format!(
                    "\u{2139} {} updated, but no repository is linked; nothing to trigger.",
                    entity.title
                ))
                .await;
                return Ok(UpdateOutcome::NoTarget);
            }
        };

        let now = self.clock.now_ms();
        let record = self.policy.reschedule(entity_id.clone(), now);
        let next_trigger_time = record.next_trigger_time;
        self.trigger_store.put(&record).await?;
        info!(
            entity = %entity_id,
            next_trigger_time,
            "Trigger scheduled"
        );

        // Covers the delay=0 edge case: due the moment it was written.
        if DebouncePolicy::is_due(Some(&record), now) {
            return if self.fire(&entity, &target).await? {
                Ok(UpdateOutcome::Fired)
            } else {
                Ok(UpdateOutcome::DispatchFailed)
            };
        }

        Ok(UpdateOutcome::Scheduled { next_trigger_time })
    }

    /// Fires the dispatch for an entity right now, bypassing the
    /// debounce window. Used by the manual control surface.
    ///
    /// Any pending trigger record is cleared on success, exactly as in
    /// the normal Firing step.
    pub async fn force_fire(&self, entity_id: &EntityId) -> Result<UpdateOutcome> {
        let entity = self
            .registry
            .find_entity(entity_id)
            .await
            .map_err(|e| DebounceError::Registry(e.to_string()))?;

        let entity = match entity {
            Some(entity) => entity,
            None => return Ok(UpdateOutcome::Unknown),
        };
        let target = match entity.dispatch_target.clone() {
            Some(target) => target,
            None => return Ok(UpdateOutcome::NoTarget),
        };

        if self.fire(&entity, &target).await? {
            Ok(UpdateOutcome::Fired)
        } else {
            Ok(UpdateOutcome::DispatchFailed)
        }
    }

    /// Runs one sweep over all tracked entities, firing every due
    /// trigger. A failure on one entity never aborts the rest of the
    /// sweep.
    pub async fn run_sweep(&self) -> Result<SweepSummary> {
        let entities = self
            .registry
            .list_tracked_entities()
            .await
            .map_err(|e| DebounceError::Registry(e.to_string()))?;

        let mut summary = SweepSummary {
            scanned: entities.len(),
            ..SweepSummary::default()
        };

        for entity in &entities {
            let target = match &entity.dispatch_target {
                Some(target) => target,
                None => {
                    summary.skipped += 1;
                    continue;
                }
            };

            let record = self.trigger_store.get(&entity.id).await;
            let now = self.clock.now_ms();
            if !DebouncePolicy::is_due(record.as_ref(), now) {
                continue;
            }

            match self.fire(entity, target).await {
                Ok(true) => summary.fired += 1,
                Ok(false) => summary.failed += 1,
                Err(e) => {
                    // Isolate the failure and keep scanning.
                    warn!(entity = %entity.id, error = %e, "Sweep step failed for entity");
                    summary.failed += 1;
                }
            }
        }

        info!(
            scanned = summary.scanned,
            skipped = summary.skipped,
            fired = summary.fired,
            failed = summary.failed,
            "Sweep complete"
        );
        Ok(summary)
    }

    /// Performs the Firing step for a due entity.
    ///
    /// Returns `Ok(true)` when the dispatch succeeded and the record was
    /// cleared, `Ok(false)` when the dispatch failed (record left intact
    /// for the next sweep).
    async fn fire(&self, entity: &TrackedEntity, target: &DispatchTarget) -> Result<bool> {
        match self.dispatcher.dispatch(target).await {
            Ok(()) => {
                self.trigger_store.delete(&entity.id).await?;
                info!(entity = %entity.id, target = %target, "Dispatch fired, trigger cleared");
                self.send_note(&format!(
                    "\u{1F680} {}: workflow triggered on {}.",
                    entity.title, target
                ))
                .await;
                Ok(true)
            }
            Err(e) => {
                warn!(entity = %entity.id, target = %target, error = %e, "Dispatch failed; trigger kept for retry");
                self.send_note(&format!(
                    "\u{26A0} {}: failed to trigger {} ({}). Will retry.",
                    entity.title, target, e
                ))
                .await;
                Ok(false)
            }
        }
    }

    /// Sends a best-effort notification; the outcome only feeds a log
    /// line.
    async fn send_note(&self, message: &str) {
        match self.notifier.notify(message).await {
            NotifyOutcome::Sent => {}
            NotifyOutcome::Failed(reason) => {
                warn!(reason = %reason, "Notification delivery failed");
            }
        }
    }
}
