//! IdleWatchdog - Prompts and mutes members left alone in a channel.
//!
//! Per channel: `Normal -> Lonely -> AwaitingConfirmation -> (Normal | Muted)`.
//!
//! Every piece of mutable state (watches, prompts, the mute record, pending
//! unmutes) lives behind one mutex. Presence events and timer tasks both take
//! it for every read-modify-write, and a timer only acts after finding its
//! own watch id still current under that lock. Aborting the timer task is an
//! optimisation on top of that check, never a substitute for it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::foundation::{ChannelKey, GroupId, MemberId, MemberKey, PromptId, WatchId};
use crate::domain::presence::{ChannelSnapshot, PresenceEvent};
use crate::domain::watchdog::{
    ConfirmationOutcome, ConfirmationPrompt, GroupSettings, IdleWatch, MuteRecord,
    DEFAULT_CONFIRMATION_MARKER,
};
use crate::domain::Announcement;
use crate::ports::{Clock, GroupSettingsRepository, MemberStatsRepository, MuteActuator, Notifier};

/// Default pause between a muted member's rejoin and the unmute call.
pub const DEFAULT_UNMUTE_DELAY: Duration = Duration::from_millis(1000);

/// Configuration for the idle watchdog.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// Delay before unmuting a returning member.
    pub unmute_delay: Duration,

    /// Marker the prompted member must answer with.
    pub confirmation_marker: String,

    /// Used when the settings repository cannot be read.
    pub fallback_settings: GroupSettings,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            unmute_delay: DEFAULT_UNMUTE_DELAY,
            confirmation_marker: DEFAULT_CONFIRMATION_MARKER.to_string(),
            fallback_settings: GroupSettings::default(),
        }
    }
}

impl WatchdogConfig {
    pub fn with_unmute_delay(mut self, delay: Duration) -> Self {
        self.unmute_delay = delay;
        self
    }

    pub fn with_confirmation_marker(mut self, marker: impl Into<String>) -> Self {
        self.confirmation_marker = marker.into();
        self
    }

    pub fn with_fallback_settings(mut self, settings: GroupSettings) -> Self {
        self.fallback_settings = settings;
        self
    }
}

/// Outbound collaborators of the watchdog.
#[derive(Clone)]
pub struct WatchdogPorts {
    pub notifier: Arc<dyn Notifier>,
    pub actuator: Arc<dyn MuteActuator>,
    pub settings: Arc<dyn GroupSettingsRepository>,
    pub stats: Arc<dyn MemberStatsRepository>,
    pub clock: Arc<dyn Clock>,
}

struct ArmedWatch {
    watch: IdleWatch,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct WatchdogState {
    /// At most one per channel.
    watches: HashMap<ChannelKey, ArmedWatch>,
    /// At most one per member.
    prompts: HashMap<MemberKey, ConfirmationPrompt>,
    mute_record: MuteRecord,
    /// Channels whose sole occupant already went through a timeout and is
    /// still there. No new cycle starts until the roster changes.
    settled: HashMap<ChannelKey, MemberId>,
    pending_unmutes: HashMap<MemberKey, JoinHandle<()>>,
}

struct Inner {
    state: Mutex<WatchdogState>,
    ports: WatchdogPorts,
    config: WatchdogConfig,
}

/// Idle watchdog. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct IdleWatchdog {
    inner: Arc<Inner>,
}

impl IdleWatchdog {
    pub fn new(ports: WatchdogPorts, config: WatchdogConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(WatchdogState::default()),
                ports,
                config,
            }),
        }
    }

    /// Applies one presence event: arms or cancels watches for every channel
    /// whose roster changed, then schedules an unmute if a muted member
    /// arrived somewhere.
    pub async fn on_event(&self, event: &PresenceEvent) {
        let mut state = self.inner.state.lock().await;

        for channel in event.affected_channels() {
            Inner::apply_roster(&self.inner, &mut state, channel);
        }

        if event.is_arrival() {
            let member = MemberKey::new(event.group_id(), event.member());
            Inner::schedule_unmute(&self.inner, &mut state, member);
        }
    }

    /// Cancels every timer and pending unmute. Outstanding prompts are
    /// withdrawn; the mute record is kept.
    pub async fn shutdown(&self) {
        let mut state = self.inner.state.lock().await;

        let channels: Vec<ChannelKey> = state.watches.keys().copied().collect();
        for channel in channels {
            Inner::cancel_watch(&mut state, &channel, "shutdown");
        }
        for (_, task) in state.pending_unmutes.drain() {
            task.abort();
        }
        debug!("Idle watchdog stopped");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn watch_for(&self, channel: &ChannelKey) -> Option<IdleWatch> {
        let state = self.inner.state.lock().await;
        state.watches.get(channel).map(|armed| armed.watch.clone())
    }

    pub async fn watch_count(&self) -> usize {
        self.inner.state.lock().await.watches.len()
    }

    pub async fn pending_prompt(&self, member: &MemberKey) -> Option<ConfirmationPrompt> {
        self.inner.state.lock().await.prompts.get(member).cloned()
    }

    pub async fn prompt_count(&self) -> usize {
        self.inner.state.lock().await.prompts.len()
    }

    /// True if we muted `member` and have not unmuted them yet.
    pub async fn owes_unmute(&self, member: &MemberKey) -> bool {
        self.inner.state.lock().await.mute_record.owes_unmute(member)
    }

    pub async fn muted_members(&self) -> Vec<MemberKey> {
        let state = self.inner.state.lock().await;
        let mut members: Vec<MemberKey> = state.mute_record.iter().copied().collect();
        members.sort();
        members
    }
}

impl Inner {
    fn apply_roster(this: &Arc<Inner>, state: &mut WatchdogState, channel: &ChannelSnapshot) {
        let key = channel.key;

        let Some(member) = channel.sole_member() else {
            state.settled.remove(&key);
            Inner::cancel_watch(state, &key, "occupancy changed");
            return;
        };

        if state.settled.get(&key) == Some(&member) {
            return;
        }
        state.settled.remove(&key);

        if let Some(armed) = state.watches.get(&key) {
            if armed.watch.member() == member {
                return;
            }
            Inner::cancel_watch(state, &key, "different sole occupant");
        }

        let watch = IdleWatch::arm(key, member, this.ports.clock.now());
        let timer = tokio::spawn(Inner::run_watch(Arc::clone(this), key, watch.id(), member));
        info!(
            group_id = %key.group_id,
            channel_id = %key.channel_id,
            member_id = %member,
            watch_id = %watch.id(),
            "Channel is lonely; watch armed"
        );
        state.watches.insert(key, ArmedWatch { watch, timer });
    }

    /// Removes the channel's watch, aborts its timer and withdraws its prompt.
    /// Safe to call when there is no watch, or when its timer already fired.
    fn cancel_watch(state: &mut WatchdogState, channel: &ChannelKey, reason: &str) {
        let Some(armed) = state.watches.remove(channel) else {
            return;
        };
        armed.timer.abort();

        if let Some(prompt_id) = armed.watch.prompt() {
            Inner::withdraw_prompt(state, &armed.watch.member_key(), prompt_id);
        }

        debug!(
            group_id = %channel.group_id,
            channel_id = %channel.channel_id,
            member_id = %armed.watch.member(),
            watch_id = %armed.watch.id(),
            reason,
            "Watch cancelled"
        );
    }

    fn withdraw_prompt(state: &mut WatchdogState, member: &MemberKey, prompt_id: PromptId) {
        if state.prompts.get(member).map(|p| p.id()) != Some(prompt_id) {
            return;
        }
        if let Some(mut prompt) = state.prompts.remove(member) {
            // resolve-or-withdraw happens exactly once; a resolved prompt
            // is simply dropped
            let _ = prompt.withdraw();
        }
    }

    /// Timer task for one armed watch.
    async fn run_watch(this: Arc<Inner>, channel: ChannelKey, watch_id: WatchId, member: MemberId) {
        let settings = this.settings_for(channel.group_id).await;
        tokio::time::sleep(settings.lonely_timeout()).await;

        // Re-read settings: the reaction wait applies from when the prompt goes out.
        let settings = this.settings_for(channel.group_id).await;
        let member_key = channel.member(member);

        let prompt_id = {
            let mut state = this.state.lock().await;
            match Inner::open_prompt(&this, &mut state, channel, watch_id, member, &settings) {
                Some(id) => id,
                None => return,
            }
        };

        let handle = match this
            .ports
            .notifier
            .send_confirmation_prompt(&channel, member, &this.config.confirmation_marker)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    group_id = %channel.group_id,
                    channel_id = %channel.channel_id,
                    member_id = %member,
                    error = %e,
                    "Confirmation prompt not delivered; abandoning watch"
                );
                let mut state = this.state.lock().await;
                Inner::take_if_current(&mut state, &channel, watch_id, member);
                Inner::withdraw_prompt(&mut state, &member_key, prompt_id);
                return;
            }
        };

        info!(
            group_id = %channel.group_id,
            channel_id = %channel.channel_id,
            member_id = %member,
            watch_id = %watch_id,
            wait_minutes = settings.reaction_wait_minutes(),
            "Confirmation prompt sent"
        );

        let outcome = this
            .ports
            .notifier
            .await_confirmation(&handle, settings.reaction_wait())
            .await;

        let mut state = this.state.lock().await;

        // The prompt is the "already resolved" flag: whoever resolves it
        // first owns the effect.
        let resolved = match state.prompts.get_mut(&member_key) {
            Some(prompt) if prompt.id() == prompt_id => prompt.resolve(outcome).is_ok(),
            _ => false,
        };
        if !resolved {
            debug!(
                group_id = %channel.group_id,
                channel_id = %channel.channel_id,
                member_id = %member,
                watch_id = %watch_id,
                "Prompt no longer current; nothing to do"
            );
            return;
        }
        state.prompts.remove(&member_key);

        let Some(mut watch) = Inner::take_if_current(&mut state, &channel, watch_id, member) else {
            return;
        };

        match outcome {
            ConfirmationOutcome::Confirmed => {
                if let Err(e) = watch.confirm() {
                    warn!(watch_id = %watch_id, error = %e, "Unexpected watch state on confirm");
                }
                drop(state);

                info!(
                    group_id = %channel.group_id,
                    channel_id = %channel.channel_id,
                    member_id = %member,
                    "Member confirmed; mute cancelled"
                );
                this.announce(channel.group_id, Announcement::MuteCancelled { channel, member })
                    .await;
            }
            ConfirmationOutcome::TimedOut => {
                if let Err(e) = watch.expire() {
                    warn!(watch_id = %watch_id, error = %e, "Unexpected watch state on expiry");
                }
                state.settled.insert(channel, member);

                // The actuator call runs under the lock so that a rejoin
                // observed meanwhile sees the mute record already updated.
                let muted = match this.ports.actuator.mute(&member_key).await {
                    Ok(()) => state.mute_record.record(member_key),
                    Err(e) if e.is_not_found() => {
                        debug!(
                            group_id = %channel.group_id,
                            member_id = %member,
                            "Member left the group before the mute; nothing to do"
                        );
                        return;
                    }
                    Err(e) => {
                        warn!(
                            group_id = %channel.group_id,
                            member_id = %member,
                            error = %e,
                            "Mute failed; watch discarded"
                        );
                        return;
                    }
                };
                drop(state);

                if !muted {
                    debug!(member_id = %member, "Member was already in the mute record");
                    return;
                }

                info!(
                    group_id = %channel.group_id,
                    channel_id = %channel.channel_id,
                    member_id = %member,
                    "No confirmation; member muted"
                );
                if let Err(e) = this.ports.stats.increment_mute_count(&member_key).await {
                    warn!(member_id = %member, error = %e, "Failed to count mute");
                }
                this.announce(channel.group_id, Announcement::Muted { channel, member })
                    .await;
            }
        }
    }

    /// Creates the prompt for a watch whose timer just fired, if the watch is
    /// still current and its member has no other prompt outstanding.
    fn open_prompt(
        this: &Arc<Inner>,
        state: &mut WatchdogState,
        channel: ChannelKey,
        watch_id: WatchId,
        member: MemberId,
        settings: &GroupSettings,
    ) -> Option<PromptId> {
        let member_key = channel.member(member);

        let Some(armed) = state.watches.get_mut(&channel) else {
            debug!(watch_id = %watch_id, "Timer fired for a cancelled watch");
            return None;
        };
        if !armed.watch.is_current(watch_id, member) {
            debug!(watch_id = %watch_id, "Timer fired for a superseded watch");
            return None;
        }
        if state.prompts.contains_key(&member_key) {
            debug!(
                member_id = %member,
                "Member already has a prompt outstanding; skipping"
            );
            return None;
        }

        let now = this.ports.clock.now();
        let wait = chrono::Duration::from_std(settings.reaction_wait())
            .unwrap_or_else(|_| chrono::Duration::minutes(i64::from(settings.reaction_wait_minutes())));
        let prompt = ConfirmationPrompt::new(
            watch_id,
            member_key,
            channel,
            this.config.confirmation_marker.clone(),
            now,
            now.plus(wait),
        );

        if let Err(e) = armed.watch.await_confirmation(prompt.id()) {
            warn!(watch_id = %watch_id, error = %e, "Unexpected watch state on timeout");
            return None;
        }

        let id = prompt.id();
        state.prompts.insert(member_key, prompt);
        Some(id)
    }

    fn take_if_current(
        state: &mut WatchdogState,
        channel: &ChannelKey,
        watch_id: WatchId,
        member: MemberId,
    ) -> Option<IdleWatch> {
        let current = state
            .watches
            .get(channel)
            .is_some_and(|armed| armed.watch.is_current(watch_id, member));
        if !current {
            return None;
        }
        // The calling task is this watch's own timer; its handle is dropped,
        // not aborted.
        state.watches.remove(channel).map(|armed| armed.watch)
    }

    fn schedule_unmute(this: &Arc<Inner>, state: &mut WatchdogState, member: MemberKey) {
        if !state.mute_record.owes_unmute(&member) {
            return;
        }
        if state.pending_unmutes.contains_key(&member) {
            debug!(member_id = %member.member_id, "Unmute already scheduled");
            return;
        }

        debug!(
            group_id = %member.group_id,
            member_id = %member.member_id,
            "Muted member rejoined; unmute scheduled"
        );
        let task = tokio::spawn(Inner::run_unmute(Arc::clone(this), member));
        state.pending_unmutes.insert(member, task);
    }

    async fn run_unmute(this: Arc<Inner>, member: MemberKey) {
        tokio::time::sleep(this.config.unmute_delay).await;

        let mut state = this.state.lock().await;
        state.pending_unmutes.remove(&member);

        if !state.mute_record.owes_unmute(&member) {
            return;
        }

        match this.ports.actuator.unmute(&member).await {
            Ok(()) => {
                state.mute_record.release(&member);
            }
            Err(e) if e.is_not_found() => {
                state.mute_record.release(&member);
                debug!(
                    group_id = %member.group_id,
                    member_id = %member.member_id,
                    "Member left the group; mute record released"
                );
                return;
            }
            Err(e) => {
                warn!(
                    group_id = %member.group_id,
                    member_id = %member.member_id,
                    error = %e,
                    "Unmute failed; will retry on next rejoin"
                );
                return;
            }
        }
        drop(state);

        info!(
            group_id = %member.group_id,
            member_id = %member.member_id,
            "Member unmuted"
        );
        this.announce(
            member.group_id,
            Announcement::Unmuted {
                member: member.member_id,
            },
        )
        .await;
    }

    async fn settings_for(&self, group: GroupId) -> GroupSettings {
        match self.ports.settings.get(group).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(group_id = %group, error = %e, "Group settings unavailable; using defaults");
                self.config.fallback_settings
            }
        }
    }

    async fn announce(&self, group: GroupId, announcement: Announcement) {
        if let Err(e) = self.ports.notifier.announce(group, &announcement).await {
            warn!(group_id = %group, kind = announcement.kind(), error = %e, "Announcement failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryGroupSettingsRepository, InMemoryMemberStatsRepository, InMemoryMuteActuator,
        InMemoryNotifier,
    };
    use crate::adapters::TokioClock;
    use crate::domain::watchdog::WatchState;

    const GROUP: u64 = 1;
    const A: u64 = 100;
    const B: u64 = 200;

    const LONELY: Duration = Duration::from_secs(180 * 60);
    const WAIT: Duration = Duration::from_secs(5 * 60);

    struct Fixture {
        watchdog: IdleWatchdog,
        notifier: Arc<InMemoryNotifier>,
        actuator: Arc<InMemoryMuteActuator>,
        stats: Arc<InMemoryMemberStatsRepository>,
    }

    fn fixture() -> Fixture {
        fixture_with(InMemoryMuteActuator::new())
    }

    fn fixture_with(actuator: InMemoryMuteActuator) -> Fixture {
        let notifier = Arc::new(InMemoryNotifier::new());
        let actuator = Arc::new(actuator);
        let stats = Arc::new(InMemoryMemberStatsRepository::new());
        let ports = WatchdogPorts {
            notifier: notifier.clone(),
            actuator: actuator.clone(),
            settings: Arc::new(InMemoryGroupSettingsRepository::default()),
            stats: stats.clone(),
            clock: Arc::new(TokioClock::new()),
        };
        Fixture {
            watchdog: IdleWatchdog::new(ports, WatchdogConfig::default()),
            notifier,
            actuator,
            stats,
        }
    }

    fn room(channel: u64, members: &[u64]) -> ChannelSnapshot {
        ChannelSnapshot::new(
            ChannelKey::new(GROUP, channel),
            "Lounge",
            members.iter().copied().map(MemberId::new).collect(),
        )
    }

    fn join(member: u64, channel: ChannelSnapshot) -> PresenceEvent {
        PresenceEvent::Join {
            member: MemberId::new(member),
            channel,
        }
    }

    fn leave(member: u64, channel: ChannelSnapshot) -> PresenceEvent {
        PresenceEvent::Leave {
            member: MemberId::new(member),
            channel,
        }
    }

    fn key(member: u64) -> MemberKey {
        MemberKey::new(GROUP, member)
    }

    /// Lets spawned timer tasks run up to their next suspension point.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
        settle().await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn sole_occupant_arms_a_watch() {
        let f = fixture();

        f.watchdog.on_event(&join(A, room(10, &[A]))).await;

        let watch = f.watchdog.watch_for(&ChannelKey::new(GROUP, 10)).await.unwrap();
        assert_eq!(watch.member(), MemberId::new(A));
        assert_eq!(watch.state(), WatchState::Lonely);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn second_member_cancels_before_timeout() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;

        f.watchdog.on_event(&join(B, room(10, &[A, B]))).await;
        advance(LONELY + WAIT).await;

        assert_eq!(f.watchdog.watch_count().await, 0);
        assert!(f.notifier.prompts().await.is_empty());
        assert_eq!(f.actuator.mute_calls().await, 0);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn unanswered_prompt_mutes_exactly_once() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;

        advance(LONELY).await;
        assert_eq!(f.notifier.prompts_for(MemberId::new(A)).await, 1);
        assert!(f.watchdog.pending_prompt(&key(A)).await.is_some());

        // duplicate roster noise while the prompt is out
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(WAIT).await;

        assert_eq!(f.actuator.mute_calls().await, 1);
        assert!(f.actuator.is_muted(&key(A)).await);
        assert_eq!(f.watchdog.muted_members().await, vec![key(A)]);
        assert_eq!(f.watchdog.watch_count().await, 0);
        assert_eq!(f.watchdog.prompt_count().await, 0);
        assert_eq!(f.stats.mute_count(&key(A)).await.unwrap(), 1);
        assert_eq!(f.notifier.announcements_of_kind("muted").await.len(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn confirmation_cancels_the_mute() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY).await;

        assert!(f.notifier.confirm(&key(A), DEFAULT_CONFIRMATION_MARKER));
        settle().await;
        advance(WAIT).await;

        assert_eq!(f.actuator.mute_calls().await, 0);
        assert_eq!(f.watchdog.watch_count().await, 0);
        assert_eq!(f.watchdog.prompt_count().await, 0);
        assert_eq!(f.notifier.announcements_of_kind("mute_cancelled").await.len(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn leaving_during_prompt_withdraws_it() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY).await;
        assert_eq!(f.watchdog.prompt_count().await, 1);

        f.watchdog.on_event(&leave(A, room(10, &[]))).await;
        advance(WAIT).await;

        assert_eq!(f.watchdog.prompt_count().await, 0);
        assert_eq!(f.actuator.mute_calls().await, 0);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn rejoin_unmutes_once() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;
        assert!(f.watchdog.owes_unmute(&key(A)).await);

        f.watchdog.on_event(&leave(A, room(10, &[]))).await;
        f.watchdog.on_event(&join(A, room(20, &[A, B]))).await;
        advance(DEFAULT_UNMUTE_DELAY).await;

        assert_eq!(f.actuator.unmute_calls().await, 1);
        assert!(!f.watchdog.owes_unmute(&key(A)).await);

        f.watchdog.on_event(&leave(A, room(20, &[B]))).await;
        f.watchdog.on_event(&join(A, room(20, &[A, B]))).await;
        advance(DEFAULT_UNMUTE_DELAY).await;

        assert_eq!(f.actuator.unmute_calls().await, 1);
        assert_eq!(f.notifier.announcements_of_kind("unmuted").await.len(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn rapid_rejoins_schedule_one_unmute() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;

        f.watchdog.on_event(&join(A, room(20, &[A, B]))).await;
        f.watchdog.on_event(&join(A, room(30, &[A, B]))).await;
        advance(DEFAULT_UNMUTE_DELAY).await;

        assert_eq!(f.actuator.unmute_calls().await, 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn failed_unmute_keeps_record_for_next_rejoin() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;

        f.actuator.set_failing(true);
        f.watchdog.on_event(&join(A, room(20, &[A, B]))).await;
        advance(DEFAULT_UNMUTE_DELAY).await;
        assert!(f.watchdog.owes_unmute(&key(A)).await);

        f.actuator.set_failing(false);
        f.watchdog.on_event(&join(A, room(30, &[A, B]))).await;
        advance(DEFAULT_UNMUTE_DELAY).await;
        assert!(!f.watchdog.owes_unmute(&key(A)).await);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn failed_mute_discards_watch_without_record() {
        let actuator = InMemoryMuteActuator::new();
        actuator.set_failing(true);
        let f = fixture_with(actuator);

        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;

        assert_eq!(f.actuator.mute_calls().await, 1);
        assert_eq!(f.watchdog.watch_count().await, 0);
        assert!(!f.watchdog.owes_unmute(&key(A)).await);
        assert!(f.notifier.announcements_of_kind("muted").await.is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn member_gone_at_mute_time_is_skipped_quietly() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY).await;

        f.actuator.depart(key(A)).await;
        advance(WAIT).await;

        assert_eq!(f.actuator.mute_calls().await, 1);
        assert!(f.watchdog.muted_members().await.is_empty());
        assert_eq!(f.watchdog.watch_count().await, 0);
        assert_eq!(f.stats.mute_count(&key(A)).await.unwrap(), 0);
        assert!(f.notifier.announcements_of_kind("muted").await.is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn member_gone_at_unmute_time_releases_the_record() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;
        assert!(f.watchdog.owes_unmute(&key(A)).await);

        f.actuator.depart(key(A)).await;
        f.watchdog.on_event(&join(A, room(20, &[A, B]))).await;
        advance(DEFAULT_UNMUTE_DELAY).await;

        assert!(!f.watchdog.owes_unmute(&key(A)).await);
        assert!(f.watchdog.muted_members().await.is_empty());

        // nothing left to retry on the next rejoin
        f.watchdog.on_event(&join(A, room(30, &[A, B]))).await;
        advance(DEFAULT_UNMUTE_DELAY).await;
        assert_eq!(f.actuator.unmute_calls().await, 1);
        assert!(f.notifier.announcements_of_kind("unmuted").await.is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn muted_member_still_alone_gets_no_second_cycle() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;

        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;

        assert_eq!(f.watchdog.watch_count().await, 0);
        assert_eq!(f.notifier.prompts_for(MemberId::new(A)).await, 1);
        assert_eq!(f.actuator.mute_calls().await, 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn cancel_then_rearm_fires_once() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY / 2).await;

        f.watchdog.on_event(&join(B, room(10, &[A, B]))).await;
        f.watchdog.on_event(&leave(B, room(10, &[A]))).await;

        // the first timer would have fired here
        advance(LONELY / 2).await;
        assert!(f.notifier.prompts().await.is_empty());

        advance(LONELY / 2 + WAIT).await;
        assert_eq!(f.notifier.prompts_for(MemberId::new(A)).await, 1);
        assert_eq!(f.actuator.mute_calls().await, 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn different_sole_member_rearms_for_them() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        let first = f.watchdog.watch_for(&ChannelKey::new(GROUP, 10)).await.unwrap();

        f.watchdog.on_event(&join(B, room(10, &[A, B]))).await;
        f.watchdog.on_event(&leave(A, room(10, &[B]))).await;

        let second = f.watchdog.watch_for(&ChannelKey::new(GROUP, 10)).await.unwrap();
        assert_eq!(second.member(), MemberId::new(B));
        assert_ne!(first.id(), second.id());
        assert_eq!(f.watchdog.watch_count().await, 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn undeliverable_prompt_abandons_watch() {
        let f = fixture();
        f.notifier.set_failing_prompts(true);

        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(LONELY + WAIT).await;

        assert_eq!(f.watchdog.watch_count().await, 0);
        assert_eq!(f.watchdog.prompt_count().await, 0);
        assert_eq!(f.actuator.mute_calls().await, 0);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn shutdown_stops_pending_timers() {
        let f = fixture();
        f.watchdog.on_event(&join(A, room(10, &[A]))).await;
        f.watchdog.on_event(&join(B, room(20, &[B]))).await;

        f.watchdog.shutdown().await;
        advance(LONELY + WAIT).await;

        assert_eq!(f.watchdog.watch_count().await, 0);
        assert!(f.notifier.prompts().await.is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn group_settings_drive_the_timeout() {
        let notifier = Arc::new(InMemoryNotifier::new());
        let settings = Arc::new(InMemoryGroupSettingsRepository::default());
        settings.update(GroupId::new(GROUP), Some(1), Some(1)).await.unwrap();
        let ports = WatchdogPorts {
            notifier: notifier.clone(),
            actuator: Arc::new(InMemoryMuteActuator::new()),
            settings,
            stats: Arc::new(InMemoryMemberStatsRepository::new()),
            clock: Arc::new(TokioClock::new()),
        };
        let watchdog = IdleWatchdog::new(ports, WatchdogConfig::default());

        watchdog.on_event(&join(A, room(10, &[A]))).await;
        advance(Duration::from_secs(61)).await;

        assert_eq!(notifier.prompts_for(MemberId::new(A)).await, 1);
    }
}
