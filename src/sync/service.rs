use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::api::{ApiScope, NotificationApi, NotificationQuery};
use crate::channel::{ChannelEvent, PushChannel};
use crate::error::Result;
use crate::notification::{
    notification_filter, FilteredPage, InboxFilter, InboxSnapshot, Notification,
    NotificationStatus, NotificationStore,
};
use crate::principal::Principal;

const INITIAL_PAGE_SIZE: u32 = 50;

/// Everything a reader can observe, guarded by one short-lived lock.
struct SyncState {
    store: NotificationStore,
    /// Server-wide unread total. The store only holds the loaded page, so
    /// this is seeded from the count endpoint rather than derived locally.
    unread_total: u64,
    last_error: Option<String>,
}

impl SyncState {
    fn shift_unread(&mut self, from: NotificationStatus, to: NotificationStatus) {
        match (
            from == NotificationStatus::Unread,
            to == NotificationStatus::Unread,
        ) {
            (false, true) => self.unread_total += 1,
            (true, false) => self.unread_total = self.unread_total.saturating_sub(1),
            _ => {}
        }
    }
}

/// Lifecycle owner and the only entry point the rendering layer uses.
///
/// `start` spawns the event task (initial REST load, topic joins, inbound
/// application); `stop` tears it down and invalidates any in-flight load so
/// a late response cannot touch the store. Mutations apply optimistically,
/// then issue the REST call, and revert on failure.
pub struct NotificationSync {
    api: Arc<dyn NotificationApi>,
    channel: PushChannel,
    principal: Principal,
    state: Arc<Mutex<SyncState>>,
    /// Bumped on every start/stop; async completions compare their captured
    /// value against it before touching the state.
    epoch: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationSync {
    pub fn new(api: Arc<dyn NotificationApi>, channel: PushChannel, principal: Principal) -> Self {
        Self {
            api,
            channel,
            principal,
            state: Arc::new(Mutex::new(SyncState {
                store: NotificationStore::new(),
                unread_total: 0,
                last_error: None,
            })),
            epoch: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    fn scope(&self) -> ApiScope {
        scope_for(self.principal)
    }

    /// Activate the facade. A second call while active is a no-op.
    pub fn start(&self) {
        let mut slot = self.task.lock().unwrap();
        if slot.is_some() {
            return;
        }
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let worker = SyncWorker {
            api: Arc::clone(&self.api),
            channel: self.channel.clone(),
            principal: self.principal,
            state: Arc::clone(&self.state),
            epochs: Arc::clone(&self.epoch),
            epoch,
        };
        *slot = Some(tokio::spawn(worker.run()));
    }

    /// Deactivate: detach from the channel, drop the event task and leave
    /// the joined topics. Idempotent; also runs on drop.
    pub fn stop(&self) {
        let mut slot = self.task.lock().unwrap();
        let Some(task) = slot.take() else { return };
        self.epoch.fetch_add(1, Ordering::SeqCst);
        task.abort();
        for topic in self.principal.topics() {
            self.channel.leave(&topic);
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.lock().unwrap().is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Live store snapshot, newest first.
    pub fn inbox(&self) -> InboxSnapshot {
        self.state.lock().unwrap().store.snapshot()
    }

    /// The live snapshot with client-side filters applied.
    pub fn filtered(&self, filter: &InboxFilter) -> FilteredPage {
        let snapshot = self.inbox();
        notification_filter::apply(&snapshot.items, filter)
    }

    pub fn unread_count(&self) -> u64 {
        self.state.lock().unwrap().unread_total
    }

    /// Last REST load failure, if the most recent load failed. The store
    /// keeps its previous content in that case.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().last_error.clone()
    }

    pub async fn mark_read(&self, id: i64) -> Result<()> {
        self.set_status(id, NotificationStatus::Read).await
    }

    pub async fn mark_unread(&self, id: i64) -> Result<()> {
        self.set_status(id, NotificationStatus::Unread).await
    }

    pub async fn mark_deleted(&self, id: i64) -> Result<()> {
        self.set_status(id, NotificationStatus::Deleted).await
    }

    /// Bulk read-marking. Uncached ids are forwarded to the server anyway;
    /// they may live on a page the store never held.
    pub async fn mark_many_read(&self, ids: &[i64]) -> Result<()> {
        let applied: Vec<Notification> = {
            let mut state = self.state.lock().unwrap();
            ids.iter()
                .filter_map(|id| {
                    let previous = state
                        .store
                        .apply_status_change(*id, NotificationStatus::Read)?;
                    state.shift_unread(previous.status, NotificationStatus::Read);
                    Some(previous)
                })
                .collect()
        };

        match self
            .api
            .update_status_bulk(ids, NotificationStatus::Read)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                let mut state = self.state.lock().unwrap();
                for previous in applied {
                    state.shift_unread(NotificationStatus::Read, previous.status);
                    state.store.revert(previous);
                }
                Err(e)
            }
        }
    }

    async fn set_status(&self, id: i64, status: NotificationStatus) -> Result<()> {
        let previous = {
            let mut state = self.state.lock().unwrap();
            let previous = state.store.apply_status_change(id, status);
            if let Some(p) = &previous {
                state.shift_unread(p.status, status);
            }
            previous
        };

        match self.api.update_status(id, status).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Some(previous) = previous {
                    let mut state = self.state.lock().unwrap();
                    state.shift_unread(status, previous.status);
                    state.store.revert(previous);
                }
                Err(e)
            }
        }
    }

    /// Discard the current snapshot and repeat the initial load. Useful
    /// after bulk operations to force convergence with the server.
    pub async fn refetch(&self) -> Result<()> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        load_inbox(
            self.api.as_ref(),
            self.principal,
            &self.state,
            &self.epoch,
            epoch,
        )
        .await
    }

    /// Server-backed search, independent of the long-lived store: server
    /// filters go out as query parameters, the free-text term is applied
    /// locally over the returned page, and nothing is merged into the store.
    pub async fn search_page(&self, query: &NotificationQuery) -> Result<Vec<Notification>> {
        let mut items = self.api.list(self.scope(), query).await?;
        if let Some(term) = query.search.as_deref() {
            let needle = term.to_lowercase();
            items.retain(|n| {
                n.title.to_lowercase().contains(&needle)
                    || n.message.to_lowercase().contains(&needle)
            });
        }
        Ok(items)
    }
}

impl Drop for NotificationSync {
    fn drop(&mut self) {
        self.stop();
    }
}

fn scope_for(principal: Principal) -> ApiScope {
    if principal.role.is_elevated() {
        ApiScope::Admin
    } else {
        ApiScope::Own
    }
}

/// Fetch the role-scoped first page and unread total, then apply both under
/// the lock. The epoch is re-checked after the awaits: a completion that
/// outlived its activation must not touch the state.
async fn load_inbox(
    api: &dyn NotificationApi,
    principal: Principal,
    state: &Mutex<SyncState>,
    epochs: &AtomicU64,
    epoch: u64,
) -> Result<()> {
    let scope = scope_for(principal);
    let query = NotificationQuery {
        page: Some(1),
        page_size: Some(INITIAL_PAGE_SIZE),
        ..Default::default()
    };
    let fetched = async {
        let items = api.list(scope, &query).await?;
        let count = api.unread_count(scope).await?;
        Ok::<_, crate::error::SyncError>((items, count))
    }
    .await;

    if epochs.load(Ordering::SeqCst) != epoch {
        tracing::debug!("discarding stale inbox load for user {}", principal.user_id);
        return Ok(());
    }

    let mut state = state.lock().unwrap();
    match fetched {
        Ok((items, count)) => {
            state.store.load_snapshot(items);
            state.unread_total = count;
            state.last_error = None;
            Ok(())
        }
        Err(e) => {
            state.last_error = Some(e.to_string());
            Err(e)
        }
    }
}

/// The spawned event task: performs the initial load, keeps topic joins in
/// step with the connection state and applies inbound pushes to the store.
struct SyncWorker {
    api: Arc<dyn NotificationApi>,
    channel: PushChannel,
    principal: Principal,
    state: Arc<Mutex<SyncState>>,
    epochs: Arc<AtomicU64>,
    epoch: u64,
}

impl SyncWorker {
    async fn run(self) {
        // Subscribe before the initial load so a push racing the REST read
        // is buffered rather than lost.
        let mut events = BroadcastStream::new(self.channel.subscribe());

        if self.channel.is_connected() {
            self.join_topics();
        }
        if let Err(e) = self.load().await {
            tracing::warn!("initial inbox load failed: {}", e);
        }

        while let Some(event) = events.next().await {
            match event {
                Ok(ChannelEvent::Connected(true)) => self.join_topics(),
                Ok(ChannelEvent::Connected(false)) => {}
                Ok(ChannelEvent::Notification(n)) => self.apply_inbound(n),
                Err(BroadcastStreamRecvError::Lagged(missed)) => {
                    tracing::warn!("push channel lagged by {} events, refetching", missed);
                    if let Err(e) = self.load().await {
                        tracing::warn!("inbox refetch after lag failed: {}", e);
                    }
                }
            }
        }
    }

    fn join_topics(&self) {
        for topic in self.principal.topics() {
            self.channel.join(&topic);
        }
    }

    fn apply_inbound(&self, n: Notification) {
        let id = n.id;
        let unread = n.status == NotificationStatus::Unread;
        let mut state = self.state.lock().unwrap();
        if state.store.apply_inbound(n) {
            if unread {
                state.unread_total += 1;
            }
            tracing::debug!("applied inbound notification {}", id);
        }
    }

    async fn load(&self) -> Result<()> {
        load_inbox(
            self.api.as_ref(),
            self.principal,
            &self.state,
            &self.epochs,
            self.epoch,
        )
        .await
    }
}
