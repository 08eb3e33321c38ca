//! Coin collection store.
//!
//! Owns the tracked-coin list for one session together with its search and
//! pagination state, the shared loading/error flags and a queue of transient
//! notifications. All create/delete traffic goes through the store so the
//! local list stays in step with the backend without full refetches.
//!
//! Every operation is split into a begin step, the gateway call, and a finish
//! step. The synchronous methods run the three back to back; the async
//! wrapper runs the gateway call off-lock. Fetch results carry a
//! [`FetchTicket`] so a slow, earlier-issued fetch can never overwrite the
//! result of a later one.

use std::sync::Arc;

use log::{debug, error, info};

use crate::config;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{Coin, NewCoin};
use crate::notification::Notification;

/// Issue order of a `list_coins` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Tracked coins for one application session.
pub struct CoinStore<G> {
    gateway: Arc<G>,
    coins: Vec<Coin>,
    in_flight: usize,
    error: Option<String>,
    selected_coin: Option<String>,
    search_query: String,
    current_page: usize,
    page_size: usize,
    notifications: Vec<Notification>,
    fetches_issued: u64,
    fetch_applied: u64,
}

impl<G: Gateway> CoinStore<G> {
    /// Create an empty store. A `page_size` of zero is raised to one.
    pub fn new(gateway: Arc<G>, page_size: usize) -> Self {
        Self {
            gateway,
            coins: Vec::new(),
            in_flight: 0,
            error: None,
            selected_coin: None,
            search_query: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
            notifications: Vec::new(),
            fetches_issued: 0,
            fetch_applied: 0,
        }
    }

    /// Create an empty store with the default page size.
    pub fn with_gateway(gateway: G) -> Self {
        Self::new(Arc::new(gateway), config::DEFAULT_PAGE_SIZE)
    }

    // -- Operations ----------------------------------------------------------

    /// Reload the whole collection from the backend.
    ///
    /// On failure the previous collection is kept and the error is recorded
    /// on the store rather than returned.
    pub fn fetch_all(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.gateway.list_coins();
        self.finish_fetch(ticket, result);
    }

    /// Create a coin and put the returned record at the front of the list.
    pub fn add_new(&mut self, draft: &NewCoin) -> Result<Coin> {
        self.begin();
        let result = self.gateway.create_coin(draft);
        self.finish_add(result)
    }

    /// Delete a coin and drop it from the local list.
    pub fn remove_coin(&mut self, id: i64) -> Result<Coin> {
        self.begin();
        let result = self.gateway.delete_coin(id);
        self.finish_remove(id, result)
    }

    /// Change the name/symbol search and go back to the first page.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.current_page = 1;
    }

    /// Move to `page`, clamped to the pages that currently exist.
    ///
    /// Returns the page actually selected.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.last_page());
        self.current_page
    }

    pub fn set_selected_coin(&mut self, coingecko_id: Option<String>) {
        self.selected_coin = coingecko_id;
    }

    // -- Phases --------------------------------------------------------------

    pub(crate) fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    fn end(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn begin_fetch(&mut self) -> FetchTicket {
        self.begin();
        self.fetches_issued += 1;
        FetchTicket(self.fetches_issued)
    }

    /// Apply a `list_coins` outcome. Returns whether it changed the store.
    pub(crate) fn finish_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Coin>>) -> bool {
        self.end();

        if ticket.0 <= self.fetch_applied {
            debug!(
                "Discarding coin list from fetch #{} (fetch #{} already applied)",
                ticket.0, self.fetch_applied
            );
            return false;
        }

        match result {
            Ok(coins) => {
                debug!("Loaded {} coins (fetch #{})", coins.len(), ticket.0);
                self.coins = coins;
                self.fetch_applied = ticket.0;
                self.clamp_page();
                true
            }
            Err(e) => {
                error!("Error fetching coins: {}", e);
                self.fetch_applied = ticket.0;
                self.fail(config::LOAD_COINS_FAILED.to_string());
                true
            }
        }
    }

    pub(crate) fn finish_add(&mut self, result: Result<Coin>) -> Result<Coin> {
        self.end();

        match result {
            Ok(coin) => {
                info!("Added coin {} ({})", coin.name, coin.coingecko_id);
                self.notify(Notification::success(format!(
                    "Added {} successfully!",
                    coin.name
                )));
                self.coins.insert(0, coin.clone());
                Ok(coin)
            }
            Err(e) => {
                error!("Error adding coin: {}", e);
                self.fail(e.detail().unwrap_or(config::ADD_COIN_FAILED).to_string());
                Err(e)
            }
        }
    }

    pub(crate) fn finish_remove(&mut self, id: i64, result: Result<Coin>) -> Result<Coin> {
        self.end();

        match result {
            Ok(deleted) => {
                let message = match self.coins.iter().position(|c| c.id == id) {
                    Some(idx) => {
                        let coin = self.coins.remove(idx);
                        format!("Removed {} successfully!", coin.name)
                    }
                    None => "Coin removed successfully!".to_string(),
                };
                info!("Removed coin #{}", id);
                self.notify(Notification::success(message));
                self.clamp_page();
                Ok(deleted)
            }
            Err(e) => {
                error!("Error removing coin #{}: {}", id, e);
                self.fail(e.detail().unwrap_or(config::REMOVE_COIN_FAILED).to_string());
                Err(e)
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.notify(Notification::error(message.clone()));
        self.error = Some(message);
    }

    fn notify(&mut self, notification: Notification) {
        if self.notifications.len() >= config::MAX_PENDING_NOTIFICATIONS {
            let dropped = self.notifications.remove(0);
            debug!("Notification queue full, dropping: {}", dropped);
        }
        self.notifications.push(notification);
    }

    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.last_page());
    }

    // -- Derived views -------------------------------------------------------

    /// Coins whose name or symbol contains the search text (case-insensitive).
    pub fn filtered_coins(&self) -> Vec<&Coin> {
        let needle = self.search_query.to_lowercase();
        self.coins.iter().filter(|c| c.matches(&needle)).collect()
    }

    /// The current page of [`filtered_coins`](Self::filtered_coins).
    pub fn paginated_coins(&self) -> Vec<&Coin> {
        let start = (self.current_page - 1) * self.page_size;
        self.filtered_coins()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_coins().len().div_ceil(self.page_size)
    }

    // -- Accessors -----------------------------------------------------------

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn find(&self, id: i64) -> Option<&Coin> {
        self.coins.iter().find(|c| c.id == id)
    }

    /// True while any operation is waiting on the backend.
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Message from the most recent failed operation, cleared when the next
    /// operation starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_coin(&self) -> Option<&str> {
        self.selected_coin.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Notifications raised since the last drain, oldest first.
    ///
    /// At most [`config::MAX_PENDING_NOTIFICATIONS`] are kept; callers are
    /// expected to drain them as they are shown.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take all pending notifications.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }
}
