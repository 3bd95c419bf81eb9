//! Balance and transaction history of the active address.
//!
//! Every address emission starts a new generation; fetch results tagged with
//! an older generation are dropped, so a slow response for a previous address
//! can never overwrite the view of the current one.

use crate::error::AccountErrorKind;
use crate::store::{ConnectionStore, Subscription};
use lk_api_types::{Address, Transaction};
use lk_ledger_client::{LedgerQuery, LedgerQueryError};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// What an account view shows at a given moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub address: Option<Address>,
    pub balance: Option<String>,
    pub transactions: Vec<Transaction>,
    pub loading: bool,
    pub error: Option<AccountErrorKind>,
}

impl AccountSnapshot {
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(AccountErrorKind::message)
    }

    fn disconnected() -> Self {
        Self {
            balance: Some(ZERO_BALANCE.to_owned()),
            ..Self::default()
        }
    }

    fn loading(address: Address) -> Self {
        Self {
            address: Some(address),
            loading: true,
            ..Self::default()
        }
    }
}

const ZERO_BALANCE: &str = "0";

enum Command {
    RetryTransactions,
}

enum Outcome {
    Balance {
        generation: u64,
        result: Result<String, LedgerQueryError>,
    },
    Transactions {
        generation: u64,
        request: u64,
        result: Result<Vec<Transaction>, LedgerQueryError>,
    },
}

/// Handle to one running pipeline. Dropping it stops the pipeline.
pub struct AccountPipeline {
    snapshot: watch::Receiver<AccountSnapshot>,
    commands: mpsc::UnboundedSender<Command>,
    shutdown: watch::Sender<bool>,
}

impl AccountPipeline {
    /// Starts observing the store's active address. Must be called from
    /// within a tokio runtime.
    pub fn spawn(store: &ConnectionStore, ledger: Arc<dyn LedgerQuery>, limit: u32) -> Self {
        let (snapshot_tx, snapshot) = watch::channel(AccountSnapshot::default());
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let worker = Worker {
            ledger,
            limit,
            snapshot_tx,
            state: AccountSnapshot::default(),
            generation: 0,
            request: 0,
            balance_pending: false,
            transactions_pending: false,
        };
        tokio::spawn(worker.run(store.observe_active_address(), commands_rx, shutdown_rx));

        Self {
            snapshot,
            commands,
            shutdown,
        }
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AccountSnapshot> {
        self.snapshot.clone()
    }

    /// Fetches the transaction history of the current address again.
    /// Does nothing while no address is connected.
    pub fn retry(&self) {
        let _ = self.commands.send(Command::RetryTransactions);
    }

    pub fn detach(self) {}
}

impl Drop for AccountPipeline {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

struct Worker {
    ledger: Arc<dyn LedgerQuery>,
    limit: u32,
    snapshot_tx: watch::Sender<AccountSnapshot>,
    state: AccountSnapshot,
    generation: u64,
    request: u64,
    balance_pending: bool,
    transactions_pending: bool,
}

impl Worker {
    async fn run(
        mut self,
        mut addresses: Subscription<Option<Address>>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                next = addresses.next() => match next {
                    Some(address) => self.on_address(address, &done_tx),
                    None => break,
                },
                Some(Command::RetryTransactions) = commands.recv() => self.on_retry(&done_tx),
                Some(outcome) = done_rx.recv() => self.on_outcome(outcome),
            }
        }
        debug!("account pipeline stopped");
    }

    fn on_address(&mut self, address: Option<Address>, done: &mpsc::UnboundedSender<Outcome>) {
        self.generation += 1;
        match address {
            Some(address) => {
                debug!(%address, generation = self.generation, "loading account");
                self.state = AccountSnapshot::loading(address.clone());
                self.balance_pending = true;
                self.fetch_balance(address.clone(), done);
                self.fetch_transactions(address, done);
            }
            None => {
                self.state = AccountSnapshot::disconnected();
                self.balance_pending = false;
                self.transactions_pending = false;
            }
        }
        self.publish();
    }

    fn on_retry(&mut self, done: &mpsc::UnboundedSender<Outcome>) {
        let Some(address) = self.state.address.clone() else {
            return;
        };
        self.state.error = None;
        self.fetch_transactions(address, done);
        self.publish();
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Balance { generation, result } => {
                if generation != self.generation {
                    return;
                }
                self.balance_pending = false;
                self.state.balance = Some(match result {
                    Ok(balance) => balance,
                    Err(err) => {
                        warn!("balance fetch failed, showing zero: {}", err);
                        ZERO_BALANCE.to_owned()
                    }
                });
            }
            Outcome::Transactions {
                generation,
                request,
                result,
            } => {
                if generation != self.generation || request != self.request {
                    return;
                }
                self.transactions_pending = false;
                match result {
                    Ok(transactions) => {
                        self.state.transactions = transactions;
                        self.state.error = None;
                    }
                    Err(err) => {
                        warn!("transaction fetch failed: {}", err);
                        self.state.transactions = Vec::new();
                        self.state.error = Some(AccountErrorKind::from(&err));
                    }
                }
            }
        }
        self.publish();
    }

    fn fetch_balance(&self, address: Address, done: &mpsc::UnboundedSender<Outcome>) {
        let ledger = self.ledger.clone();
        let done = done.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = ledger.get_native_balance(&address).await;
            let _ = done.send(Outcome::Balance { generation, result });
        });
    }

    fn fetch_transactions(&mut self, address: Address, done: &mpsc::UnboundedSender<Outcome>) {
        self.request += 1;
        self.transactions_pending = true;

        let ledger = self.ledger.clone();
        let done = done.clone();
        let generation = self.generation;
        let request = self.request;
        let limit = self.limit;
        tokio::spawn(async move {
            let result = ledger.get_recent_transactions(&address, limit).await;
            let _ = done.send(Outcome::Transactions {
                generation,
                request,
                result,
            });
        });
    }

    fn publish(&mut self) {
        self.state.loading = self.balance_pending || self.transactions_pending;
        self.snapshot_tx.send_replace(self.state.clone());
    }
}
