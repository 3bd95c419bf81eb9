//! Fakes shared by the unit tests of this crate.

use async_trait::async_trait;
use crate::wallets::{WalletDescriptor, WalletKind, WalletModule};
use lk_api_types::{Address, SupportedWallet, Transaction, WalletId};
use lk_ledger_client::{LedgerQuery, LedgerQueryError};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use tokio::sync::oneshot;

type Reply<T> = oneshot::Receiver<Result<T, LedgerQueryError>>;

/// Ledger whose answers are queued per address ahead of time.
///
/// Each call consumes the next queued reply for its address; a gated reply
/// stays pending until the test sends on the returned sender. Calls with
/// nothing queued fail with `Unexpected`.
#[derive(Default)]
pub struct ScriptedLedger {
    balances: Mutex<HashMap<String, VecDeque<Reply<String>>>>,
    transactions: Mutex<HashMap<String, VecDeque<Reply<Vec<Transaction>>>>>,
    calls: AtomicUsize,
    last_limit: AtomicU32,
}

impl ScriptedLedger {
    pub fn gate_balance(&self, address: &str) -> oneshot::Sender<Result<String, LedgerQueryError>> {
        enqueue(&self.balances, address)
    }

    pub fn gate_transactions(
        &self,
        address: &str,
    ) -> oneshot::Sender<Result<Vec<Transaction>, LedgerQueryError>> {
        enqueue(&self.transactions, address)
    }

    pub fn respond_balance(&self, address: &str, result: Result<String, LedgerQueryError>) {
        let _ = self.gate_balance(address).send(result);
    }

    pub fn respond_transactions(&self, address: &str, result: Result<Vec<Transaction>, LedgerQueryError>) {
        let _ = self.gate_transactions(address).send(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_limit(&self) -> Option<u32> {
        match self.last_limit.load(Ordering::SeqCst) {
            0 => None,
            limit => Some(limit),
        }
    }
}

fn enqueue<T>(
    queues: &Mutex<HashMap<String, VecDeque<Reply<T>>>>,
    address: &str,
) -> oneshot::Sender<Result<T, LedgerQueryError>> {
    let (tx, rx) = oneshot::channel();
    queues
        .lock()
        .expect("script lock")
        .entry(address.to_owned())
        .or_default()
        .push_back(rx);
    tx
}

async fn answer<T>(
    queues: &Mutex<HashMap<String, VecDeque<Reply<T>>>>,
    address: &Address,
) -> Result<T, LedgerQueryError> {
    let next = queues
        .lock()
        .expect("script lock")
        .get_mut(address.as_str())
        .and_then(VecDeque::pop_front);
    match next {
        Some(reply) => reply
            .await
            .unwrap_or_else(|_| Err(LedgerQueryError::Unexpected("reply dropped".into()))),
        None => Err(LedgerQueryError::Unexpected(format!("no scripted reply for {address}"))),
    }
}

#[async_trait]
impl LedgerQuery for ScriptedLedger {
    async fn get_native_balance(&self, address: &Address) -> Result<String, LedgerQueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.balances, address).await
    }

    async fn get_recent_transactions(
        &self,
        address: &Address,
        limit: u32,
    ) -> Result<Vec<Transaction>, LedgerQueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        answer(&self.transactions, address).await
    }
}

pub fn transaction(id: &str) -> Transaction {
    Transaction {
        id: id.to_owned(),
        hash: format!("{id}-hash"),
        ledger: 1,
        created_at: "2024-05-01T10:00:00Z".to_owned(),
        source_account: "GSOURCE".to_owned(),
        fee_charged: "100".to_owned(),
        operation_count: 1,
        successful: true,
        memo: None,
    }
}

/// Wallet module with a fixed availability and connect answer.
pub struct FakeWallet {
    descriptor: WalletDescriptor,
    available: bool,
    answer: Result<Address, String>,
    connects: AtomicUsize,
}

impl FakeWallet {
    pub fn new(kind: WalletKind, available: bool) -> Self {
        Self {
            descriptor: WalletDescriptor::for_kind(kind),
            available,
            answer: Ok(Address::from("GFAKEWALLETACCOUNT")),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn platform_wrapper(mut self) -> Self {
        self.descriptor.is_platform_wrapper = true;
        self
    }

    pub fn connecting_as(mut self, address: &str) -> Self {
        self.answer = Ok(Address::from(address));
        self
    }

    pub fn refusing(mut self, reason: &str) -> Self {
        self.answer = Err(reason.to_owned());
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletModule for FakeWallet {
    fn descriptor(&self) -> &WalletDescriptor {
        &self.descriptor
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn connect(&self) -> anyhow::Result<Address> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(anyhow::Error::msg)
    }
}

pub fn wallet(id: &str, available: bool) -> SupportedWallet {
    SupportedWallet {
        id: WalletId::from(id),
        name: id.to_owned(),
        icon: String::new(),
        url: format!("https://{id}.example"),
        is_available: available,
        is_platform_wrapper: false,
    }
}
