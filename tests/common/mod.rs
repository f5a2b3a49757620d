//! Shared in-memory chain for session and HTTP tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{address, utils::parse_ether, Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::Notify;

use grit_nft::blockchain::{ChainId, Confirmation, GoalContract, WalletProvider};
use grit_nft::error::{GritError, GritResult};
use grit_nft::goal::{FixedTimeSource, RawGoalMetadata, TimeSource, WideInt};
use grit_nft::session::{GoalSession, SessionSettings};

pub const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const GOERLI: ChainId = ChainId(5);
pub const NOW: u64 = 1_700_000_000;
pub const HOUR: u64 = 3_600;

#[derive(Default)]
struct ChainState {
    wallet_installed: bool,
    authorized: bool,
    chain_id: u64,
    goals: Vec<RawGoalMetadata>,
    extra_metadata: usize,
    tokens_transferred: bool,
    reject_next: Option<String>,
    next_tx: u8,
    calls: Vec<&'static str>,
    fees: Vec<Option<U256>>,
}

/// Wallet and GritNFT contract backed by a vector of records.
///
/// Token ids start at 1 and follow mint order.
pub struct MockChain {
    state: Mutex<ChainState>,
    clock: Arc<FixedTimeSource>,
    hold_confirmation: Mutex<bool>,
    confirmation_started: Notify,
    release_confirmation: Notify,
}

impl MockChain {
    pub fn new(clock: Arc<FixedTimeSource>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ChainState {
                wallet_installed: true,
                chain_id: GOERLI.0,
                next_tx: 1,
                ..ChainState::default()
            }),
            clock,
            hold_confirmation: Mutex::new(false),
            confirmation_started: Notify::new(),
            release_confirmation: Notify::new(),
        })
    }

    pub fn uninstall_wallet(&self) {
        self.state.lock().unwrap().wallet_installed = false;
    }

    pub fn authorize(&self) {
        self.state.lock().unwrap().authorized = true;
    }

    pub fn switch_chain(&self, chain_id: u64) {
        self.state.lock().unwrap().chain_id = chain_id;
    }

    /// Seed a goal owned by `OWNER`, returning its token id.
    pub fn seed_goal(&self, name: &str, due_date: u64, achieved_at: u64) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.goals.push(RawGoalMetadata {
            name: Some(name.to_string()),
            description: Some(format!("{} description", name)),
            image_svg: Some(format!("<svg>{}</svg>", name)),
            created_at: Some(WideInt::Unsigned(NOW - HOUR)),
            due_date: Some(WideInt::Unsigned(due_date)),
            achieved_at: Some(WideInt::Unsigned(achieved_at)),
        });
        state.goals.len() as u64
    }

    /// Overwrite a stored record, e.g. with a malformed one.
    pub fn replace_record(&self, token_id: u64, raw: RawGoalMetadata) {
        self.state.lock().unwrap().goals[(token_id - 1) as usize] = raw;
    }

    /// Make `getMetadatas` return more records than ids.
    pub fn pad_metadatas(&self, extra: usize) {
        self.state.lock().unwrap().extra_metadata = extra;
    }

    /// Make `getTokenIds` report that the owner holds no tokens.
    pub fn transfer_all_tokens(&self) {
        self.state.lock().unwrap().tokens_transferred = true;
    }

    pub fn reject_next(&self, reason: &str) {
        self.state.lock().unwrap().reject_next = Some(reason.to_string());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fees(&self) -> Vec<Option<U256>> {
        self.state.lock().unwrap().fees.clone()
    }

    pub fn goal_count(&self) -> usize {
        self.state.lock().unwrap().goals.len()
    }

    /// Park the next confirmation wait until `release` is called.
    pub fn hold_confirmations(&self) {
        *self.hold_confirmation.lock().unwrap() = true;
    }

    pub async fn confirmation_started(&self) {
        self.confirmation_started.notified().await;
    }

    pub fn release(&self) {
        *self.hold_confirmation.lock().unwrap() = false;
        self.release_confirmation.notify_one();
    }

    fn record(&self, call: &'static str) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn send(&self) -> GritResult<TxHash> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.reject_next.take() {
            return Err(GritError::TransactionRejected(reason));
        }
        let hash = TxHash::with_last_byte(state.next_tx);
        state.next_tx += 1;
        Ok(hash)
    }
}

#[async_trait]
impl WalletProvider for MockChain {
    async fn accounts(&self) -> GritResult<Vec<Address>> {
        self.record("eth_accounts");
        let state = self.state.lock().unwrap();
        if !state.wallet_installed {
            return Err(GritError::WalletUnavailable("no wallet installed".into()));
        }
        Ok(if state.authorized { vec![OWNER] } else { Vec::new() })
    }

    async fn request_accounts(&self) -> GritResult<Vec<Address>> {
        self.record("eth_requestAccounts");
        let mut state = self.state.lock().unwrap();
        if !state.wallet_installed {
            return Err(GritError::WalletUnavailable("no wallet installed".into()));
        }
        state.authorized = true;
        Ok(vec![OWNER])
    }

    async fn chain_id(&self) -> GritResult<ChainId> {
        self.record("eth_chainId");
        Ok(ChainId(self.state.lock().unwrap().chain_id))
    }
}

#[async_trait]
impl GoalContract for MockChain {
    async fn make_nft(&self, name: &str, description: &str, due_date: u64) -> GritResult<TxHash> {
        self.record("makeNFT");
        let hash = self.send()?;
        let now = self.clock.now();
        self.state.lock().unwrap().goals.push(RawGoalMetadata {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            image_svg: Some(format!("<svg>{}</svg>", name)),
            created_at: Some(WideInt::Unsigned(now)),
            due_date: Some(WideInt::Unsigned(due_date)),
            achieved_at: Some(WideInt::Unsigned(0)),
        });
        Ok(hash)
    }

    async fn get_token_ids(&self, owner: Address) -> GritResult<Vec<U256>> {
        self.record("getTokenIds");
        let state = self.state.lock().unwrap();
        if owner != OWNER || state.tokens_transferred {
            return Ok(Vec::new());
        }
        let count = state.goals.len() as u64;
        Ok((1..=count).map(U256::from).collect())
    }

    async fn get_metadatas(&self, token_ids: &[U256]) -> GritResult<Vec<RawGoalMetadata>> {
        self.record("getMetadatas");
        let state = self.state.lock().unwrap();
        let mut records = Vec::with_capacity(token_ids.len());
        for id in token_ids {
            let index = u64::try_from(*id)
                .ok()
                .and_then(|id| id.checked_sub(1))
                .ok_or_else(|| GritError::Rpc(format!("bad token id {}", id)))?;
            let raw = state
                .goals
                .get(index as usize)
                .cloned()
                .ok_or_else(|| GritError::Rpc(format!("token {} does not exist", id)))?;
            records.push(raw);
        }
        for _ in 0..state.extra_metadata {
            records.push(RawGoalMetadata::default());
        }
        Ok(records)
    }

    async fn update_nft_of(&self, token_id: u64, fee: Option<U256>) -> GritResult<TxHash> {
        self.record("updateNFTOf");
        let now = self.clock.now();
        {
            let state = self.state.lock().unwrap();
            let raw = state
                .goals
                .get((token_id - 1) as usize)
                .ok_or_else(|| GritError::TransactionRejected("unknown token".into()))?;
            let due = raw.due_date.as_ref().and_then(|d| d.to_u64("dueDate").ok());
            if due.is_some_and(|due| due < now) && fee.is_none() {
                return Err(GritError::TransactionRejected(
                    "execution reverted: fee required".into(),
                ));
            }
        }

        let hash = self.send()?;
        let mut state = self.state.lock().unwrap();
        state.fees.push(fee);
        state.goals[(token_id - 1) as usize].achieved_at = Some(WideInt::Unsigned(now));
        Ok(hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> GritResult<Confirmation> {
        self.record("waitForConfirmation");
        let hold = *self.hold_confirmation.lock().unwrap();
        if hold {
            self.confirmation_started.notify_one();
            tokio::time::timeout(Duration::from_secs(5), self.release_confirmation.notified())
                .await
                .map_err(|_| GritError::ConfirmationTimeout { tx_hash, secs: 5 })?;
        }
        Ok(Confirmation {
            tx_hash,
            block_number: 100,
        })
    }
}

pub fn settings(enforce_network: bool) -> SessionSettings {
    SessionSettings {
        expected_chain: GOERLI,
        enforce_network,
        achievement_fee: parse_ether("0.01").unwrap(),
    }
}

pub struct Harness {
    pub chain: Arc<MockChain>,
    pub clock: Arc<FixedTimeSource>,
    pub session: Arc<GoalSession>,
}

pub fn harness() -> Harness {
    harness_with(settings(true))
}

pub fn harness_with(settings: SessionSettings) -> Harness {
    let clock = Arc::new(FixedTimeSource::new(NOW));
    let chain = MockChain::new(clock.clone());
    let session = Arc::new(GoalSession::new(
        chain.clone(),
        chain.clone(),
        clock.clone(),
        settings,
    ));
    Harness {
        chain,
        clock,
        session,
    }
}
