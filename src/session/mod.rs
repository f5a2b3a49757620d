//! Goal session: sequences wallet and contract calls for user actions.
//!
//! # Data Flow
//! ```text
//! user action (CLI / HTTP)
//!     → guard.rs (refuse if another action is in flight)
//!     → network check → contract call → wait for confirmation
//!     → refresh: getTokenIds → getMetadatas → decode
//!     → snapshot.rs (replace the goal collection in one swap)
//! ```
//!
//! # Design Decisions
//! - Failures are returned, never retried; the snapshot is left untouched
//! - Once a transaction is confirmed the action succeeds; a failed re-read
//!   is carried on the receipt instead
//! - A malformed record aborts the whole refresh
//! - Expiry (and so the achievement fee) is judged by the local clock

pub mod guard;
pub mod snapshot;

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::Instrument;

use crate::blockchain::contract::GoalContract;
use crate::blockchain::provider::WalletProvider;
use crate::blockchain::types::{ChainId, Confirmation};
use crate::config::{ConfigError, GritConfig};
use crate::error::{GritError, GritResult};
use crate::goal::{decode_token_id, DecodeError, GoalRecord, GoalRequest, TimeSource};
use crate::observability::{analytics, metrics};

pub use guard::{ActionGuard, ActionPermit};
pub use snapshot::ViewState;

/// Network and fee policy for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub expected_chain: ChainId,
    /// Refuse transactions on another chain instead of only warning.
    pub enforce_network: bool,
    /// Wei paid when achieving an expired goal.
    pub achievement_fee: U256,
}

impl SessionSettings {
    pub fn from_config(config: &GritConfig) -> Result<Self, ConfigError> {
        let achievement_fee = config
            .contract
            .achievement_fee()
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        Ok(Self {
            expected_chain: ChainId(config.blockchain.chain_id),
            enforce_network: config.blockchain.enforce_chain_id,
            achievement_fee,
        })
    }
}

/// Outcome of a mutating action: the confirmed transaction and the goals
/// as re-read afterwards.
///
/// The transaction is final even when the follow-up read fails; `goals` is
/// then the previous snapshot and `refresh_error` says why.
#[derive(Debug, Clone)]
pub struct ActionReceipt {
    pub confirmation: Confirmation,
    pub goals: Arc<Vec<GoalRecord>>,
    /// Fee sent with the transaction, if any.
    pub fee_paid: Option<U256>,
    pub refresh_error: Option<String>,
}

impl ActionReceipt {
    /// True when `goals` predates the confirmed transaction.
    pub fn is_stale(&self) -> bool {
        self.refresh_error.is_some()
    }
}

pub struct GoalSession {
    wallet: Arc<dyn WalletProvider>,
    contract: Arc<dyn GoalContract>,
    clock: Arc<dyn TimeSource>,
    settings: SessionSettings,
    guard: ActionGuard,
    state: ViewState,
}

impl GoalSession {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        contract: Arc<dyn GoalContract>,
        clock: Arc<dyn TimeSource>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            wallet,
            contract,
            clock,
            settings,
            guard: ActionGuard::new(),
            state: ViewState::new(),
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.state.account()
    }

    pub fn goals(&self) -> Arc<Vec<GoalRecord>> {
        self.state.goals()
    }

    /// True while an action holds the guard.
    pub fn is_sending(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Look up an already authorized account (`eth_accounts`).
    ///
    /// A missing wallet is not an error here: the session simply stays
    /// disconnected.
    pub async fn check_if_wallet_is_connected(&self) -> GritResult<Option<Address>> {
        let accounts = match self.wallet.accounts().await {
            Ok(accounts) => accounts,
            Err(GritError::WalletUnavailable(reason)) => {
                tracing::warn!(%reason, "No wallet available; install or configure one");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match accounts.first().copied() {
            Some(account) => {
                tracing::info!(%account, "Found an authorized account");
                self.state.set_account(Some(account));
                Ok(Some(account))
            }
            None => {
                tracing::info!("No authorized account found");
                Ok(None)
            }
        }
    }

    /// Compare the wallet's chain with the expected one.
    pub async fn check_network(&self) -> GritResult<ChainId> {
        let actual = self.wallet.chain_id().await?;
        tracing::info!(chain_id = %actual, "Connected to chain");
        if actual != self.settings.expected_chain {
            tracing::warn!(
                expected = %self.settings.expected_chain,
                actual = %actual,
                "Not connected to the expected network"
            );
            return Err(GritError::WrongNetwork {
                expected: self.settings.expected_chain,
                actual,
            });
        }
        Ok(actual)
    }

    /// Request account authorization, then load the account's goals.
    pub async fn connect_wallet(&self) -> GritResult<Address> {
        self.run_action("connect", || async {
            let requested = self.wallet.request_accounts().await?;
            tracing::info!(account = ?requested.first(), "Account requested");

            let account = self
                .check_if_wallet_is_connected()
                .await?
                .ok_or(GritError::NotConnected)?;
            self.load_goals(account).await?;
            Ok(account)
        })
        .await
    }

    /// Re-read the connected account's goals.
    pub async fn refresh(&self) -> GritResult<Arc<Vec<GoalRecord>>> {
        self.run_action("refresh", || async {
            let account = self.require_account()?;
            self.load_goals(account).await
        })
        .await
    }

    /// Read every goal owned by `account` and replace the snapshot.
    pub async fn fetch_all(&self, account: Address) -> GritResult<Arc<Vec<GoalRecord>>> {
        self.run_action("refresh", || self.load_goals(account)).await
    }

    /// Mint a goal token and wait for it to be final.
    pub async fn mint(&self, request: GoalRequest) -> GritResult<ActionReceipt> {
        self.run_action("mint", || async {
            let account = self.require_account()?;
            self.ensure_network().await?;

            let pending = GoalRecord::pending(&request);
            tracing::info!(
                name = %pending.name(),
                due_date = pending.due_date(),
                "Start minting goal"
            );

            let tx_hash = self
                .contract
                .make_nft(request.name(), request.description(), request.due_date())
                .await?;
            tracing::info!(%tx_hash, "Mint transaction sent");

            let confirmation = self.contract.wait_for_confirmation(tx_hash).await?;
            tracing::info!(
                %tx_hash,
                block_number = confirmation.block_number,
                "Goal minted"
            );

            let (goals, refresh_error) = self.reload_after_confirmation(account).await;
            Ok(ActionReceipt {
                confirmation,
                goals,
                fee_paid: None,
                refresh_error,
            })
        })
        .await
    }

    /// Mark a goal achieved, paying the fee when it is past due.
    pub async fn achieve(&self, token_id: u64) -> GritResult<ActionReceipt> {
        self.run_action("achieve", || async {
            let account = self.require_account()?;
            let goal = self
                .state
                .find_goal(token_id)
                .ok_or(GritError::GoalNotFound(token_id))?;
            if goal.is_achieved() {
                return Err(GritError::AlreadyAchieved(token_id));
            }
            self.ensure_network().await?;

            // TODO: ask the contract whether the goal is expired instead of
            // trusting the local clock once it exposes that check.
            let fee = goal
                .is_expired_at(self.clock.now())
                .then_some(self.settings.achievement_fee);

            let tx_hash = self.contract.update_nft_of(token_id, fee).await?;
            tracing::info!(%tx_hash, token_id, fee = ?fee, "Achievement transaction sent");

            let confirmation = self.contract.wait_for_confirmation(tx_hash).await?;
            match fee {
                Some(_) => tracing::info!(token_id, "Expired goal achieved"),
                None => tracing::info!(token_id, "Goal achieved"),
            }

            let (goals, refresh_error) = self.reload_after_confirmation(account).await;
            Ok(ActionReceipt {
                confirmation,
                goals,
                fee_paid: fee,
                refresh_error,
            })
        })
        .await
    }

    fn require_account(&self) -> GritResult<Address> {
        self.state.account().ok_or(GritError::NotConnected)
    }

    async fn ensure_network(&self) -> GritResult<()> {
        match self.check_network().await {
            Ok(_) => Ok(()),
            Err(e @ GritError::WrongNetwork { .. }) if !self.settings.enforce_network => {
                tracing::warn!(error = %e, "Continuing on unexpected network");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Re-read goals once a transaction is final. A failed read keeps the
    /// previous snapshot and is reported, not returned as an error.
    async fn reload_after_confirmation(
        &self,
        account: Address,
    ) -> (Arc<Vec<GoalRecord>>, Option<String>) {
        match self.load_goals(account).await {
            Ok(goals) => (goals, None),
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "Transaction confirmed but goal refresh failed");
                metrics::record_action("refresh", e.kind());
                (self.state.goals(), Some(e.to_string()))
            }
        }
    }

    /// `getTokenIds` then `getMetadatas`; all records decode or none are kept.
    async fn load_goals(&self, account: Address) -> GritResult<Arc<Vec<GoalRecord>>> {
        let token_ids = self.contract.get_token_ids(account).await?;
        tracing::debug!(%account, count = token_ids.len(), "Fetched token ids");

        let goals = if token_ids.is_empty() {
            Vec::new()
        } else {
            let metadatas = self.contract.get_metadatas(&token_ids).await?;
            if metadatas.len() != token_ids.len() {
                return Err(GritError::decode(
                    None,
                    DecodeError::LengthMismatch {
                        ids: token_ids.len(),
                        records: metadatas.len(),
                    },
                ));
            }

            token_ids
                .iter()
                .zip(metadatas.iter())
                .map(|(id, raw)| {
                    let token_id = decode_token_id(*id).map_err(|e| GritError::decode(None, e))?;
                    GoalRecord::from_external_response(raw, token_id)
                        .map_err(|e| GritError::decode(Some(token_id), e))
                })
                .collect::<GritResult<Vec<_>>>()?
        };

        metrics::record_goals_loaded(goals.len());
        self.state.replace_goals(goals);
        Ok(self.state.goals())
    }

    async fn run_action<T, F, Fut>(&self, action: &'static str, body: F) -> GritResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GritResult<T>>,
    {
        let permit = match self.guard.try_begin(action) {
            Ok(permit) => permit,
            Err(e) => {
                metrics::record_action(action, e.kind());
                return Err(e);
            }
        };

        let span = tracing::info_span!("action", action, action_id = %permit.id());
        let result = body().instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(_) => {
                tracing::info!(elapsed_ms = permit.elapsed().as_millis() as u64, "Action completed");
                metrics::record_action(action, "ok");
                analytics::log_event(action);
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Action failed");
                metrics::record_action(action, e.kind());
            }
        });

        drop(permit);
        result
    }
}

impl std::fmt::Debug for GoalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalSession")
            .field("account", &self.state.account())
            .field("goals", &self.state.goals().len())
            .field("settings", &self.settings)
            .field("sending", &self.is_sending())
            .finish()
    }
}
