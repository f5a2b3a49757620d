use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{GritError, GritResult};
use crate::goal::request::parse_calendar_date;
use crate::goal::{GoalRecord, GoalRequest, GoalView};
use crate::session::{ActionReceipt, GoalSession};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<GoalSession>,
    pub date_format: Arc<str>,
}

impl AppState {
    pub fn new(session: Arc<GoalSession>, date_format: &str) -> Self {
        Self {
            session,
            date_format: Arc::from(date_format),
        }
    }

    fn views(&self, goals: &[GoalRecord]) -> Vec<GoalView> {
        GoalView::from_records(goals, self.session.now(), &self.date_format)
    }

    fn action_response(&self, receipt: ActionReceipt) -> ActionResponse {
        ActionResponse {
            tx_hash: receipt.confirmation.tx_hash,
            block_number: receipt.confirmation.block_number,
            fee_paid: receipt.fee_paid,
            goals: self.views(&receipt.goals),
            refresh_error: receipt.refresh_error,
        }
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub chain_id: Option<String>,
    pub expected_chain_id: String,
    pub network_ok: bool,
    pub sending: bool,
}

#[derive(Serialize)]
pub struct AccountStatus {
    pub account: Option<Address>,
    pub sending: bool,
}

#[derive(Serialize)]
pub struct ActionResponse {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub fee_paid: Option<U256>,
    pub goals: Vec<GoalView>,
    /// Set when `goals` could not be re-read after the transaction.
    pub refresh_error: Option<String>,
}

/// Due date as a calendar day or a Unix timestamp.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DueInput {
    Timestamp(u64),
    Calendar(String),
}

#[derive(Debug, Deserialize)]
pub struct MintBody {
    pub name: String,
    pub description: String,
    pub due_date: DueInput,
}

impl MintBody {
    fn into_request(self) -> GritResult<GoalRequest> {
        let due_date = match self.due_date {
            DueInput::Timestamp(secs) => secs,
            DueInput::Calendar(day) => parse_calendar_date(&day)?,
        };
        GoalRequest::new(self.name, self.description, due_date)
    }
}

pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    let expected = state.session.settings().expected_chain;
    let sending = state.session.is_sending();

    let (status_code, status, chain_id, network_ok) = match state.session.check_network().await {
        Ok(actual) => (StatusCode::OK, "operational", Some(actual), true),
        Err(GritError::WrongNetwork { actual, .. }) => {
            (StatusCode::OK, "wrong_network", Some(actual), false)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the chain");
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable", None, false)
        }
    };

    (
        status_code,
        Json(HealthStatus {
            version: env!("CARGO_PKG_VERSION"),
            status,
            chain_id: chain_id.map(|c| c.to_string()),
            expected_chain_id: expected.to_string(),
            network_ok,
            sending,
        }),
    )
}

pub async fn get_account(State(state): State<AppState>) -> Json<AccountStatus> {
    Json(AccountStatus {
        account: state.session.account(),
        sending: state.session.is_sending(),
    })
}

pub async fn connect_wallet(State(state): State<AppState>) -> GritResult<Json<AccountStatus>> {
    let account = state.session.connect_wallet().await?;
    Ok(Json(AccountStatus {
        account: Some(account),
        sending: state.session.is_sending(),
    }))
}

pub async fn list_goals(State(state): State<AppState>) -> Json<Vec<GoalView>> {
    let goals = state.session.goals();
    Json(state.views(&goals))
}

pub async fn refresh_goals(State(state): State<AppState>) -> GritResult<Json<Vec<GoalView>>> {
    let goals = state.session.refresh().await?;
    Ok(Json(state.views(&goals)))
}

pub async fn mint_goal(
    State(state): State<AppState>,
    body: Result<Json<MintBody>, JsonRejection>,
) -> GritResult<(StatusCode, Json<ActionResponse>)> {
    let Json(body) = body.map_err(|e| GritError::InvalidRequest(e.body_text()))?;
    let request = body.into_request()?;
    let receipt = state.session.mint(request).await?;
    Ok((StatusCode::CREATED, Json(state.action_response(receipt))))
}

pub async fn achieve_goal(
    State(state): State<AppState>,
    token_id: Result<Path<u64>, PathRejection>,
) -> GritResult<Json<ActionResponse>> {
    let Path(token_id) = token_id.map_err(|e| GritError::InvalidRequest(e.body_text()))?;
    let receipt = state.session.achieve(token_id).await?;
    Ok(Json(state.action_response(receipt)))
}
