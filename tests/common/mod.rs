//! Shared fixtures: a scripted event socket server and in-memory fakes of
//! the platform API and wallet.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use base64::Engine;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

use token_launch_sdk::error::{ChainError, HttpError, SdkError, SdkResult};
use token_launch_sdk::http::wire::{
    AccountQuery, DeployTokenRequest, DepositQuery, DepositRecord, Estimate, EstimateRequest,
    Market, MarketQuery, NetworkInfo, OrderCreated, OrderRequest, PremarketRequest,
    PremarketResponse, ServerStatus, TokenBalanceInfo, TokenListing, TokenMetadataUpload,
    TokenMetadataUrl, Trade, TradeQuery, TransferStatus, WithdrawalCreated, WithdrawalQuery,
    WithdrawalRecord, WithdrawalRequest, WithdrawalUid,
};
use token_launch_sdk::http::PlatformApi;
use token_launch_sdk::wallet::{
    CreateTokenParams, Network, SignInParams, TokenCreation, VestingStatus, WalletCapability,
    WalletConfig,
};

// ─── Event socket server ─────────────────────────────────────────────────────

pub const CREATED: &str =
    r#"{"result":{"event":"TokenCreatedEvent","data":{"tokenAddress":"0xToken"}}}"#;

pub fn deposited(time: u64, hash: &str) -> String {
    format!(
        r#"{{"result":{{"event":"UserDepositedEvent","data":{{"depositTime":{},"depositTxHash":"{}"}}}}}}"#,
        time, hash
    )
}

/// A frame the server sends once the subscription arrives.
pub enum Reply {
    Text(String),
    Ping(Vec<u8>),
    Close(u16, String),
}

/// What the server observed during one connection.
#[derive(Debug, Default)]
pub struct ServerLog {
    /// Request URI of the handshake, including the query.
    pub uri: String,
    pub subscribe: Option<serde_json::Value>,
    pub client_close: Option<(u16, String)>,
    /// Payloads of pongs answered by the client.
    pub pongs: Vec<Vec<u8>>,
}

/// Accept one connection, read the subscription, send `replies`, then read
/// until the client goes away.
pub async fn spawn_event_server(replies: Vec<Reply>) -> (String, JoinHandle<ServerLog>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let uri = Arc::new(Mutex::new(String::new()));
        let uri_slot = Arc::clone(&uri);
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            *uri_slot.lock().unwrap() = req.uri().to_string();
            Ok(resp)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(stream, callback)
            .await
            .unwrap();

        let mut log = ServerLog {
            uri: uri.lock().unwrap().clone(),
            ..Default::default()
        };

        if let Some(Ok(Message::Text(text))) = ws.next().await {
            log.subscribe = serde_json::from_str(text.as_str()).ok();
        }

        for reply in replies {
            let msg = match reply {
                Reply::Text(text) => Message::Text(text.into()),
                Reply::Ping(data) => Message::Ping(data.into()),
                Reply::Close(code, reason) => Message::Close(Some(CloseFrame {
                    code: CloseCode::from(code),
                    reason: reason.into(),
                })),
            };
            if ws.send(msg).await.is_err() {
                break;
            }
        }

        while let Some(msg) = ws.next().await {
            match msg {
                Ok(Message::Close(frame)) => {
                    log.client_close =
                        frame.map(|f| (u16::from(f.code), f.reason.as_str().to_string()));
                    break;
                }
                Ok(Message::Pong(data)) => log.pongs.push(data.to_vec()),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        log
    });

    (format!("ws://{}/", addr), handle)
}

// ─── Solana JSON-RPC fake ────────────────────────────────────────────────────

/// Answers of [`spawn_solana_rpc`].
pub struct RpcScript {
    /// `getSignatureStatuses` entries in order; the last one repeats.
    pub statuses: Vec<Value>,
    /// `isBlockhashValid` answer.
    pub blockhash_valid: bool,
}

/// One `getSignatureStatuses` entry.
pub fn signature_status(confirmations: Option<u64>, level: &str, err: Option<Value>) -> Value {
    let status = match &err {
        Some(e) => json!({ "Err": e }),
        None => json!({ "Ok": null }),
    };
    json!({
        "slot": 42,
        "confirmations": confirmations,
        "status": status,
        "err": err,
        "confirmationStatus": level,
    })
}

fn rpc_context(value: Value) -> Value {
    json!({ "context": { "slot": 42 }, "value": value })
}

fn rpc_result(body: &Value, script: &RpcScript, polls: &AtomicUsize) -> Value {
    match body["method"].as_str().unwrap_or_default() {
        "getLatestBlockhash" => rpc_context(json!({
            "blockhash": DEVNET_GENESIS,
            "lastValidBlockHeight": 1000,
        })),
        "getMinimumBalanceForRentExemption" => json!(1_461_600),
        "getGenesisHash" => json!(DEVNET_GENESIS),
        "sendTransaction" => {
            // Wire format: compact signature count, then the fee payer's signature.
            let encoded = body["params"][0].as_str().unwrap();
            let raw = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .unwrap();
            json!(bs58::encode(&raw[1..65]).into_string())
        }
        "getSignatureStatuses" => {
            let n = polls.fetch_add(1, Ordering::SeqCst);
            let status = script.statuses[n.min(script.statuses.len() - 1)].clone();
            rpc_context(json!([status]))
        }
        "isBlockhashValid" => rpc_context(json!(script.blockhash_valid)),
        _ => Value::Null,
    }
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

async fn serve_rpc_connection(
    mut stream: TcpStream,
    script: Arc<RpcScript>,
    polls: Arc<AtomicUsize>,
    methods: Arc<Mutex<Vec<String>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let head_end = loop {
            if let Some(end) = find_head_end(&buf) {
                break end;
            }
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + length {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let body: Value = serde_json::from_slice(&buf[head_end..head_end + length]).unwrap();
        buf.drain(..head_end + length);
        methods
            .lock()
            .unwrap()
            .push(body["method"].as_str().unwrap_or_default().to_string());

        let reply = json!({
            "jsonrpc": "2.0",
            "id": body["id"],
            "result": rpc_result(&body, &script, &polls),
        })
        .to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
            reply.len(),
            reply
        );
        if stream.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Serve a scripted Solana JSON-RPC node. Returns its URL and the methods
/// called, in order.
pub async fn spawn_solana_rpc(script: RpcScript) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let methods = Arc::new(Mutex::new(Vec::new()));
    let script = Arc::new(script);
    let polls = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&methods);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve_rpc_connection(
                stream,
                Arc::clone(&script),
                Arc::clone(&polls),
                Arc::clone(&seen),
            ));
        }
    });

    (format!("http://{}", addr), methods)
}

// ─── Platform fake ───────────────────────────────────────────────────────────

pub const FACTORY: &str = "0x00000000000000000000000000000000000000fa";
pub const DEVNET_GENESIS: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG";

pub struct FakePlatform {
    pub blockchains: Vec<NetworkInfo>,
    pub balances: Vec<TokenBalanceInfo>,
    pub quote: PremarketResponse,
    pub calls: AtomicUsize,
    /// Endpoint names in call order.
    pub log: Arc<Mutex<Vec<&'static str>>>,
    pub recorded: Mutex<Vec<DeployTokenRequest>>,
    pub auth: Mutex<Option<String>>,
    pub server_down: AtomicBool,
    pub listings: Vec<TokenListing>,
    pub deposit_queries: Mutex<Vec<DepositQuery>>,
    pub withdrawal_requests: Mutex<Vec<WithdrawalRequest>>,
    pub market_queries: Mutex<Vec<MarketQuery>>,
    pub trade_queries: Mutex<Vec<TradeQuery>>,
    pub orders: Mutex<Vec<OrderRequest>>,
    pub estimates: Mutex<Vec<EstimateRequest>>,
}

impl FakePlatform {
    pub fn new(log: Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            blockchains: vec![
                NetworkInfo {
                    key: "eip155:97".into(),
                    deposit_address: "0x00000000000000000000000000000000000000de".into(),
                    token_factory_contract_address: Some(FACTORY.into()),
                    ..Default::default()
                },
                NetworkInfo {
                    key: format!("solana:{}", DEVNET_GENESIS),
                    deposit_address: "11111111111111111111111111111111".into(),
                    token_factory_contract_address: Some(
                        "5SEpbdjFK5FxwTvfsGMXVQTD2v4M2c5tyRTxhdsPkgDw".into(),
                    ),
                    token_creation_fee: Some("0.1".into()),
                    ..Default::default()
                },
            ],
            balances: vec![
                TokenBalanceInfo {
                    token_id: "native:bnb".into(),
                    token_decimals: 18,
                    ..Default::default()
                },
                TokenBalanceInfo {
                    token_id: "native:sol".into(),
                    token_decimals: 9,
                    ..Default::default()
                },
                TokenBalanceInfo {
                    token_id: "erc20:0x00000000000000000000000000000000000000aa".into(),
                    token_decimals: 6,
                    ..Default::default()
                },
            ],
            quote: PremarketResponse {
                base_token_supply: "2000000000000000".into(),
                amount: "1000".into(),
                ..Default::default()
            },
            calls: AtomicUsize::new(0),
            log,
            recorded: Mutex::new(Vec::new()),
            auth: Mutex::new(None),
            server_down: AtomicBool::new(false),
            listings: vec![
                TokenListing {
                    token_id: "native:bnb".into(),
                    available_as_quote: true,
                    ..Default::default()
                },
                TokenListing {
                    token_id: "erc20:0x00000000000000000000000000000000000000aa".into(),
                    ..Default::default()
                },
            ],
            deposit_queries: Mutex::new(Vec::new()),
            withdrawal_requests: Mutex::new(Vec::new()),
            market_queries: Mutex::new(Vec::new()),
            trade_queries: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            estimates: Mutex::new(Vec::new()),
        }
    }

    fn hit(&self, name: &'static str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(name);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn server_status(&self) -> ServerStatus {
        self.hit("status");
        if self.server_down.load(Ordering::SeqCst) {
            ServerStatus {
                up: false,
                status: Some(503),
                error: Some("Response error: 503".into()),
            }
        } else {
            ServerStatus {
                up: true,
                status: Some(200),
                error: None,
            }
        }
    }

    async fn blockchains(&self) -> Result<Vec<NetworkInfo>, HttpError> {
        self.hit("blockchains");
        Ok(self.blockchains.clone())
    }

    async fn nonce(&self, _: &str, _: &str) -> Result<String, HttpError> {
        self.hit("nonce");
        Ok("nonce-1".into())
    }

    async fn set_signature_auth(&self, signature: Option<String>) {
        *self.auth.lock().unwrap() = signature;
    }

    async fn auth_check(&self, _: &str) -> Result<serde_json::Value, HttpError> {
        self.hit("auth_check");
        match self.auth.lock().unwrap().as_ref() {
            Some(_) => Ok(serde_json::json!({"ok": true})),
            None => Err(HttpError::Unauthorized),
        }
    }

    async fn accounts(&self, _: &AccountQuery) -> Result<Vec<TokenBalanceInfo>, HttpError> {
        self.hit("accounts");
        Ok(self.balances.clone())
    }

    async fn premarket_buy_amount(
        &self,
        _: &PremarketRequest,
    ) -> Result<PremarketResponse, HttpError> {
        self.hit("premarket");
        Ok(self.quote.clone())
    }

    async fn upload_token_metadata(
        &self,
        _: &TokenMetadataUpload,
    ) -> Result<TokenMetadataUrl, HttpError> {
        self.hit("metadata");
        Ok(TokenMetadataUrl {
            token_metadata_url: "https://meta.example.com/token.json".into(),
        })
    }

    async fn create_token(
        &self,
        record: &DeployTokenRequest,
    ) -> Result<serde_json::Value, HttpError> {
        self.hit("record");
        self.recorded.lock().unwrap().push(record.clone());
        Ok(serde_json::to_value(record).unwrap_or_default())
    }

    async fn tokens(
        &self,
        _: &str,
        available_as_quote: Option<bool>,
    ) -> Result<Vec<TokenListing>, HttpError> {
        self.hit("tokens");
        Ok(self
            .listings
            .iter()
            .filter(|t| available_as_quote.map_or(true, |q| t.available_as_quote == q))
            .cloned()
            .collect())
    }

    async fn deposits(&self, query: &DepositQuery) -> Result<Vec<DepositRecord>, HttpError> {
        self.hit("deposits");
        self.deposit_queries.lock().unwrap().push(query.clone());
        Ok(vec![DepositRecord {
            blockchain_key: query.blockchain_key.clone().unwrap_or_default(),
            token_id: "native:bnb".into(),
            token_address: String::new(),
            token_name: String::new(),
            token_symbol: "BNB".into(),
            user_address: query.user_address.clone().unwrap_or_default(),
            deposit_time: 1_700_000_000,
            deposit_tx_hash: "0xdeposit".into(),
            deposit_amount: "1000000000000000000".into(),
            formatted_deposit_amount: "1.0".into(),
            status: TransferStatus::Success,
            failure_reason: None,
        }])
    }

    async fn withdrawals(
        &self,
        query: &WithdrawalQuery,
    ) -> Result<Vec<WithdrawalRecord>, HttpError> {
        self.hit("withdrawals");
        Ok(vec![WithdrawalRecord {
            uid: "w-1".into(),
            blockchain_key: "eip155:97".into(),
            token_id: "native:bnb".into(),
            token_address: String::new(),
            token_symbol: "BNB".into(),
            user_address: query.user_address.clone().unwrap_or_default(),
            request_time: 1_700_000_000,
            request_amount: "1".into(),
            formatted_request_amount: "1".into(),
            status: TransferStatus::Requested,
            sent_tx_hash: None,
            sent_time: None,
            failure_reason: None,
        }])
    }

    async fn request_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalCreated, HttpError> {
        self.hit("request_withdrawal");
        self.withdrawal_requests.lock().unwrap().push(request.clone());
        Ok(WithdrawalCreated {
            message: "withdrawal requested".into(),
            withdrawal_uid: WithdrawalUid { uid: "w-2".into() },
        })
    }

    async fn markets(&self, query: &MarketQuery) -> Result<Vec<Market>, HttpError> {
        self.hit("markets");
        self.market_queries.lock().unwrap().push(query.clone());
        Ok(vec![Market {
            blockchain_key: query.blockchain_key.clone().unwrap_or_default(),
            base_token_id: "erc20:0x00000000000000000000000000000000000000aa".into(),
            quote_token_id: "native:bnb".into(),
            ..Default::default()
        }])
    }

    async fn trades(&self, query: &TradeQuery) -> Result<Vec<Trade>, HttpError> {
        self.hit("trades");
        self.trade_queries.lock().unwrap().push(query.clone());
        Ok(Vec::new())
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderCreated, HttpError> {
        self.hit("create_order");
        self.orders.lock().unwrap().push(order.clone());
        Ok(OrderCreated {
            message: "order created".into(),
            order_uid: "o-1".into(),
        })
    }

    async fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, HttpError> {
        self.hit("estimate");
        self.estimates.lock().unwrap().push(request.clone());
        Ok(Estimate {
            amount: Some("1000".into()),
            formatted_amount: Some("1000.0".into()),
            ..Default::default()
        })
    }
}

// ─── Wallet fake ─────────────────────────────────────────────────────────────

/// How the fake wallet answers `create_token`.
#[derive(Clone, Copy)]
pub enum CreateBehavior {
    Succeed,
    VestingFails,
    Reject,
}

pub struct FakeWallet {
    pub config: WalletConfig,
    pub behavior: CreateBehavior,
    pub creates: AtomicUsize,
    pub deposits: AtomicUsize,
    pub log: Arc<Mutex<Vec<&'static str>>>,
    pub last_params: Mutex<Option<CreateTokenParams>>,
}

impl FakeWallet {
    pub fn new(network: Network, behavior: CreateBehavior, log: Arc<Mutex<Vec<&'static str>>>) -> Self {
        let (address, chain_id, cluster) = match network {
            Network::Evm => (
                "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".to_string(),
                Some(97),
                None,
            ),
            Network::Solana => (
                "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3zQawwpjk2NsNY".to_string(),
                None,
                Some("devnet".to_string()),
            ),
        };
        Self {
            config: WalletConfig {
                network,
                address,
                domain: "api.example.com".into(),
                origin: "https://app.nusabyte.com".into(),
                chain_id,
                cluster,
            },
            behavior,
            creates: AtomicUsize::new(0),
            deposits: AtomicUsize::new(0),
            log,
            last_params: Mutex::new(None),
        }
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletCapability for FakeWallet {
    fn config(&self) -> &WalletConfig {
        &self.config
    }

    async fn sign_message(&self, params: &SignInParams) -> SdkResult<String> {
        Ok(format!("{}.signed.{}", self.config.network, params.nonce))
    }

    async fn genesis_hash(&self) -> SdkResult<Option<String>> {
        Ok(match self.config.network {
            Network::Solana => Some(DEVNET_GENESIS.to_string()),
            Network::Evm => None,
        })
    }

    async fn create_token(&self, params: &CreateTokenParams) -> SdkResult<TokenCreation> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("create_token");
        *self.last_params.lock().unwrap() = Some(params.clone());

        match self.behavior {
            CreateBehavior::Succeed if params.is_locked && self.config.network == Network::Solana => {
                Ok(TokenCreation {
                    creation_tx: "sig-create".into(),
                    mint: Some("Mint1111".into()),
                    vesting: VestingStatus::Created("sig-vest".into()),
                })
            }
            CreateBehavior::Succeed => Ok(TokenCreation::single("0xcreate")),
            CreateBehavior::VestingFails => Ok(TokenCreation {
                creation_tx: "sig-create".into(),
                mint: Some("Mint1111".into()),
                vesting: VestingStatus::Failed(SdkError::ChainSubmission(
                    ChainError::InvalidResponse("stream rejected".into()),
                )),
            }),
            CreateBehavior::Reject => Err(SdkError::ChainSubmission(ChainError::JsonRpc {
                code: -32000,
                message: "execution reverted".into(),
            })),
        }
    }

    async fn deposit(&self, _: &str, _: &str) -> SdkResult<String> {
        self.deposits.fetch_add(1, Ordering::SeqCst);
        Ok("0xdeposit".into())
    }

    async fn deposit_token(&self, _: &str, _: &str, _: &str, _: u8) -> SdkResult<String> {
        self.deposits.fetch_add(1, Ordering::SeqCst);
        Ok("0xdeposit-token".into())
    }

    async fn approve(&self, _: &str, _: &str, _: &str, _: u8) -> SdkResult<String> {
        Ok("0xapprove".into())
    }

    async fn allowance(&self, _: &str, _: &str) -> SdkResult<u128> {
        Ok(0)
    }
}
