//! The HTTP implementation of [`StatsGateway`], backed by `reqwest`.

use mindforge_protocol::{
    Codec, GatewayAction, JsonCodec, PlayerName, RankingEntry, RankingResponse, RecordsResponse,
    SaveRequest, SaveResponse, SessionRecord, StatsPayload, StatsResponse,
};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{GatewayConfig, GatewayError, SaveReceipt, StatsGateway};

/// Sends every action to one endpoint: reads as `GET ?action=…`, the save
/// as a `POST` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpGateway<C: Codec = JsonCodec> {
    client: reqwest::Client,
    config: GatewayConfig,
    codec: C,
}

impl HttpGateway {
    /// Builds a gateway with the JSON codec.
    ///
    /// # Errors
    /// Returns [`GatewayError::Transport`] if the HTTP client cannot be
    /// built (for example, the TLS backend fails to initialize).
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        Self::with_codec(config, JsonCodec)
    }
}

impl<C: Codec> HttpGateway<C> {
    pub fn with_codec(config: GatewayConfig, codec: C) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            config,
            codec,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(
        &self,
        action: GatewayAction,
        player: Option<&PlayerName>,
    ) -> Result<T, GatewayError> {
        let mut query = vec![("action", action.as_str())];
        if let Some(player) = player {
            query.push(("player_name", player.as_str()));
        }

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&query)
            .send()
            .await?;
        self.read(action, response).await
    }

    async fn read<T: DeserializeOwned>(
        &self,
        action: GatewayAction,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        debug!(action = action.as_str(), bytes = body.len(), "gateway response");
        Ok(self.codec.decode(&body)?)
    }
}

/// Turns a `success: false` body into an error.
fn ensure_success(
    action: GatewayAction,
    success: bool,
    error: Option<String>,
) -> Result<(), GatewayError> {
    if success {
        return Ok(());
    }
    Err(GatewayError::Rejected {
        action: action.as_str(),
        reason: error.unwrap_or_else(|| "no reason given".to_string()),
    })
}

impl<C: Codec> StatsGateway for HttpGateway<C> {
    #[instrument(skip_all, fields(player = %player))]
    async fn fetch_stats(&self, player: &PlayerName) -> Result<StatsPayload, GatewayError> {
        let action = GatewayAction::GetStats;
        let resp: StatsResponse = self.get(action, Some(player)).await?;
        ensure_success(action, resp.success, resp.error)?;
        // A player with no saved sessions may come back without a stats
        // object at all.
        Ok(resp.stats.unwrap_or_default())
    }

    #[instrument(skip_all, fields(player = %request.player_name))]
    async fn save_session(&self, request: &SaveRequest) -> Result<SaveReceipt, GatewayError> {
        let action = GatewayAction::Save;
        let body = self.codec.encode(request)?;

        let response = self
            .client
            .post(&self.config.base_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let resp: SaveResponse = self.read(action, response).await?;
        ensure_success(action, resp.success, resp.error)?;

        Ok(SaveReceipt {
            session_number: resp.session_number,
            total: request.scores().total(),
        })
    }

    #[instrument(skip_all)]
    async fn fetch_ranking(&self) -> Result<Vec<RankingEntry>, GatewayError> {
        let action = GatewayAction::GetRanking;
        let resp: RankingResponse = self.get(action, None).await?;
        ensure_success(action, resp.success, resp.error)?;
        Ok(resp.ranking)
    }

    #[instrument(skip_all, fields(player = %player))]
    async fn fetch_records(&self, player: &PlayerName) -> Result<Vec<SessionRecord>, GatewayError> {
        let action = GatewayAction::GetRecords;
        let resp: RecordsResponse = self.get(action, Some(player)).await?;
        ensure_success(action, resp.success, resp.error)?;
        Ok(resp.records)
    }
}
