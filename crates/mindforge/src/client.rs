//! `Mindforge` client and its builder.
//!
//! This is the entry point for a front end. It ties the layers together:
//! login → stats from the gateway → games on engine runners → scores in
//! the session → save through the gateway.

use mindforge_engine::{Engine, EngineConfig, EngineHandle, EngineRunner, EventSender, GameRules};
use mindforge_gateway::{GatewayConfig, HttpGateway, SaveReceipt, StatsGateway};
use mindforge_protocol::{PlayerName, RankingEntry, SessionRecord};
use mindforge_session::{HistoricalStats, LoginTicket, ScopedSink, SessionError, SessionHandle};
use mindforge_timer::TimerConfig;

use crate::MindforgeError;

/// Default bound of each engine runner's command channel.
const DEFAULT_CHANNEL_SIZE: usize = 32;

/// Builder for a [`Mindforge`] client.
///
/// # Example
///
/// ```rust,ignore
/// use mindforge::prelude::*;
///
/// let client = Mindforge::builder()
///     .gateway_config(GatewayConfig::from_env())
///     .build()?;
/// client.login("홍길동").await?;
/// ```
pub struct MindforgeBuilder {
    engine_config: EngineConfig,
    timer_config: TimerConfig,
    gateway_config: GatewayConfig,
    channel_size: usize,
}

impl MindforgeBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            engine_config: EngineConfig::default(),
            timer_config: TimerConfig::default(),
            gateway_config: GatewayConfig::default(),
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }

    /// Sets the game delays and round counts.
    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    /// Sets the timer configuration used by every engine runner.
    pub fn timer_config(mut self, config: TimerConfig) -> Self {
        self.timer_config = config;
        self
    }

    /// Sets where and how to reach the leaderboard service.
    pub fn gateway_config(mut self, config: GatewayConfig) -> Self {
        self.gateway_config = config;
        self
    }

    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size;
        self
    }

    /// Builds a client talking to the leaderboard service over HTTP.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<Mindforge<HttpGateway>, MindforgeError> {
        let gateway = HttpGateway::new(self.gateway_config.clone())?;
        Ok(self.build_with(gateway))
    }

    /// Builds a client on top of any [`StatsGateway`].
    ///
    /// The gateway configuration is ignored.
    pub fn build_with<G: StatsGateway>(self, gateway: G) -> Mindforge<G> {
        Mindforge {
            gateway,
            session: SessionHandle::new(),
            engine_config: self.engine_config,
            timer_config: self.timer_config.validated(),
            channel_size: self.channel_size.max(1),
        }
    }
}

impl Default for MindforgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Mindforge client: one player session and the gateway behind it.
///
/// Gateway failures never block play. Stats fall back to zero, and the
/// ranking and records fall back to empty lists. Only
/// [`save_session`](Self::save_session) reports them, since the player
/// has to know their session was not recorded.
pub struct Mindforge<G: StatsGateway> {
    gateway: G,
    session: SessionHandle,
    engine_config: EngineConfig,
    timer_config: TimerConfig,
    channel_size: usize,
}

impl Mindforge<HttpGateway> {
    /// Creates a new builder.
    pub fn builder() -> MindforgeBuilder {
        MindforgeBuilder::new()
    }
}

impl<G: StatsGateway> Mindforge<G> {
    /// The shared session. Clone it to hand it to other screens.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    /// Logs a player in and loads their historical stats.
    ///
    /// The name is trimmed. The login takes effect immediately. If the
    /// stats request fails the player starts with zeroed stats. If another
    /// login or a logout happened while the request was in flight, the
    /// response is dropped.
    ///
    /// # Errors
    /// Returns [`MindforgeError::Protocol`] if the name is blank.
    pub async fn login(&self, raw_name: &str) -> Result<PlayerName, MindforgeError> {
        let name = PlayerName::parse(raw_name)?;
        let ticket = self.session.lock().login(name.clone());

        self.load_stats(&name, ticket).await;
        Ok(name)
    }

    /// Clears the session. Late stats responses and scores of games
    /// opened before this call are dropped.
    pub fn logout(&self) {
        self.session.lock().logout();
    }

    /// Zeroes the session scores and keeps the player logged in.
    pub fn restart(&self) {
        self.session.lock().reset_session_scores();
    }

    pub fn total_score(&self) -> u32 {
        self.session.total_score()
    }

    /// Starts a game on its own runner task.
    ///
    /// The game's explain name is stored for the assistant overlay. When
    /// the game finishes, its score lands in the session. Events go to
    /// `events`.
    pub fn open_game<R: GameRules>(&self, rules: R, events: EventSender<R>) -> EngineHandle<R> {
        self.session.lock().request_explain(R::KEY.route_id());
        tracing::info!(game = %R::KEY, "opening game");

        EngineRunner::spawn(
            self.engine(rules),
            self.timer_config.clone(),
            events,
            self.channel_size,
        )
    }

    /// Builds an engine wired to the current session, for callers that
    /// drive delays themselves.
    ///
    /// The engine only reports into the session it was built in. After a
    /// logout or another login its score is dropped.
    pub fn engine<R: GameRules>(&self, rules: R) -> Engine<R, ScopedSink> {
        Engine::new(rules, self.engine_config.clone(), self.session.scoped_sink())
    }

    /// Consumes the pending explain request.
    pub fn take_explain(&self) -> Option<String> {
        self.session.lock().take_explain()
    }

    /// Saves the current session scores as one leaderboard record.
    ///
    /// On success the historical stats are reloaded. On failure the
    /// session scores are left as they were so the player can retry.
    ///
    /// # Errors
    /// - [`SessionError::NotLoggedIn`] / [`SessionError::NothingToSave`]
    ///   before any request is sent.
    /// - [`MindforgeError::Gateway`] if the service call fails.
    pub async fn save_session(&self) -> Result<SaveReceipt, MindforgeError> {
        let (request, ticket) = {
            let session = self.session.lock();
            let request = session.save_request()?;
            let ticket = session.current_ticket().ok_or(SessionError::NotLoggedIn)?;
            (request, ticket)
        };

        let receipt = match self.gateway.save_session(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(
                    player = %request.player_name,
                    error = %e,
                    "session save failed; scores kept"
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            player = %request.player_name,
            session_number = receipt.session_number,
            total = receipt.total,
            "session saved"
        );

        self.load_stats(&request.player_name, ticket).await;
        Ok(receipt)
    }

    /// The global ranking, or an empty list if the service fails.
    pub async fn ranking(&self) -> Vec<RankingEntry> {
        match self.gateway.fetch_ranking().await {
            Ok(ranking) => ranking,
            Err(e) => {
                tracing::warn!(error = %e, "ranking unavailable");
                Vec::new()
            }
        }
    }

    /// The logged-in player's saved sessions, or an empty list if the
    /// service fails.
    ///
    /// # Errors
    /// Returns [`SessionError::NotLoggedIn`] when nobody is logged in.
    pub async fn records(&self) -> Result<Vec<SessionRecord>, MindforgeError> {
        let name = self
            .session
            .lock()
            .player_name()
            .cloned()
            .ok_or(SessionError::NotLoggedIn)?;

        match self.gateway.fetch_records(&name).await {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(player = %name, error = %e, "records unavailable");
                Ok(Vec::new())
            }
        }
    }

    /// Fetches stats for `name` and applies them if `ticket` is still the
    /// current login.
    async fn load_stats(&self, name: &PlayerName, ticket: LoginTicket) {
        let payload = match self.gateway.fetch_stats(name).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(player = %name, error = %e, "stats unavailable");
                return;
            }
        };

        let stats = HistoricalStats::from(&payload);
        if let Err(e) = self.session.lock().hydrate(ticket, stats) {
            tracing::debug!(player = %name, error = %e, "discarding stats response");
        }
    }
}
