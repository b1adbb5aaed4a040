//! Consumer side of a chat conversation
//!
//! Every callback is handled from its token alone: decode the target
//! state, replay the transition that leads there, then act on the
//! directive. Nothing is kept between callbacks.

mod reply;

pub use reply::{ChartImage, Reply};

use crate::artifact::ArtifactStore;
use crate::backend::{BackendClient, StatsResult};
use crate::gateway::{ChartOutcome, Gateway, Report};
use crate::market::{validate_limit, Currency, Granularity, HistoryQuery, MarketError, Symbol};
use crate::menu::{entry, transition, Keyboard, RenderDirective};
use crate::token::{Selection, TokenCodec};

const GREETING: &str = "Hi! I am a cryptocurrency analytics bot. Pick one of the options.";
const CHOOSE_ASSET: &str = "Choose a cryptocurrency:";
const UNKNOWN_COMMAND: &str = "Unknown command. Please try again.";
const HELP: &str = "Here is what I can do:\n/start - Start the bot\n/help - Show this help";

pub struct Conversation<B, S> {
    gateway: Gateway<B>,
    store: S,
    codec: TokenCodec,
    currency: Currency,
    limit: u32,
}

impl<B: BackendClient, S: ArtifactStore> Conversation<B, S> {
    /// `limit` is the history window used for statistics and charts
    pub fn new(
        gateway: Gateway<B>,
        store: S,
        codec: TokenCodec,
        currency: Currency,
        limit: u32,
    ) -> Result<Self, MarketError> {
        Ok(Self {
            gateway,
            store,
            codec,
            currency,
            limit: validate_limit(limit)?,
        })
    }

    pub fn start(&self) -> Reply {
        Reply::text(GREETING, self.main_menu())
    }

    pub fn help(&self) -> Reply {
        Reply::text(HELP, Keyboard::default())
    }

    pub async fn handle_callback(&self, token: &str) -> Reply {
        let target = match self.codec.decode(token) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::debug!(token, error = %e, "Rejected callback token");
                return self.unknown_command();
            }
        };

        let (previous, action) = entry(&target);
        let result = transition(&previous, &action);
        let keyboard = self.keyboard_for(&result.new_state);

        match result.directive {
            RenderDirective::ShowMainMenu => Reply::text(CHOOSE_ASSET, keyboard),
            RenderDirective::ShowActionMenu { symbol } => {
                Reply::text(format!("You chose {symbol}. Choose an action:"), keyboard)
            }
            RenderDirective::ShowPeriodMenu { symbol } => Reply::text(
                format!("You chose {symbol}. Choose a period to analyse:"),
                keyboard,
            ),
            RenderDirective::FetchLatest { symbol } => self.latest(&symbol, keyboard).await,
            RenderDirective::FetchReport {
                symbol,
                granularity,
            } => self.report(symbol, granularity, keyboard).await,
            RenderDirective::UnknownCommand => self.unknown_command(),
        }
    }

    async fn latest(&self, symbol: &Symbol, keyboard: Keyboard) -> Reply {
        match self.gateway.latest(symbol, &self.currency).await {
            Ok(point) => Reply::text(
                format!("Current {symbol} price: {} {}", point.price, point.currency),
                keyboard,
            ),
            Err(e) => Reply::text(format!("Could not fetch the current price: {e}"), keyboard),
        }
    }

    async fn report(&self, symbol: Symbol, granularity: Granularity, keyboard: Keyboard) -> Reply {
        let query = HistoryQuery {
            symbol,
            granularity,
            currency: self.currency.clone(),
            limit: self.limit,
        };
        let Report { stats, chart } = match self.gateway.report(&query).await {
            Ok(report) => report,
            Err(e) => {
                return Reply::text(format!("Could not compute statistics: {e}"), keyboard);
            }
        };

        let caption = self.caption(&query, &stats);
        let chart = match chart {
            ChartOutcome::Rendered(chart) => self
                .store
                .fetch(&chart.key)
                .await
                .map_err(|e| e.to_string()),
            ChartOutcome::Failed { error, .. } => Err(error.to_string()),
        };

        match chart {
            Ok(bytes) => Reply::text(caption, keyboard).with_chart(ChartImage {
                filename: format!("{}_{}.png", query.symbol, query.granularity),
                bytes,
            }),
            Err(e) => {
                tracing::warn!(
                    symbol = %query.symbol,
                    error = %e,
                    "Sending statistics without chart"
                );
                Reply::text(format!("{caption}\n\nChart unavailable: {e}"), keyboard)
            }
        }
    }

    fn caption(&self, query: &HistoryQuery, stats: &StatsResult) -> String {
        let unit = match query.granularity {
            Granularity::Day => "days",
            Granularity::Hour => "hours",
        };
        [
            format!("{} statistics for {} {unit}:", query.symbol, self.limit),
            format!("Average price: {}", stats.average),
            format!("Maximum price: {}", stats.max),
            format!("Median price: {}", stats.median),
            format!("Minimum price: {}", stats.min),
        ]
        .join("\n")
    }

    fn unknown_command(&self) -> Reply {
        Reply::text(UNKNOWN_COMMAND, self.main_menu())
    }

    fn main_menu(&self) -> Keyboard {
        Keyboard::main_menu(self.codec.assets())
    }

    fn keyboard_for(&self, state: &Selection) -> Keyboard {
        Keyboard::for_state(state, self.codec.assets(), self.limit)
    }
}
