use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub search: SearchTimings,
    pub flow: FlowOptions,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchTimings {
    pub flight_delay_ms: u64,
    pub hotel_delay_ms: u64,
    #[serde(default)]
    pub jitter_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlowOptions {
    /// Express mode: auto-select the best offer from each result list and
    /// chain straight into the next search. Off for the guided wizard flow.
    pub auto_select: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search: SearchTimings {
                flight_delay_ms: 1000,
                hotel_delay_ms: 1500,
                jitter_ms: 0,
            },
            flow: FlowOptions { auto_select: true },
        }
    }
}

impl SessionConfig {
    /// Layered load: built-in defaults, then optional `config/default` and
    /// `config/local` files, then `TRIPLINE`-prefixed environment variables
    /// (e.g. `TRIPLINE_SEARCH__FLIGHT_DELAY_MS=50`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .set_default("search.flight_delay_ms", 1000_i64)?
            .set_default("search.hotel_delay_ms", 1500_i64)?
            .set_default("search.jitter_ms", 0_i64)?
            .set_default("flow.auto_select", true)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("TRIPLINE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
