use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. Later calls are ignored, so tests
/// can call this freely.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tripline_session=debug,tripline_store=debug,tripline_flow=debug,tripline_search=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
