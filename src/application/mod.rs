// Application layer - services and ports
pub mod chart_reconciler;
pub mod chart_renderer;
pub mod coordinator;
pub mod notifier;
pub mod series_cache;
pub mod series_provider;
