// Stubbed professional-network integration. The OAuth flow is simulated;
// no network calls leave this module.

pub mod handlers;
