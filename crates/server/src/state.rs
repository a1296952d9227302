use replayq_core::{Config, SanitizedConfig, SessionHandle};

use crate::api::WsBroadcaster;

/// Shared application state
pub struct AppState {
    config: Config,
    session: SessionHandle,
    broadcaster: WsBroadcaster,
}

impl AppState {
    pub fn new(config: Config, session: SessionHandle, broadcaster: WsBroadcaster) -> Self {
        Self {
            config,
            session,
            broadcaster,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn broadcaster(&self) -> &WsBroadcaster {
        &self.broadcaster
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
