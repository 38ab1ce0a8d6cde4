//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::domain::click_event::ClickSender;

/// Services and the click queue producer. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    pub click_sender: ClickSender,
}

impl AppState {
    pub fn new(
        link_service: LinkService,
        stats_service: StatsService,
        auth_service: AuthService,
        click_sender: ClickSender,
    ) -> Self {
        Self {
            link_service: Arc::new(link_service),
            stats_service: Arc::new(stats_service),
            auth_service: Arc::new(auth_service),
            click_sender,
        }
    }
}
