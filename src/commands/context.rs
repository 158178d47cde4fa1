//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::sync::Arc;

use crate::features::events::GroupClassifier;
use crate::features::queries::QueryService;
use crate::features::subscribers::RecipientStore;

/// Services every command handler can reach
#[derive(Clone)]
pub struct CommandContext {
    pub store: Arc<RecipientStore>,
    pub queries: Arc<QueryService>,
    pub classifier: GroupClassifier,
    pub notification_hour: u32,
}

impl CommandContext {
    pub fn new(
        store: Arc<RecipientStore>,
        queries: Arc<QueryService>,
        classifier: GroupClassifier,
        notification_hour: u32,
    ) -> Self {
        Self {
            store,
            queries,
            classifier,
            notification_hour,
        }
    }
}
