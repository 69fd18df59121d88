use std::sync::Arc;
use tracing::info;

use crate::{
    config::Config,
    data_seeder,
    infrastructure::{ContentStore, SqliteContentStore},
    models::NewUser,
    services::{ContentEditor, ContentResolver},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub resolver: ContentResolver,
    pub editor: ContentEditor,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize database
        let store = SqliteContentStore::connect(&config.database.url, config.database.max_connections).await?;
        let store: Arc<dyn ContentStore> = Arc::new(store);
        let state = Self::with_store(store, config);

        if let Some(admin) = &state.config.admin {
            let user = state
                .store
                .save_user(NewUser {
                    username: admin.username.clone(),
                    email: admin.email.clone(),
                    is_staff: true,
                    api_token: Some(admin.token.clone()),
                    ..NewUser::default()
                })
                .await?;
            info!(username = %user.username, "Staff account ready");
        }

        if state.config.seed_sample_data && state.store.is_empty().await? {
            data_seeder::seed_sample_content(&state).await?;
        }

        Ok(state)
    }

    /// State over an already opened store.
    pub fn with_store(store: Arc<dyn ContentStore>, config: Config) -> Self {
        Self {
            resolver: ContentResolver::new(store.clone()),
            editor: ContentEditor::new(store.clone()),
            store,
            config,
        }
    }
}
