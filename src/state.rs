use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::auth::{Role, SessionError, SessionProvider, SessionUser, StaticSessionProvider};
use crate::auth::SupabaseSessionProvider;
use crate::config::AppConfig;
use crate::documents::{DesktopSurface, LayoutTemplate, PrintSurface, SurfaceError};
use crate::procurement::store::RecordStore;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("cannot prepare print views: {0}")]
    Surface(#[from] SurfaceError),
}

/// Shared state for every worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<RecordStore>>,
    pub layout: Arc<LayoutTemplate>,
    pub sessions: Arc<dyn SessionProvider>,
    pub print_surface: Arc<dyn PrintSurface + Send + Sync>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        sessions: Arc<dyn SessionProvider>,
        print_surface: Arc<dyn PrintSurface + Send + Sync>,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(RecordStore::new())),
            layout: Arc::new(LayoutTemplate::appendix_60()),
            sessions,
            print_surface,
            config: Arc::new(config),
        }
    }

    /// State with the session provider and print surface the configuration asks for.
    pub fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let sessions: Arc<dyn SessionProvider> = match &config.supabase {
            Some(supabase) => {
                log::info!("Checking sessions against {}", supabase.url);
                Arc::new(SupabaseSessionProvider::new(
                    &supabase.url,
                    supabase.anon_key.clone(),
                )?)
            }
            None => {
                log::warn!(
                    "SUPABASE_URL/SUPABASE_ANON_KEY not set; every request runs as an anonymous end user"
                );
                Arc::new(
                    StaticSessionProvider::new()
                        .with_anonymous(SessionUser::new("anonymous"), Role::EndUser),
                )
            }
        };

        let print_surface = Arc::new(DesktopSurface::new(
            config.print_opener.clone(),
            config.export_dir.clone(),
        )?);

        Ok(Self::new(config, sessions, print_surface))
    }
}
