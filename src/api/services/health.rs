use poem_openapi::payload::PlainText;

use crate::storage::UserRepo;

pub struct HealthService<'a> {
    pub users: &'a dyn UserRepo,
}

impl<'a> HealthService<'a> {
    pub fn new(users: &'a dyn UserRepo) -> Self {
        Self { users }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> PlainText<String> {
        let version = env!("CARGO_PKG_VERSION");
        match self.users.ping().await {
            Ok(()) => PlainText(format!("vintage_reads version={} store=ok", version)),
            Err(e) => {
                tracing::warn!(error = %e, "store ping failed");
                PlainText(format!("vintage_reads version={} store=error: {}", version, e))
            }
        }
    }
}
