//! Administrator onboarding screen.

use shopdesk_core::AdminAccount;

use crate::api::{ApiError, ApiResult, DashboardApi};

pub struct AdminsView<'a, A: DashboardApi + ?Sized> {
    api: &'a A,
    admins: Vec<AdminAccount>,
}

impl<'a, A: DashboardApi + ?Sized> AdminsView<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            admins: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// Returns the fetch error; the previous list is kept.
    pub async fn load(&mut self) -> ApiResult<()> {
        self.admins = self.api.list_admins().await?;
        Ok(())
    }

    pub fn admins(&self) -> &[AdminAccount] {
        &self.admins
    }

    /// Create an administrator and refresh the list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when either field is blank, without
    /// sending a request, or the server's error.
    pub async fn create(&mut self, email: &str, password: &str) -> ApiResult<AdminAccount> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password required".to_owned(),
            ));
        }

        let account = self.api.create_admin(email.trim(), password).await?;
        tracing::info!(admin_id = %account.id, "Admin created");

        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "Failed to refresh admin list");
        }
        Ok(account)
    }
}
