//! Subscription code issuance and redemption.

use log::info;

use crate::api::MarketApi;
use crate::error::{RelistError, Result};
use crate::models::subscription::{SubscriptionRecord, SubscriptionStatus};
use crate::store::{DocumentStore, UserPatch};

/// Issues privileged subscription codes and redeems them into active
/// subscriptions.
pub struct CodeService<'a, A: MarketApi, S: DocumentStore> {
    api: &'a A,
    store: &'a S,
    account: &'a str,
    privileged_account: &'a str,
}

impl<'a, A: MarketApi, S: DocumentStore> CodeService<'a, A, S> {
    pub fn new(api: &'a A, store: &'a S, account: &'a str, privileged_account: &'a str) -> Self {
        Self {
            api,
            store,
            account,
            privileged_account,
        }
    }

    /// Generate a new subscription code valid for `duration_days`.
    ///
    /// Only the privileged account may issue codes; the check happens locally
    /// before any network call. The issued code is appended to the privileged
    /// account's outstanding-codes list so redemption can retire it later.
    pub async fn issue_code(&self, user_token: &str, duration_days: u32) -> Result<String> {
        if self.account != self.privileged_account {
            return Err(RelistError::NotAuthorized(
                "only the privileged account may generate subscription codes".into(),
            ));
        }
        if duration_days == 0 {
            return Err(RelistError::Validation(
                "code duration must be at least one day".into(),
            ));
        }

        let code = self
            .api
            .generate_subscription_code(user_token, duration_days)
            .await?;

        let mut codes = self
            .store
            .load_user(self.account)
            .await?
            .map(|doc| doc.generated_subscription_codes)
            .unwrap_or_default();
        codes.push(code.clone());
        self.store
            .merge_user(self.account, UserPatch::codes(codes))
            .await?;

        info!("issued subscription code valid for {duration_days} days");
        Ok(code)
    }

    /// Redeem `code` into an active subscription for this account.
    ///
    /// A rejected code raises before anything is written. On success the new
    /// record is persisted as active and the code is retired from the
    /// privileged account's outstanding list.
    pub async fn redeem_code(&self, user_token: &str, code: &str) -> Result<SubscriptionRecord> {
        if code.trim().is_empty() {
            return Err(RelistError::Validation(
                "subscription code must not be empty".into(),
            ));
        }

        let activation = self.api.activate_subscription(user_token, code).await?;
        let record = SubscriptionRecord {
            subscription_key: activation.subscription_key,
            expires_at: activation.expires_at,
            status: SubscriptionStatus::Active,
        };
        self.store
            .merge_user(self.account, UserPatch::subscription(&record))
            .await?;
        self.retire_code(code).await?;

        info!(
            "activated subscription for {} until {}",
            self.account, record.expires_at
        );
        Ok(record)
    }

    /// Remove a redeemed code from the privileged outstanding list. A code
    /// issued outside this crate simply is not in the list, which is fine.
    async fn retire_code(&self, code: &str) -> Result<()> {
        let Some(doc) = self.store.load_user(self.privileged_account).await? else {
            return Ok(());
        };
        if !doc.generated_subscription_codes.iter().any(|c| c == code) {
            return Ok(());
        }
        let remaining: Vec<String> = doc
            .generated_subscription_codes
            .into_iter()
            .filter(|c| c != code)
            .collect();
        self.store
            .merge_user(self.privileged_account, UserPatch::codes(remaining))
            .await
    }
}
