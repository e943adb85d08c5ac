use chrono::NaiveDate;

use super::WaxpeerClient;
use crate::error::Result;
use crate::request::QueryParams;
use crate::types::{MyHistoryResponse, ProfileResponse, SortOrder, StatusResponse, TradeLinkResponse};

impl WaxpeerClient {
    /// Get profile data of the key owner - `/user`
    pub async fn get_profile(&self) -> Result<ProfileResponse> {
        self.http_client.get("user", &QueryParams::new()).await
    }

    /// Trades and wallet transactions in one request, at most 100 entries - `/my-history`
    ///
    /// # Arguments
    /// * `skip` - Entries to skip (max 1000)
    /// * `start` - First day included
    /// * `end` - Last day included
    /// * `sort` - Sort by creation time
    pub async fn my_history(
        &self,
        skip: u32,
        start: NaiveDate,
        end: NaiveDate,
        sort: SortOrder,
    ) -> Result<MyHistoryResponse> {
        let body = serde_json::json!({
            "skip": skip,
            "start": start.format("%Y-%m-%d").to_string(),
            "end": end.format("%Y-%m-%d").to_string(),
            "sort": sort.as_str(),
        });
        self.http_client
            .post("my-history", &QueryParams::new(), Some(&body))
            .await
    }

    /// Change the trade link of the account - `/change-tradelink`
    pub async fn change_tradelink(&self, tradelink: &str) -> Result<TradeLinkResponse> {
        let body = serde_json::json!({ "tradelink": tradelink });
        self.http_client
            .post("change-tradelink", &QueryParams::new(), Some(&body))
            .await
    }

    /// Check whether a trade link can receive trades - `/check-tradelink`
    pub async fn validate_tradelink(&self, tradelink: &str) -> Result<TradeLinkResponse> {
        let body = serde_json::json!({ "tradelink": tradelink });
        self.http_client
            .post("check-tradelink", &QueryParams::new(), Some(&body))
            .await
    }

    /// Connect a Steam web API key to the account - `/set-my-steamapi`
    pub async fn set_steam_api(&self, steam_api: &str) -> Result<StatusResponse> {
        let params = QueryParams::new().push("steam_api", steam_api);
        self.http_client.get("set-my-steamapi", &params).await
    }

    /// Send the Steam access token (base64) needed to stay online - `/user/steam-token`
    ///
    /// The marketplace recommends sending it about once an hour. A response with
    /// `success: false` means the token must be refreshed.
    pub async fn set_user_steam_token(&self, token: &str) -> Result<StatusResponse> {
        let body = serde_json::json!({ "token": token });
        self.http_client
            .post("user/steam-token", &QueryParams::new(), Some(&body))
            .await
    }

    /// Force a check of the trade socket status of a seller - `/check-wss-user`
    ///
    /// Useful on poor connections to bring listings back on sale.
    pub async fn check_wss_user(&self, steamid: &str) -> Result<serde_json::Value> {
        let params = QueryParams::new().push("steamid", steamid);
        self.http_client.get("check-wss-user", &params).await
    }

    /// Create a user, or fetch its API key, from a Steam access token - `POST /user`
    pub async fn create_user(&self, token: &str) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "token": token });
        self.http_client
            .post("user", &QueryParams::new(), Some(&body))
            .await
    }
}
