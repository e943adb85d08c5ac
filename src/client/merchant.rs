use super::WaxpeerClient;
use crate::error::Result;
use crate::request::QueryParams;
use crate::types::{Game, MerchantListing};

impl WaxpeerClient {
    /// Look up a user registered with a merchant - `GET /merchant/user`
    pub async fn merchant_user(&self, steam_id: &str, merchant: &str) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("steam_id", steam_id)
            .push("merchant", merchant);
        self.http_client.get("merchant/user", &params).await
    }

    /// Register a user with a merchant - `POST /merchant/user`
    pub async fn register_merchant_user(
        &self,
        merchant: &str,
        tradelink: &str,
        steam_id: &str,
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new().push("merchant", merchant);
        let body = serde_json::json!({ "tradelink": tradelink, "steam_id": steam_id });
        self.http_client
            .post("merchant/user", &params, Some(&body))
            .await
    }

    /// Fetch and process a user's inventory - `POST /merchant/inventory`
    ///
    /// Call before [`merchant_inventory`](Self::merchant_inventory).
    pub async fn merchant_inventory_update(
        &self,
        steam_id: &str,
        merchant: &str,
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("steam_id", steam_id)
            .push("merchant", merchant);
        self.http_client
            .post::<_, ()>("merchant/inventory", &params, None)
            .await
    }

    /// Items a user can deposit - `GET /merchant/inventory`
    pub async fn merchant_inventory(
        &self,
        steam_id: &str,
        merchant: &str,
        game: Game,
        skip: u32,
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("steam_id", steam_id)
            .push("merchant", merchant)
            .push("game", game.app_id())
            .push("skip", skip);
        self.http_client.get("merchant/inventory", &params).await
    }

    /// Deposit and list a user's items - `/merchant/list-items-steam`
    pub async fn merchant_list_items_steam(
        &self,
        merchant: &str,
        steam_id: &str,
        items: &[MerchantListing],
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("merchant", merchant)
            .push("steam_id", steam_id);
        let body = serde_json::json!({ "items": items });
        self.http_client
            .post("merchant/list-items-steam", &params, Some(&body))
            .await
    }

    /// Deposit history, optionally narrowed to one user or transaction - `/merchant/deposits`
    pub async fn merchant_deposits(
        &self,
        merchant: &str,
        steam_id: Option<&str>,
        tx_id: Option<&str>,
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("merchant", merchant)
            .push_opt("steam_id", steam_id)
            .push_opt("tx_id", tx_id);
        self.http_client
            .post::<_, ()>("merchant/deposits", &params, None)
            .await
    }
}
