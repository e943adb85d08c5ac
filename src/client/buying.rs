use super::WaxpeerClient;
use crate::error::Result;
use crate::request::QueryParams;
use crate::types::{
    BuyResponse, Game, Id, Price, PurchaseHistoryResponse, StatusResponse, TradePartner,
    TradesStatusResponse,
};

impl WaxpeerClient {
    /// Buy the cheapest listing of an item name and send it to a trade link - `/buy-one-p2p-name`
    ///
    /// # Arguments
    /// * `name` - Market hash name
    /// * `price` - Highest price to pay
    /// * `partner` - Partner and token of the receiving trade link
    /// * `project_id` - Optional custom id (up to 50 characters) to track the trade with
    ///   [`custom_trade_request`](Self::custom_trade_request)
    /// * `game` - Game of the item
    pub async fn buy_item_with_name(
        &self,
        name: &str,
        price: Price,
        partner: &TradePartner,
        project_id: Option<&str>,
        game: Game,
    ) -> Result<BuyResponse> {
        let params = QueryParams::new()
            .push("name", name)
            .push("price", price)
            .push("token", &partner.token)
            .push("partner", &partner.partner)
            .push_opt("project_id", project_id)
            .push("game", game);
        self.http_client.get("buy-one-p2p-name", &params).await
    }

    /// Buy a specific listing and send it to a trade link - `/buy-one-p2p`
    ///
    /// Rust item ids exceed `u64` precision on the marketplace side, pass them as [`Id::Str`].
    pub async fn buy_item_with_id(
        &self,
        item_id: &Id,
        price: Price,
        partner: &TradePartner,
        project_id: Option<&str>,
    ) -> Result<BuyResponse> {
        let params = QueryParams::new()
            .push("item_id", item_id)
            .push("price", price)
            .push("token", &partner.token)
            .push("partner", &partner.partner)
            .push_opt("project_id", project_id);
        self.http_client.get("buy-one-p2p", &params).await
    }

    /// Status of purchases by the ids returned when buying - `/check-many-steam`
    pub async fn trade_request_status(&self, ids: &[Id]) -> Result<TradesStatusResponse> {
        let params = QueryParams::new().push_all("id", ids);
        self.http_client.get("check-many-steam", &params).await
    }

    /// Status of purchases by the `project_id` passed when buying - `/check-many-project-id`
    pub async fn custom_trade_request(&self, project_ids: &[&str]) -> Result<TradesStatusResponse> {
        let params = QueryParams::new().push_all("id", project_ids);
        self.http_client.get("check-many-project-id", &params).await
    }

    /// Recent purchases, 50 per page - `/history`
    ///
    /// With `partner` only purchases sent to that trade link are returned.
    pub async fn my_purchases(
        &self,
        skip: u32,
        partner: Option<&TradePartner>,
    ) -> Result<PurchaseHistoryResponse> {
        let params = QueryParams::new()
            .push("skip", skip)
            .push_opt("partner", partner.map(|p| p.partner.as_str()))
            .push_opt("token", partner.map(|p| p.token.as_str()));
        self.http_client.get("history", &params).await
    }

    /// Report a trade created in Steam before confirming it - `/steam-trade`
    ///
    /// # Arguments
    /// * `tradeid` - Steam trade offer id
    /// * `waxid` - Marketplace trade id, as received in `send-trade`
    pub async fn steam_trade(&self, tradeid: &str, waxid: &str) -> Result<StatusResponse> {
        let body = serde_json::json!({ "tradeid": tradeid, "waxid": waxid });
        self.http_client
            .post("steam-trade", &QueryParams::new(), Some(&body))
            .await
    }
}
