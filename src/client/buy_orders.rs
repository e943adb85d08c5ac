use super::WaxpeerClient;
use crate::error::Result;
use crate::request::QueryParams;
use crate::types::{Game, Price, SortOrder};

impl WaxpeerClient {
    /// Active buy orders, sorted by price descending - `/buy-orders`
    ///
    /// # Arguments
    /// * `skip` - Orders to skip
    /// * `name` - Only orders for this item name
    /// * `own` - Only the user's own orders
    /// * `game` - Only orders of this game, all games when `None`
    pub async fn buy_orders(
        &self,
        skip: u32,
        name: Option<&str>,
        own: bool,
        game: Option<Game>,
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("skip", skip)
            .push_opt("name", name)
            .push_flag("own", own)
            .push_opt("game", game);
        self.http_client.get("buy-orders", &params).await
    }

    /// Fills of the user's buy orders - `/buy-order-history`
    pub async fn buy_order_history(
        &self,
        skip: u32,
        game: Option<Game>,
        sort: SortOrder,
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("skip", skip)
            .push_opt("game", game)
            .push("sort", sort.as_str());
        self.http_client.get("buy-order-history", &params).await
    }

    /// Place an order that buys up to `amount` items at no more than `price` - `/create-buy-order`
    pub async fn create_buy_order(
        &self,
        name: &str,
        amount: u32,
        price: Price,
        game: Game,
    ) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("name", name)
            .push("amount", amount)
            .push("price", price)
            .push("game", game);
        self.http_client
            .post::<_, ()>("create-buy-order", &params, None)
            .await
    }

    /// Change amount and price of a buy order - `/edit-buy-order`
    pub async fn edit_buy_order(
        &self,
        id: u64,
        amount: u32,
        price: Price,
    ) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "id": id, "amount": amount, "price": price });
        self.http_client
            .post("edit-buy-order", &QueryParams::new(), Some(&body))
            .await
    }

    /// Cancel buy orders by id - `/remove-buy-order`
    pub async fn remove_buy_orders(&self, ids: &[u64]) -> Result<serde_json::Value> {
        let params = QueryParams::new().push_all("id", ids);
        self.http_client.get("remove-buy-order", &params).await
    }

    /// Cancel every buy order, of one game or of all games - `/remove-all-orders`
    ///
    /// On timeout the response has `success: false` and some orders may remain;
    /// the removed count is reported either way.
    pub async fn remove_all_buy_orders(&self, game: Option<Game>) -> Result<serde_json::Value> {
        let params = QueryParams::new().push_opt("game", game);
        self.http_client.get("remove-all-orders", &params).await
    }
}
