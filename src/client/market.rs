use super::WaxpeerClient;
use crate::error::Result;
use crate::request::QueryParams;
use crate::types::{
    AvailabilityResponse, DopplersQuery, Game, Id, ItemsListQuery, ItemsResponse, PricesQuery,
    PricesResponse,
};

impl WaxpeerClient {
    /// Aggregated prices of every listed item name - `/prices`
    ///
    /// Limited to 60 requests per minute. Past the limit this fails with
    /// [`Error::RateLimited`](crate::Error::RateLimited) without sending anything; the marketplace answers
    /// excess requests with 429 or an IP ban.
    pub async fn get_prices(&self, query: &PricesQuery) -> Result<PricesResponse> {
        self.prices_limiter.check()?;

        let params = QueryParams::new()
            .push("game", query.game)
            .push_opt("min_price", query.min_price)
            .push_opt("max_price", query.max_price)
            .push_opt("search", query.search.as_deref().filter(|s| !s.is_empty()))
            .push_flag("minified", query.minified)
            .push_flag("highest_offer", query.highest_offer)
            .push_flag("single", query.single);
        self.http_client.get("prices", &params).await
    }

    /// Doppler listings by phase and other filters - `/prices/dopplers`
    ///
    /// Shares the behavior of [`get_prices`](Self::get_prices) with its own
    /// 60 per minute budget.
    pub async fn get_prices_dopplers(&self, query: &DopplersQuery) -> Result<serde_json::Value> {
        self.dopplers_limiter.check()?;

        let params = QueryParams::new()
            .push("phase", &query.phase)
            .push_opt("exterior", query.exterior.as_deref())
            .push_opt("weapon", query.weapon.as_deref())
            .push_flag("minified", query.minified)
            .push_opt("min_price", query.min_price)
            .push_opt("max_price", query.max_price)
            .push_opt("search", query.search.as_deref())
            .push_flag("single", query.single);
        self.http_client.get("prices/dopplers", &params).await
    }

    /// Listings, orders and history for up to 50 item names - `/mass-info`
    pub async fn mass_info(&self, names: &[&str], game: Game) -> Result<serde_json::Value> {
        let params = QueryParams::new().push("game", game);
        let body = serde_json::json!({ "name": names, "sell": 1 });
        self.http_client
            .post("mass-info", &params, Some(&body))
            .await
    }

    /// Listed items of a game, at most 100 per page - `/get-items-list`
    pub async fn get_items_list(&self, query: &ItemsListQuery) -> Result<ItemsResponse> {
        let params = QueryParams::new()
            .push("skip", query.skip)
            .push_opt("search", query.search.as_deref())
            .push_opt("brand", query.brand.as_deref())
            .push("order", query.order.as_str())
            .push("order_by", query.order_by.as_str())
            .push_opt("exterior", query.exterior.as_deref())
            .push_opt("max_price", query.max_price)
            .push_opt("min_price", query.min_price)
            .push("game", query.game);
        self.http_client.get("get-items-list", &params).await
    }

    /// Listed items matching any of the given names - `/search-items-by-name`
    pub async fn search_items(&self, names: &[&str], game: Game) -> Result<ItemsResponse> {
        let params = QueryParams::new()
            .push("game", game)
            .push_all("names", names);
        self.http_client.get("search-items-by-name", &params).await
    }

    /// Whether items are still for sale, at most 100 ids - `/check-availability`
    pub async fn check_availability(&self, item_ids: &[Id]) -> Result<AvailabilityResponse> {
        let params = QueryParams::new().push_all("item_id", item_ids);
        self.http_client.get("check-availability", &params).await
    }

    /// Recommended prices and offers for a game - `/get-steam-items`
    ///
    /// `highest_offer` adds the best buy order price, which is not filtered by
    /// buyers' balances.
    pub async fn get_steam_items(&self, game: Game, highest_offer: bool) -> Result<serde_json::Value> {
        let params = QueryParams::new()
            .push("game", game.app_id())
            .push_flag("highest_offer", highest_offer);
        self.http_client.get("get-steam-items", &params).await
    }
}
