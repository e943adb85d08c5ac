use super::WaxpeerClient;
use crate::error::Result;
use crate::request::QueryParams;
use crate::types::{
    EditItemsResponse, Game, Id, InventoryResponse, ListItemsResponse, ListingRequest,
    RemoveItemsResponse,
};

impl WaxpeerClient {
    /// Refresh the Steam inventory cached by the marketplace - `/fetch-my-inventory`
    ///
    /// Call before [`get_my_inventory`](Self::get_my_inventory).
    pub async fn fetch_inventory(&self, game: Game) -> Result<serde_json::Value> {
        let params = QueryParams::new().push("game", game);
        self.http_client.get("fetch-my-inventory", &params).await
    }

    /// Inventory items that can be listed for sale - `/get-my-inventory`
    pub async fn get_my_inventory(&self, skip: u32, game: Game) -> Result<InventoryResponse> {
        let params = QueryParams::new().push("skip", skip).push("game", game);
        self.http_client.get("get-my-inventory", &params).await
    }

    /// List inventory items for sale - `POST /list-items-steam`
    pub async fn list_items_steam(
        &self,
        items: &[ListingRequest],
        game: Game,
    ) -> Result<ListItemsResponse> {
        let params = QueryParams::new().push("game", game);
        let body = serde_json::json!({ "items": items });
        self.http_client
            .post("list-items-steam", &params, Some(&body))
            .await
    }

    /// Items currently listed by the user - `GET /list-items-steam`
    pub async fn my_listed_items(&self, game: Game) -> Result<ListItemsResponse> {
        let params = QueryParams::new().push("game", game);
        self.http_client.get("list-items-steam", &params).await
    }

    /// Re-price listed items - `/edit-items`
    ///
    /// A price of zero removes the item from sale. Each item can be listed or
    /// edited twice per 120 seconds.
    pub async fn edit_items(
        &self,
        items: &[ListingRequest],
        game: Game,
    ) -> Result<EditItemsResponse> {
        let params = QueryParams::new().push("game", game);
        let body = serde_json::json!({ "items": items });
        self.http_client
            .post("edit-items", &params, Some(&body))
            .await
    }

    /// Remove listed items - `/remove-items`
    pub async fn remove_items(&self, item_ids: &[Id]) -> Result<RemoveItemsResponse> {
        let params = QueryParams::new().push_all("id", item_ids);
        self.http_client.get("remove-items", &params).await
    }

    /// Remove every listing, of one game or of all games - `/remove-all`
    pub async fn remove_all(&self, game: Option<Game>) -> Result<RemoveItemsResponse> {
        let params = QueryParams::new().push_opt("game", game);
        self.http_client.get("remove-all", &params).await
    }

    /// Trades that must be sent now - `/ready-to-transfer-p2p`
    ///
    /// Poll this at least once a minute when the trade socket connection is
    /// unreliable, so that no `send-trade` event is missed.
    pub async fn ready_to_transfer_p2p(&self, steam_api: &str) -> Result<serde_json::Value> {
        let params = QueryParams::new().push("steam_api", steam_api);
        self.http_client.get("ready-to-transfer-p2p", &params).await
    }
}
