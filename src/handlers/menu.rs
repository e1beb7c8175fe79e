//! Read-only restaurant menu.
//!
//! The menu document lives in the record store at `catalog/menu`, that is
//! `{data_dir}/catalog/menu.json`. Deployments that kept it at the data
//! directory root (`{data_dir}/menu.json`) must move it into `catalog/`
//! before upgrading. It is read once per process.
//!
//! Items and categories are addressed by numeric id or by alias. Only GET is
//! served; every other verb, and a menu that cannot be loaded, answers 404.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::handlers::{Endpoint, HandlerContext};
use crate::http::{HandlerResponse, RequestData, Verb};
use crate::store::StoreError;

pub const MENU_COLLECTION: &str = "catalog";
pub const MENU_KEY: &str = "menu";

pub const ROUTES: &[(&str, Endpoint)] = &[
    ("menu", Endpoint::Menu),
    ("menu/categories", Endpoint::Menu),
    ("menu/category/{category}", Endpoint::Menu),
    ("menu/item/{item}", Endpoint::Menu),
];

/// The stored menu document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub categories: Vec<MenuEntry>,
    #[serde(default)]
    pub items: Vec<MenuEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An item or category. Fields beyond `id` and `alias` are passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(u64),
    Text(String),
}

impl MenuEntry {
    /// True when `wanted` names this entry by id or alias.
    pub fn is_named(&self, wanted: &str) -> bool {
        let by_id = match &self.id {
            EntryId::Number(n) => wanted.parse::<u64>().is_ok_and(|w| w == *n),
            EntryId::Text(s) => s == wanted,
        };
        by_id || self.alias.as_deref() == Some(wanted)
    }
}

impl Menu {
    pub fn item(&self, wanted: &str) -> Option<&MenuEntry> {
        self.items.iter().find(|entry| entry.is_named(wanted))
    }

    pub fn category(&self, wanted: &str) -> Option<&MenuEntry> {
        self.categories.iter().find(|entry| entry.is_named(wanted))
    }
}

async fn load(ctx: &HandlerContext) -> Result<&Menu, StoreError> {
    ctx.menu
        .get_or_load(move || async move {
            tracing::info!(collection = MENU_COLLECTION, key = MENU_KEY, "Loading menu");
            ctx.store.read_as::<Menu>(MENU_COLLECTION, MENU_KEY).await
        })
        .await
}

pub async fn menu(request: &RequestData, ctx: &HandlerContext) -> HandlerResponse {
    if request.method != Verb::Get {
        return HandlerResponse::not_found();
    }

    let menu = match load(ctx).await {
        Ok(menu) => menu,
        Err(e) => {
            ctx.logger.error(json!({
                "message": "menu unavailable",
                "kind": e.kind().as_str(),
                "error": e.to_string(),
            }));
            return HandlerResponse::not_found();
        }
    };

    let found = if let Some(item) = request.param("item") {
        menu.item(item).map(to_value)
    } else if request.path == "menu/categories" {
        Some(to_value(&menu.categories))
    } else if let Some(category) = request.param("category") {
        menu.category(category).map(to_value)
    } else {
        Some(to_value(&menu.items))
    };

    match found {
        Some(body) => HandlerResponse::ok(body),
        None => HandlerResponse::not_found(),
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
