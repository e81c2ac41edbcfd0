//! Store `freeGamesPromotions` payload

use serde::{Deserialize, Serialize};

use crate::de::{lenient, lenient_int, lenient_vec, nullable};

/// Top level of the promotions response:
/// `data.Catalog.searchStore.elements[]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreeGamesResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub data: CatalogData,
}

impl FreeGamesResponse {
    pub fn games(&self) -> &[Game] {
        &self.data.catalog.search_store.elements
    }

    pub fn into_games(self) -> Vec<Game> {
        self.data.catalog.search_store.elements
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default, rename = "Catalog", deserialize_with = "nullable")]
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, rename = "searchStore", deserialize_with = "nullable")]
    pub search_store: SearchStore,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStore {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub elements: Vec<Game>,
}

/// One catalog element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    /// `None` when the field is absent or `null`
    #[serde(default, deserialize_with = "lenient")]
    pub promotions: Option<Promotions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotions {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub promotional_offers: Vec<OfferSet>,
    #[serde(default, rename = "upcomingPromotionalOffers", deserialize_with = "lenient_vec")]
    pub upcoming_offers: Vec<OfferSet>,
}

impl Promotions {
    pub fn is_empty(&self) -> bool {
        self.promotional_offers.is_empty() && self.upcoming_offers.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferSet {
    #[serde(default, rename = "promotionalOffers", deserialize_with = "lenient_vec")]
    pub offers: Vec<PromotionOffer>,
}

/// A time-bounded discount record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionOffer {
    #[serde(default, deserialize_with = "lenient")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub discount_setting: Option<DiscountSetting>,
}

impl PromotionOffer {
    /// Discount percentage; a missing setting counts as 0.
    pub fn discount_percentage(&self) -> i64 {
        self.discount_setting
            .as_ref()
            .and_then(|s| s.discount_percentage)
            .unwrap_or(0)
    }

    /// A 0% discount denotes a free item.
    pub fn is_free(&self) -> bool {
        self.discount_percentage() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSetting {
    #[serde(default, deserialize_with = "lenient")]
    pub discount_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub discount_percentage: Option<i64>,
}
