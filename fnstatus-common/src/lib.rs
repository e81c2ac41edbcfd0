//! Wire model shared by the fnstatus crates.
//!
//! Mirrors the JSON served by the Epic Games status page (a Statuspage v2
//! API) and by the store's free-games promotions endpoint. Decoding is
//! lenient: absent or `null` fields take their default so one odd record
//! never fails a whole response.

mod de;
pub mod statuspage;
pub mod store;

pub use statuspage::{
    ComponentsResponse, CurrentStatusResponse, Impact, Incident, IncidentUpdate,
    IncidentsResponse, PageInfo, StatusComponent, StatusIndicator, SummaryResponse,
};
pub use store::{DiscountSetting, FreeGamesResponse, Game, OfferSet, PromotionOffer, Promotions};
