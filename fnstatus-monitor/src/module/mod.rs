pub mod fetcher;
pub mod incident;
pub mod promo;
pub mod renderer;
pub mod report;
pub mod scheduled;
pub mod status;
pub mod text;
