//! Domain Normalizers
//!
//! Six independent, total functions turning a raw domain snapshot into a
//! fixed-shape overview. An absent snapshot yields the overview's zero value.

pub mod currency;
pub mod events;
pub mod market;
pub mod news;
pub mod traffic;
pub mod weather;

pub use currency::CurrencySnapshot;
pub use events::EventsSnapshot;
pub use market::MarketSnapshot;
pub use news::NewsSnapshot;
pub use traffic::TrafficSnapshot;
pub use weather::WeatherSnapshot;
