//! QuickStats access: transport, client, bulk downloads and query presets.

pub mod bulk;
pub mod presets;
pub mod quickstats;
pub mod transport;

pub use bulk::fetch_data;
pub use presets::{CommodityLookup, Preset};
pub use quickstats::{QuickStatsClient, ResponseFormat};
pub use transport::{HttpResponse, HttpTransport, Transport};
