//! Query presets and the commodity → (sector, group) lookup.
//!
//! The presets describe the slices of QuickStats we actually work with. The
//! lookup table is derived from the same lists so the collated metadata is
//! labelled consistently with what was fetched.

use std::collections::HashMap;

use clap::ValueEnum;

use crate::domain::QueryFilter;

pub const UNKNOWN: &str = "UNKNOWN";

pub const CROP_CORE_STATS: &[&str] = &[
    "AREA PLANTED",
    "AREA HARVESTED",
    "YIELD",
    "PRODUCTION",
    "PRICE RECEIVED",
    "CONDITION",
];

pub const CORE_CROPS: &[&str] = &[
    "CORN",
    "SOYBEANS",
    "WHEAT",
    "COTTON",
    "RICE",
    "OATS",
    "BARLEY",
    "SORGHUM",
    "PEANUTS",
    "SUGARBEETS",
    "TOBACCO",
    "HAY",
];

/// Starting points for `--preset animals`; pass explicit lists for anything else.
pub const LIVESTOCK_CORE_STATS: &[&str] = &["INVENTORY", "PRICE RECEIVED", "SALES"];

pub const CORE_LIVESTOCK: &[&str] = &["CATTLE", "HOGS", "SHEEP", "GOATS"];

/// A named base filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Preset {
    /// Survey field crops at county level.
    Crops,
    /// Survey livestock at county level.
    Animals,
    /// Survey economics at state level.
    Economics,
}

impl Preset {
    pub fn filter(self) -> QueryFilter {
        match self {
            Preset::Crops => crops_base(),
            Preset::Animals => animals_base(),
            Preset::Economics => economics_base(),
        }
    }

    /// Commodities a report runs over when none are named explicitly.
    pub fn commodities(self) -> &'static [&'static str] {
        match self {
            Preset::Crops => CORE_CROPS,
            Preset::Animals => CORE_LIVESTOCK,
            Preset::Economics => &[],
        }
    }

    /// Statistics checked by per-commodity unit reports.
    pub fn core_stats(self) -> &'static [&'static str] {
        match self {
            Preset::Crops => CROP_CORE_STATS,
            Preset::Animals => LIVESTOCK_CORE_STATS,
            Preset::Economics => &[],
        }
    }
}

pub fn crops_base() -> QueryFilter {
    QueryFilter::from_pairs([
        ("source_desc", "SURVEY"),
        ("sector_desc", "CROPS"),
        ("group_desc", "FIELD CROPS"),
        ("agg_level_desc", "COUNTY"),
    ])
}

pub fn animals_base() -> QueryFilter {
    QueryFilter::from_pairs([
        ("source_desc", "SURVEY"),
        ("sector_desc", "ANIMALS & PRODUCTS"),
        ("group_desc", "LIVESTOCK"),
        ("agg_level_desc", "COUNTY"),
    ])
}

pub fn economics_base() -> QueryFilter {
    QueryFilter::from_pairs([
        ("source_desc", "SURVEY"),
        ("sector_desc", "ECONOMICS"),
        ("agg_level_desc", "STATE"),
    ])
}

/// Sector and group for a commodity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub sector: String,
    pub group: String,
}

/// Uppercased commodity name → sector/group.
#[derive(Debug, Clone, Default)]
pub struct CommodityLookup {
    entries: HashMap<String, Classification>,
}

impl CommodityLookup {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table built from the crop and livestock presets.
    pub fn from_presets() -> Self {
        let mut lookup = Self::empty();
        for commodity in CORE_CROPS {
            lookup.insert(commodity, "CROPS", "FIELD CROPS");
        }
        for commodity in CORE_LIVESTOCK {
            lookup.insert(commodity, "ANIMALS & PRODUCTS", "LIVESTOCK");
        }
        lookup
    }

    pub fn insert(&mut self, commodity: &str, sector: &str, group: &str) {
        self.entries.insert(
            commodity.trim().to_uppercase(),
            Classification {
                sector: sector.to_string(),
                group: group.to_string(),
            },
        );
    }

    /// Sector/group for `commodity`, or `UNKNOWN`/`UNKNOWN` when unmapped.
    pub fn classify(&self, commodity: &str) -> Classification {
        self.entries
            .get(&commodity.trim().to_uppercase())
            .cloned()
            .unwrap_or_else(|| Classification {
                sector: UNKNOWN.to_string(),
                group: UNKNOWN.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
