//! Injectable ticker taxonomy.
//!
//! A [`CategoryRegistry`] maps tickers to exposure categories and sector
//! labels. [`CategoryRegistry::standard`] ships the built-in tables for
//! widely held U.S. funds and large-cap stocks; [`CategoryRegistry::builder`]
//! starts from nothing, and [`CategoryRegistry::into_builder`] extends an
//! existing registry.

use super::IndividualStockHeuristic;
use crate::types::{Category, Sector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ticker lookup tables plus the optional individual-stock heuristic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRegistry {
    members: BTreeMap<Category, Vec<String>>,
    by_ticker: BTreeMap<String, BTreeSet<Category>>,
    sectors: BTreeMap<String, Sector>,
    heuristic: Option<IndividualStockHeuristic>,
}

impl CategoryRegistry {
    /// Starts an empty registry.
    #[must_use]
    pub fn builder() -> CategoryRegistryBuilder {
        CategoryRegistryBuilder::default()
    }

    /// Converts this registry back into a builder for extension.
    #[must_use]
    pub fn into_builder(self) -> CategoryRegistryBuilder {
        CategoryRegistryBuilder { registry: self }
    }

    /// Built-in tables with the individual-stock heuristic enabled.
    #[must_use]
    pub fn standard() -> Self {
        standard_builder().build()
    }

    /// Categories recorded for `ticker` (empty if unknown).
    #[must_use]
    pub fn categories_of(&self, ticker: &str) -> BTreeSet<Category> {
        self.by_ticker.get(ticker).cloned().unwrap_or_default()
    }

    /// Sector recorded for `ticker`, if any.
    #[must_use]
    pub fn sector_of(&self, ticker: &str) -> Option<Sector> {
        self.sectors.get(ticker).copied()
    }

    /// Returns true if the ticker appears in any table.
    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        self.by_ticker.contains_key(ticker) || self.sectors.contains_key(ticker)
    }

    /// Tickers listed under `category`, in registration order.
    #[must_use]
    pub fn tickers(&self, category: Category) -> &[String] {
        self.members.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories that have at least one ticker.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.members.keys().copied()
    }

    /// The fallback rule for unknown tickers, if enabled.
    #[must_use]
    pub fn heuristic(&self) -> Option<&IndividualStockHeuristic> {
        self.heuristic.as_ref()
    }

    /// Total number of distinct tickers known to the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_ticker.len()
    }

    /// Returns true if no ticker is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_ticker.is_empty()
    }
}

/// Builder for [`CategoryRegistry`].
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistryBuilder {
    registry: CategoryRegistry,
}

impl CategoryRegistryBuilder {
    /// Adds tickers to a category.
    ///
    /// Tickers without an explicit sector take the category's default sector.
    #[must_use]
    pub fn category<I, S>(mut self, category: Category, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ticker in tickers {
            let ticker = ticker.as_ref().trim().to_uppercase();
            let reg = &mut self.registry;
            let members = reg.members.entry(category).or_default();
            if !members.contains(&ticker) {
                members.push(ticker.clone());
            }
            reg.by_ticker
                .entry(ticker.clone())
                .or_default()
                .insert(category);
            reg.sectors
                .entry(ticker)
                .or_insert_with(|| category.default_sector());
        }
        self
    }

    /// Registers known individual stocks for a sector.
    #[must_use]
    pub fn stocks<I, S>(self, sector: Sector, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tickers: Vec<String> = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .collect();
        self.sector(sector, tickers.iter())
            .category(Category::IndividualStock, tickers)
    }

    /// Sets the sector for tickers, overriding category defaults.
    #[must_use]
    pub fn sector<I, S>(mut self, sector: Sector, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ticker in tickers {
            self.registry
                .sectors
                .insert(ticker.as_ref().trim().to_uppercase(), sector);
        }
        self
    }

    /// Enables or disables the individual-stock heuristic.
    #[must_use]
    pub fn heuristic(mut self, heuristic: Option<IndividualStockHeuristic>) -> Self {
        self.registry.heuristic = heuristic;
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> CategoryRegistry {
        self.registry
    }
}

fn standard_builder() -> CategoryRegistryBuilder {
    CategoryRegistry::builder()
        .category(
            Category::BroadMarket,
            [
                "FZROX", "VTI", "VTSAX", "ITOT", "SPLG", "SCHB", "SPTM", "SWTSX", "FSKAX", "IWV",
            ],
        )
        .category(
            Category::Sp500Index,
            ["VOO", "SPY", "IVV", "FXAIX", "VFIAX", "SWPPX"],
        )
        .category(Category::Nasdaq100Index, ["QQQ", "QQQM"])
        .category(
            Category::BondAggregateUs,
            ["BND", "AGG", "FBND", "SCHZ", "FXNAX", "VBTLX", "SPAB", "IUSB"],
        )
        .category(Category::BondGlobal, ["BNDW", "BNDX", "IAGG", "BWX"])
        .category(
            Category::TreasuryShort,
            ["SGOV", "SHV", "BIL", "SHY", "VGSH", "SCHO", "USFR", "TFLO"],
        )
        .category(Category::Tips, ["TIP", "SCHP", "VTIP", "STIP"])
        .category(
            Category::InternationalEquity,
            [
                "VXUS", "IXUS", "VEA", "VWO", "IEFA", "IEMG", "EFA", "EEM", "FTIHX", "FZILX",
                "SCHF", "VTIAX",
            ],
        )
        .category(
            Category::DividendFactor,
            ["SCHD", "VYM", "DVY", "HDV", "DGRO", "VIG", "NOBL", "SDY", "SPYD"],
        )
        .category(Category::QualityFactor, ["QUAL", "SPHQ", "JQUA", "QUS"])
        .category(Category::Gold, ["GLD", "IAU", "GLDM", "SGOL", "BAR", "AAAU"])
        .category(
            Category::RealEstate,
            ["VNQ", "SCHH", "XLRE", "IYR", "USRT", "FREL"],
        )
        .category(
            Category::Commodity,
            ["DBC", "PDBC", "GSG", "COMT", "DJP", "BCI"],
        )
        .category(
            Category::SectorEtf(Sector::Technology),
            ["XLK", "VGT", "FTEC", "IYW", "SMH", "SOXX", "IGV"],
        )
        .category(
            Category::SectorEtf(Sector::Healthcare),
            ["XLV", "VHT", "FHLC", "IYH", "IBB", "XBI"],
        )
        .category(
            Category::SectorEtf(Sector::Finance),
            ["XLF", "VFH", "FNCL", "IYF", "KBE", "KRE"],
        )
        .category(Category::SectorEtf(Sector::Energy), ["XLE", "VDE", "FENY"])
        .category(
            Category::SectorEtf(Sector::ConsumerDiscretionary),
            ["XLY", "VCR"],
        )
        .category(Category::SectorEtf(Sector::ConsumerStaples), ["XLP", "VDC"])
        .category(Category::SectorEtf(Sector::Industrials), ["XLI", "VIS"])
        .category(Category::SectorEtf(Sector::Utilities), ["XLU", "VPU"])
        .category(Category::SectorEtf(Sector::Materials), ["XLB", "VAW"])
        .category(Category::SectorEtf(Sector::Communication), ["XLC", "VOX"])
        .stocks(
            Sector::Technology,
            [
                "AAPL", "MSFT", "NVDA", "GOOGL", "GOOG", "META", "AVGO", "ORCL", "CRM", "ADBE",
                "AMD", "INTC", "CSCO", "QCOM", "TXN", "IBM",
            ],
        )
        .stocks(
            Sector::Healthcare,
            [
                "JNJ", "UNH", "PFE", "MRK", "ABBV", "LLY", "TMO", "ABT", "AMGN", "CVS", "BMY",
            ],
        )
        .stocks(
            Sector::Finance,
            [
                "JPM", "BAC", "WFC", "GS", "MS", "C", "BRK.A", "BRK.B", "V", "MA", "AXP", "SCHW",
                "BLK",
            ],
        )
        .stocks(Sector::Energy, ["XOM", "CVX", "COP", "SLB"])
        .stocks(Sector::ConsumerStaples, ["PG", "KO", "PEP", "WMT", "COST"])
        .stocks(
            Sector::ConsumerDiscretionary,
            ["AMZN", "TSLA", "HD", "MCD", "NKE", "SBUX"],
        )
        .stocks(Sector::Industrials, ["CAT", "BA", "GE", "HON", "UPS"])
        .stocks(Sector::Utilities, ["NEE", "DUK", "SO"])
        .stocks(Sector::Communication, ["DIS", "VZ", "T", "CMCSA"])
        .heuristic(Some(IndividualStockHeuristic::default()))
}
