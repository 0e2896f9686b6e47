//! Exposure categories and sector labels.
//!
//! Two independent classification axes:
//!
//! - [`Category`]: a closed taxonomy of market-exposure tags. A holding may
//!   carry several at once (e.g. a fund that is both broad-market and
//!   dividend-tilted in a custom registry).
//! - [`Sector`]: a single descriptive label used for aggregate sector-weight
//!   reporting and the risk scorer's concentration measures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SECTOR
// =============================================================================

/// Descriptive sector label for a holding.
///
/// Funds that do not map to a GICS-like sector carry a fund-level label
/// (`BroadMarket`, `International`, `FixedIncome`, `Commodities`).
/// Unknown tickers default to [`Sector::Other`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Sector {
    /// Information technology.
    Technology,
    /// Healthcare and biotech.
    Healthcare,
    /// Banks, insurers, payment networks.
    Finance,
    /// Oil, gas and energy equipment.
    Energy,
    /// Consumer discretionary.
    ConsumerDiscretionary,
    /// Consumer staples.
    ConsumerStaples,
    /// Industrials.
    Industrials,
    /// Utilities.
    Utilities,
    /// Materials.
    Materials,
    /// Communication services.
    Communication,
    /// Real estate / REITs.
    RealEstate,
    /// Total-market and large-cap index funds.
    BroadMarket,
    /// Non-U.S. equity.
    International,
    /// Bonds and bills.
    FixedIncome,
    /// Gold and broad commodities.
    Commodities,
    /// Unknown or unclassified.
    #[default]
    Other,
}

impl Sector {
    /// Sectors that have a sector-ETF + individual-stock cluster rule.
    pub const CLUSTERED: [Sector; 3] = [Sector::Technology, Sector::Healthcare, Sector::Finance];

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Healthcare => "Healthcare",
            Self::Finance => "Finance",
            Self::Energy => "Energy",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Industrials => "Industrials",
            Self::Utilities => "Utilities",
            Self::Materials => "Materials",
            Self::Communication => "Communication",
            Self::RealEstate => "Real Estate",
            Self::BroadMarket => "Broad Market",
            Self::International => "International",
            Self::FixedIncome => "Fixed Income",
            Self::Commodities => "Commodities",
            Self::Other => "Other",
        }
    }

    /// Returns the kebab-case identifier used in category tags.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Healthcare => "healthcare",
            Self::Finance => "finance",
            Self::Energy => "energy",
            Self::ConsumerDiscretionary => "consumer-discretionary",
            Self::ConsumerStaples => "consumer-staples",
            Self::Industrials => "industrials",
            Self::Utilities => "utilities",
            Self::Materials => "materials",
            Self::Communication => "communication",
            Self::RealEstate => "real-estate",
            Self::BroadMarket => "broad-market",
            Self::International => "international",
            Self::FixedIncome => "fixed-income",
            Self::Commodities => "commodities",
            Self::Other => "other",
        }
    }

    /// All sectors, in declaration order.
    #[must_use]
    pub fn all() -> &'static [Sector] {
        &[
            Self::Technology,
            Self::Healthcare,
            Self::Finance,
            Self::Energy,
            Self::ConsumerDiscretionary,
            Self::ConsumerStaples,
            Self::Industrials,
            Self::Utilities,
            Self::Materials,
            Self::Communication,
            Self::RealEstate,
            Self::BroadMarket,
            Self::International,
            Self::FixedIncome,
            Self::Commodities,
            Self::Other,
        ]
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::all()
            .iter()
            .copied()
            .find(|sector| sector.slug() == needle)
            .ok_or_else(|| format!("unknown sector: {s}"))
    }
}

// =============================================================================
// CATEGORY
// =============================================================================

/// Market-exposure category tag.
///
/// Serialized as its kebab-case tag, e.g. `broad-market` or
/// `sector-etf:technology`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Category {
    /// Total U.S. market funds.
    BroadMarket,
    /// S&P 500 trackers.
    Sp500Index,
    /// Nasdaq-100 trackers.
    Nasdaq100Index,
    /// U.S. aggregate bond funds.
    BondAggregateUs,
    /// Global (ex-U.S. or total world) bond funds.
    BondGlobal,
    /// Short-term treasury / T-bill funds.
    TreasuryShort,
    /// Inflation-protected treasuries.
    Tips,
    /// Non-U.S. equity funds.
    InternationalEquity,
    /// Dividend-factor funds.
    DividendFactor,
    /// Quality-factor funds.
    QualityFactor,
    /// Single-sector ETF.
    SectorEtf(Sector),
    /// A single company's stock.
    IndividualStock,
    /// Physical gold funds.
    Gold,
    /// REIT funds.
    RealEstate,
    /// Broad commodity funds.
    Commodity,
}

impl Category {
    /// Categories eligible for same-category duplication findings, in rule order.
    pub const DUPLICATION_CHECKED: [Category; 10] = [
        Category::BroadMarket,
        Category::Sp500Index,
        Category::Nasdaq100Index,
        Category::BondAggregateUs,
        Category::InternationalEquity,
        Category::DividendFactor,
        Category::Gold,
        Category::RealEstate,
        Category::TreasuryShort,
        Category::Tips,
    ];

    /// Bond-like categories counted toward bond concentration.
    pub const BOND_LIKE: [Category; 4] = [
        Category::BondAggregateUs,
        Category::BondGlobal,
        Category::TreasuryShort,
        Category::Tips,
    ];

    /// Returns the kebab-case tag.
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::SectorEtf(sector) => format!("sector-etf:{}", sector.slug()),
            other => other.simple_tag().to_string(),
        }
    }

    fn simple_tag(&self) -> &'static str {
        match self {
            Self::BroadMarket => "broad-market",
            Self::Sp500Index => "sp500-index",
            Self::Nasdaq100Index => "nasdaq100-index",
            Self::BondAggregateUs => "bond-aggregate-us",
            Self::BondGlobal => "bond-global",
            Self::TreasuryShort => "treasury-short",
            Self::Tips => "tips",
            Self::InternationalEquity => "international-equity",
            Self::DividendFactor => "dividend-factor",
            Self::QualityFactor => "quality-factor",
            Self::SectorEtf(_) => "sector-etf",
            Self::IndividualStock => "individual-stock",
            Self::Gold => "gold",
            Self::RealEstate => "real-estate",
            Self::Commodity => "commodity",
        }
    }

    /// Returns a human-readable label for reports and findings.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::BroadMarket => "Broad Market Index Funds".to_string(),
            Self::Sp500Index => "S&P 500 Index Funds".to_string(),
            Self::Nasdaq100Index => "Nasdaq-100 Index Funds".to_string(),
            Self::BondAggregateUs => "U.S. Aggregate Bond Funds".to_string(),
            Self::BondGlobal => "Global Bond Funds".to_string(),
            Self::TreasuryShort => "Short-Term Treasury Funds".to_string(),
            Self::Tips => "TIPS Funds".to_string(),
            Self::InternationalEquity => "International Equity Funds".to_string(),
            Self::DividendFactor => "Dividend Funds".to_string(),
            Self::QualityFactor => "Quality Factor Funds".to_string(),
            Self::SectorEtf(sector) => format!("{} Sector ETFs", sector.label()),
            Self::IndividualStock => "Individual Stocks".to_string(),
            Self::Gold => "Gold Funds".to_string(),
            Self::RealEstate => "Real Estate (REIT) Funds".to_string(),
            Self::Commodity => "Commodity Funds".to_string(),
        }
    }

    /// Returns true for bond-like categories.
    #[must_use]
    pub fn is_bond(&self) -> bool {
        Self::BOND_LIKE.contains(self)
    }

    /// Returns true for equity categories (funds and single stocks).
    #[must_use]
    pub fn is_equity(&self) -> bool {
        matches!(
            self,
            Self::BroadMarket
                | Self::Sp500Index
                | Self::Nasdaq100Index
                | Self::InternationalEquity
                | Self::DividendFactor
                | Self::QualityFactor
                | Self::SectorEtf(_)
                | Self::IndividualStock
        )
    }

    /// Returns true for U.S. equity categories.
    #[must_use]
    pub fn is_us_equity(&self) -> bool {
        self.is_equity() && *self != Self::InternationalEquity
    }

    /// Sector label a fund in this category carries when no explicit sector is known.
    #[must_use]
    pub fn default_sector(&self) -> Sector {
        match self {
            Self::BroadMarket | Self::Sp500Index | Self::DividendFactor | Self::QualityFactor => {
                Sector::BroadMarket
            }
            Self::Nasdaq100Index => Sector::Technology,
            Self::BondAggregateUs | Self::BondGlobal | Self::TreasuryShort | Self::Tips => {
                Sector::FixedIncome
            }
            Self::InternationalEquity => Sector::International,
            Self::SectorEtf(sector) => *sector,
            Self::IndividualStock => Sector::Other,
            Self::Gold | Self::Commodity => Sector::Commodities,
            Self::RealEstate => Sector::RealEstate,
        }
    }

    /// Returns the sector for a sector-ETF category.
    #[must_use]
    pub fn sector_etf(&self) -> Option<Sector> {
        match self {
            Self::SectorEtf(sector) => Some(*sector),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        if let Some(sector) = tag.strip_prefix("sector-etf:") {
            return sector.parse().map(Self::SectorEtf);
        }
        let category = match tag.as_str() {
            "broad-market" => Self::BroadMarket,
            "sp500-index" => Self::Sp500Index,
            "nasdaq100-index" => Self::Nasdaq100Index,
            "bond-aggregate-us" => Self::BondAggregateUs,
            "bond-global" => Self::BondGlobal,
            "treasury-short" => Self::TreasuryShort,
            "tips" => Self::Tips,
            "international-equity" => Self::InternationalEquity,
            "dividend-factor" => Self::DividendFactor,
            "quality-factor" => Self::QualityFactor,
            "individual-stock" => Self::IndividualStock,
            "gold" => Self::Gold,
            "real-estate" => Self::RealEstate,
            "commodity" => Self::Commodity,
            _ => return Err(format!("unknown category: {s}")),
        };
        Ok(category)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.tag()
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags() {
        assert_eq!(Category::BroadMarket.tag(), "broad-market");
        assert_eq!(
            Category::SectorEtf(Sector::Technology).tag(),
            "sector-etf:technology"
        );
        assert_eq!(
            "sector-etf:healthcare".parse::<Category>().unwrap(),
            Category::SectorEtf(Sector::Healthcare)
        );
        assert!("sector-etf:crypto".parse::<Category>().is_err());
        assert!("hedge-fund".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::SectorEtf(Sector::ConsumerStaples)).unwrap();
        assert_eq!(json, "\"sector-etf:consumer-staples\"");

        let parsed: Category = serde_json::from_str("\"bond-aggregate-us\"").unwrap();
        assert_eq!(parsed, Category::BondAggregateUs);
    }

    #[test]
    fn test_bond_and_equity_flags() {
        for category in Category::BOND_LIKE {
            assert!(category.is_bond());
            assert!(!category.is_equity());
        }
        assert!(Category::IndividualStock.is_us_equity());
        assert!(Category::InternationalEquity.is_equity());
        assert!(!Category::InternationalEquity.is_us_equity());
        assert!(!Category::Gold.is_equity());
    }

    #[test]
    fn test_sector_parse_and_display() {
        assert_eq!("Real Estate".parse::<Sector>().unwrap(), Sector::RealEstate);
        assert_eq!("consumer_staples".parse::<Sector>().unwrap(), Sector::ConsumerStaples);
        assert_eq!(Sector::FixedIncome.to_string(), "Fixed Income");
        assert_eq!(Sector::default(), Sector::Other);
    }
}
