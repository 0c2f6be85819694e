use clap::ValueEnum;
use ratatui::style::Color;

use crate::geo::GeoPoint;

/// Center of the comparison region (Bucaramanga city center)
pub const MAP_CENTER: GeoPoint = GeoPoint::new(7.11935, -73.12274);

/// Total area of the comparison region in km²
pub const REFERENCE_AREA_KM2: f64 = 165.0;

/// Name of the comparison region used in tooltips
pub const REGION_NAME: &str = "Bucaramanga";

/// Named colors used by the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteColor {
    Orange,
    Green,
    Blue,
    Gray,
    Red,
    Purple,
    Black,
}

impl PaletteColor {
    /// CSS color keyword, as written into exported GeoJSON
    pub fn css_name(self) -> &'static str {
        match self {
            PaletteColor::Orange => "orange",
            PaletteColor::Green => "green",
            PaletteColor::Blue => "blue",
            PaletteColor::Gray => "gray",
            PaletteColor::Red => "red",
            PaletteColor::Purple => "purple",
            PaletteColor::Black => "black",
        }
    }

    /// Terminal color for braille layers and bars
    pub fn terminal(self) -> Color {
        match self {
            PaletteColor::Orange => Color::Rgb(255, 165, 0),
            PaletteColor::Green => Color::Rgb(0, 160, 0),
            PaletteColor::Blue => Color::Rgb(40, 90, 255),
            PaletteColor::Gray => Color::Rgb(128, 128, 128),
            PaletteColor::Red => Color::Rgb(220, 30, 30),
            PaletteColor::Purple => Color::Rgb(150, 40, 170),
            // Pure black disappears on dark terminals
            PaletteColor::Black => Color::Rgb(70, 70, 70),
        }
    }
}

/// Land-area requirement of one generation technology
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TechnologyProfile {
    pub name: &'static str,
    pub area_km2: f64,
    pub color: PaletteColor,
}

/// The fixed technology catalog, in display order.
pub static CATALOG: [TechnologyProfile; 7] = [
    TechnologyProfile { name: "Solar Fotovoltaica ☀️", area_km2: 8.58, color: PaletteColor::Orange },
    TechnologyProfile { name: "Eólica 🌬️", area_km2: 21.55, color: PaletteColor::Green },
    TechnologyProfile { name: "Hidroeléctrica 💧", area_km2: 15.03, color: PaletteColor::Blue },
    TechnologyProfile { name: "Carbón 🪨", area_km2: 1.98, color: PaletteColor::Gray },
    TechnologyProfile { name: "Gas Natural 🔥", area_km2: 1.5, color: PaletteColor::Red },
    TechnologyProfile { name: "Diésel 🛢️", area_km2: 1.5, color: PaletteColor::Purple },
    TechnologyProfile { name: "Nuclear ☢️", area_km2: 2.02, color: PaletteColor::Black },
];

/// Catalog key. Variant order matches `CATALOG`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Technology {
    Solar,
    Wind,
    Hydro,
    Coal,
    NaturalGas,
    Diesel,
    Nuclear,
}

impl Technology {
    pub const ALL: [Technology; 7] = [
        Technology::Solar,
        Technology::Wind,
        Technology::Hydro,
        Technology::Coal,
        Technology::NaturalGas,
        Technology::Diesel,
        Technology::Nuclear,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn profile(self) -> &'static TechnologyProfile {
        &CATALOG[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Stable identifier used on the command line
    pub fn slug(self) -> &'static str {
        match self {
            Technology::Solar => "solar",
            Technology::Wind => "wind",
            Technology::Hydro => "hydro",
            Technology::Coal => "coal",
            Technology::NaturalGas => "natural-gas",
            Technology::Diesel => "diesel",
            Technology::Nuclear => "nuclear",
        }
    }
}

/// Share of the reference region covered by `area_km2`, in percent
#[inline]
pub fn percentage_of(area_km2: f64, reference_area_km2: f64) -> f64 {
    area_km2 / reference_area_km2 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_catalog_order_matches_enum() {
        assert_eq!(Technology::ALL.len(), CATALOG.len());
        for (i, tech) in Technology::ALL.iter().enumerate() {
            assert_eq!(tech.index(), i);
            assert_eq!(Technology::from_index(i), Some(*tech));
        }
        assert_eq!(Technology::from_index(7), None);
        assert_eq!(Technology::Wind.profile().area_km2, 21.55);
        assert_eq!(Technology::Nuclear.profile().color, PaletteColor::Black);
    }

    #[test]
    fn test_all_areas_positive() {
        assert!(CATALOG.iter().all(|p| p.area_km2 > 0.0));
        assert!(REFERENCE_AREA_KM2 > 0.0);
    }

    #[test]
    fn test_slug_matches_value_enum() {
        for tech in Technology::ALL {
            let parsed = Technology::from_str(tech.slug(), true).expect("slug parses");
            assert_eq!(parsed, tech);
        }
    }

    #[test]
    fn test_wind_percentage() {
        let pct = percentage_of(Technology::Wind.profile().area_km2, REFERENCE_AREA_KM2);
        assert_abs_diff_eq!(pct, 13.06, epsilon = 0.01);
    }
}
