//! Discrete weight classes and variant slots.
//!
//! Every family owns a fixed table with one slot per (weight class, italic)
//! pair. Requests for a numeric weight are snapped to the nearest class,
//! and empty slots are substituted with the nearest populated one.

/// Nine-step weight ladder (100..=900).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl FontWeight {
    pub const COUNT: usize = 9;

    pub const ALL: [FontWeight; Self::COUNT] = [
        FontWeight::Thin,
        FontWeight::ExtraLight,
        FontWeight::Light,
        FontWeight::Regular,
        FontWeight::Medium,
        FontWeight::SemiBold,
        FontWeight::Bold,
        FontWeight::ExtraBold,
        FontWeight::Black,
    ];

    /// Position on the ladder, 0 for Thin.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Numeric weight (100 for Thin .. 900 for Black).
    pub fn to_number(self) -> u16 {
        (self as u16 + 1) * 100
    }

    /// Nearest weight class for a numeric weight.
    ///
    /// Out-of-range values clamp to the ends of the ladder. A value exactly
    /// between two classes snaps to the lighter one (550 -> Medium).
    pub fn from_number(weight: u16) -> Self {
        let clamped = weight.clamp(100, 900);
        let step = (clamped - 100 + 49) / 100;
        Self::ALL[usize::from(step)]
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            FontWeight::Thin => "Thin",
            FontWeight::ExtraLight => "ExtraLight",
            FontWeight::Light => "Light",
            FontWeight::Regular => "Regular",
            FontWeight::Medium => "Medium",
            FontWeight::SemiBold => "SemiBold",
            FontWeight::Bold => "Bold",
            FontWeight::ExtraBold => "ExtraBold",
            FontWeight::Black => "Black",
        }
    }
}

impl std::fmt::Display for FontWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One slot of a family's variant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontVariant {
    pub weight: FontWeight,
    pub italic: bool,
}

impl FontVariant {
    /// Number of slots in a family's variant table.
    pub const COUNT: usize = FontWeight::COUNT * 2;

    pub fn new(weight: FontWeight, italic: bool) -> Self {
        Self { weight, italic }
    }

    /// Variant for a numeric weight.
    pub fn from_weight(weight: u16, italic: bool) -> Self {
        Self::new(FontWeight::from_number(weight), italic)
    }

    /// Slot index in the variant table.
    pub fn index(self) -> usize {
        self.weight.index() * 2 + usize::from(self.italic)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        let weight = *FontWeight::ALL.get(index / 2)?;
        Some(Self::new(weight, index % 2 == 1))
    }

    /// All slots in table order.
    pub fn all() -> impl Iterator<Item = FontVariant> {
        (0..Self::COUNT).filter_map(Self::from_index)
    }

    /// Ordering key for substituting `candidate` when `self` was requested.
    ///
    /// Smaller is better: weight distance first, then italic mismatch, then
    /// the lighter candidate wins remaining ties.
    pub fn distance(self, candidate: FontVariant) -> (u16, bool, u16) {
        let requested = self.weight.to_number();
        let offered = candidate.weight.to_number();
        (
            requested.abs_diff(offered),
            self.italic != candidate.italic,
            offered,
        )
    }
}

impl std::fmt::Display for FontVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.italic {
            write!(f, "{} Italic", self.weight)
        } else {
            write!(f, "{}", self.weight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_numbers_round_trip() {
        for weight in FontWeight::ALL {
            assert_eq!(FontWeight::from_number(weight.to_number()), weight);
        }
    }

    #[test]
    fn test_weight_snaps_to_nearest_and_ties_go_lighter() {
        assert_eq!(FontWeight::from_number(0), FontWeight::Thin);
        assert_eq!(FontWeight::from_number(350), FontWeight::Light);
        assert_eq!(FontWeight::from_number(351), FontWeight::Regular);
        assert_eq!(FontWeight::from_number(550), FontWeight::Medium);
        assert_eq!(FontWeight::from_number(1000), FontWeight::Black);
    }

    #[test]
    fn test_variant_index_is_dense_and_unique() {
        let indices: Vec<usize> = FontVariant::all().map(FontVariant::index).collect();
        assert_eq!(indices, (0..FontVariant::COUNT).collect::<Vec<_>>());
        assert_eq!(
            FontVariant::from_index(13),
            Some(FontVariant::new(FontWeight::Bold, true))
        );
        assert_eq!(FontVariant::from_index(FontVariant::COUNT), None);
    }

    #[test]
    fn test_distance_prefers_weight_then_italic_then_lighter() {
        let request = FontVariant::new(FontWeight::SemiBold, false);
        let regular = FontVariant::new(FontWeight::Regular, false);
        let extra_bold = FontVariant::new(FontWeight::ExtraBold, false);
        let semibold_italic = FontVariant::new(FontWeight::SemiBold, true);

        // Equal weight distance: the lighter candidate wins.
        assert!(request.distance(regular) < request.distance(extra_bold));
        // Weight distance outranks italic mismatch.
        assert!(request.distance(semibold_italic) < request.distance(regular));
    }
}
