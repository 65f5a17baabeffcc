//! Shelf geometry.

use super::product::Product;
use crate::error::ValidationError;

/// Eye-level score at or above which a shelf counts as eye level.
pub const EYE_LEVEL_THRESHOLD: f64 = 0.8;

/// Merchandising role of a shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShelfType {
    Storage,
    #[default]
    Standard,
    Premium,
    Promotional,
}

/// One physical shelf of a fixture.
///
/// The shelf itself is immutable; occupancy during a run is tracked by
/// a [`ShelfLedger`](crate::tracker::ShelfLedger).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shelf {
    pub id: u32,
    pub name: String,
    /// Usable width in cm.
    pub width: f64,
    /// Clearance height in cm.
    pub height: f64,
    /// Depth in cm.
    pub depth: f64,
    /// Height of the shelf above the floor in cm.
    pub y_position: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shelf_type: ShelfType,
    /// Visibility weight in [0, 1]; 1 is perfect eye level.
    pub eye_level_score: f64,
}

impl Shelf {
    /// Creates a standard shelf.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        width: f64,
        height: f64,
        depth: f64,
        eye_level_score: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            depth,
            y_position: 0.0,
            shelf_type: ShelfType::Standard,
            eye_level_score,
        }
    }

    pub fn with_y_position(mut self, y: f64) -> Self {
        self.y_position = y;
        self
    }

    pub fn with_shelf_type(mut self, shelf_type: ShelfType) -> Self {
        self.shelf_type = shelf_type;
        self
    }

    pub fn is_eye_level(&self) -> bool {
        self.eye_level_score >= EYE_LEVEL_THRESHOLD
    }

    pub fn is_premium(&self) -> bool {
        matches!(self.shelf_type, ShelfType::Premium | ShelfType::Promotional)
    }

    /// Whether the product's height and depth fit under and on this shelf.
    pub fn fits_dimensions(&self, product: &Product) -> bool {
        product.height <= self.height && product.depth <= self.depth
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidShelfField {
                    shelf_id: self.id,
                    field,
                    value,
                });
            }
        }
        if !self.y_position.is_finite() {
            return Err(ValidationError::InvalidShelfField {
                shelf_id: self.id,
                field: "y_position",
                value: self.y_position,
            });
        }
        if !(0.0..=1.0).contains(&self.eye_level_score) {
            return Err(ValidationError::InvalidEyeLevel {
                shelf_id: self.id,
                value: self.eye_level_score,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_level_and_premium() {
        let shelf = Shelf::new(2, "Eye Level", 150.0, 30.0, 35.0, 0.9)
            .with_shelf_type(ShelfType::Premium);
        assert!(shelf.is_eye_level());
        assert!(shelf.is_premium());

        let low = Shelf::new(0, "Bottom", 150.0, 35.0, 40.0, 0.2);
        assert!(!low.is_eye_level());
        assert!(!low.is_premium());
    }

    #[test]
    fn test_fits_dimensions() {
        let shelf = Shelf::new(0, "S", 100.0, 20.0, 10.0, 0.5);
        assert!(shelf.fits_dimensions(&Product::new("a", "case", 8.0, 12.0, 2.0)));
        assert!(!shelf.fits_dimensions(&Product::new("b", "case", 8.0, 25.0, 2.0)));
        assert!(!shelf.fits_dimensions(&Product::new("c", "case", 8.0, 12.0, 11.0)));
    }

    #[test]
    fn test_validate_bad_eye_level() {
        let shelf = Shelf::new(1, "S", 100.0, 20.0, 10.0, 1.2);
        assert!(matches!(
            shelf.validate(),
            Err(ValidationError::InvalidEyeLevel { shelf_id: 1, .. })
        ));
    }

    #[test]
    fn test_validate_zero_width() {
        let shelf = Shelf::new(1, "S", 0.0, 20.0, 10.0, 0.5);
        assert!(shelf.validate().is_err());
    }
}
