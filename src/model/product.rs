//! Accessory product records.

use crate::error::ValidationError;

/// A retail accessory as seen by the placement engine.
///
/// Products are read-only for the duration of a run; the engine only
/// produces [`Placement`](crate::tracker::Placement)s that reference them
/// by id.
///
/// # Examples
///
/// ```
/// use u_planogram::model::Product;
///
/// let case = Product::new("IP16_CASE_CLR", "case", 8.0, 12.0, 2.0)
///     .with_name("iPhone 16 Clear Case")
///     .with_sales_velocity(6.4)
///     .with_price(39.0)
///     .with_attach_rate(0.35);
/// assert!(case.validate().is_ok());
/// assert_eq!(case.margin(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    /// Unique product id (SKU).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Accessory category (`case`, `cable`, `charger`, ...).
    pub category: String,

    /// Width of one facing in cm.
    pub width: f64,

    /// Height in cm.
    pub height: f64,

    /// Depth in cm.
    pub depth: f64,

    /// Average units sold per day.
    pub sales_velocity: f64,

    /// Unit price.
    pub price: f64,

    /// Profit margin per unit, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub profit_margin: Option<f64>,

    /// Probability in [0, 1] that a core-device buyer also buys this item.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attach_rate: Option<f64>,

    /// Compatibility tags, e.g. device models.
    #[cfg_attr(feature = "serde", serde(default))]
    pub compatibility: Vec<String>,

    /// Product-level facing cap, applied on top of the store rule.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_facings: Option<u32>,
}

impl Product {
    /// Creates a product with the given footprint and no sales data.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        width: f64,
        height: f64,
        depth: f64,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category: category.into(),
            width,
            height,
            depth,
            sales_velocity: 0.0,
            price: 0.0,
            profit_margin: None,
            attach_rate: None,
            compatibility: Vec::new(),
            max_facings: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sales_velocity(mut self, units_per_day: f64) -> Self {
        self.sales_velocity = units_per_day;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_profit_margin(mut self, margin: f64) -> Self {
        self.profit_margin = Some(margin);
        self
    }

    pub fn with_attach_rate(mut self, rate: f64) -> Self {
        self.attach_rate = Some(rate);
        self
    }

    pub fn with_compatibility(mut self, tag: impl Into<String>) -> Self {
        self.compatibility.push(tag.into());
        self
    }

    pub fn with_max_facings(mut self, n: u32) -> Self {
        self.max_facings = Some(n);
        self
    }

    /// Profit margin, `0.0` when absent.
    pub fn margin(&self) -> f64 {
        self.profit_margin.unwrap_or(0.0)
    }

    /// Attach rate, `0.0` when absent.
    pub fn attach(&self) -> f64 {
        self.attach_rate.unwrap_or(0.0)
    }

    /// Shelf footprint area (width × depth) in cm².
    pub fn footprint_area(&self) -> f64 {
        self.width * self.depth
    }

    /// Checks that every numeric field is usable by the engine.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyProductId);
        }

        let positive = [("width", self.width), ("depth", self.depth)];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(self.field_error(field, value));
            }
        }

        let non_negative = [
            ("height", self.height),
            ("sales_velocity", self.sales_velocity),
            ("price", self.price),
            ("profit_margin", self.margin()),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(self.field_error(field, value));
            }
        }

        if let Some(rate) = self.attach_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ValidationError::InvalidAttachRate {
                    product_id: self.id.clone(),
                    value: rate,
                });
            }
        }

        Ok(())
    }

    fn field_error(&self, field: &'static str, value: f64) -> ValidationError {
        ValidationError::InvalidProductField {
            product_id: self.id.clone(),
            field,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cable() -> Product {
        Product::new("CABLE_USB_1M", "cable", 5.0, 15.0, 3.0)
            .with_sales_velocity(12.0)
            .with_price(19.0)
    }

    #[test]
    fn test_defaults_for_missing_data() {
        let p = cable();
        assert_eq!(p.name, "CABLE_USB_1M");
        assert_eq!(p.margin(), 0.0);
        assert_eq!(p.attach(), 0.0);
        assert!((p.footprint_area() - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_ok() {
        assert!(cable().with_attach_rate(0.4).validate().is_ok());
    }

    #[test]
    fn test_validate_empty_id() {
        let p = Product::new("  ", "cable", 5.0, 15.0, 3.0);
        assert_eq!(p.validate(), Err(ValidationError::EmptyProductId));
    }

    #[test]
    fn test_validate_zero_width() {
        let p = Product::new("X", "cable", 0.0, 15.0, 3.0);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::InvalidProductField { field: "width", .. })
        ));
    }

    #[test]
    fn test_validate_negative_velocity() {
        let p = cable().with_sales_velocity(-1.0);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::InvalidProductField {
                field: "sales_velocity",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_nan_price() {
        let p = cable().with_price(f64::NAN);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_attach_rate_range() {
        let p = cable().with_attach_rate(1.5);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::InvalidAttachRate { .. })
        ));
    }
}
