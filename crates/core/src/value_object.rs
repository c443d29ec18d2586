//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute
/// values are interchangeable. Computed amounts and totals are value objects;
/// they are replaced wholesale on recomputation, never patched field by field.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct LineAmounts { taxable_value: Decimal, tax_amount: Decimal, line_amount: Decimal }
///
/// impl ValueObject for LineAmounts {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
