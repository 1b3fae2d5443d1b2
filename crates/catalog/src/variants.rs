//! Variant selection for a product detail page

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::types::{Product, ProductDetail, ProductMedia, ProductVariant};

/// Tracks which variant of a product is selected.
///
/// Variants carrying attributes (color, size...) are picked by attribute
/// value; variants without attributes are picked directly by id.
#[derive(Debug, Clone)]
pub struct VariantSelector {
    detail: ProductDetail,
    available: Vec<(String, Vec<String>)>,
    selected_attributes: BTreeMap<String, String>,
    selected: Option<usize>,
}

impl VariantSelector {
    pub fn new(detail: ProductDetail) -> Self {
        let mut available: Vec<(String, Vec<String>)> = Vec::new();
        for variant in detail.variants.iter().filter(|v| v.has_attributes()) {
            for (name, value) in &variant.attributes {
                match available.iter_mut().find(|(n, _)| n == name) {
                    Some((_, values)) => {
                        if !values.contains(value) {
                            values.push(value.clone());
                        }
                    }
                    None => available.push((name.clone(), vec![value.clone()])),
                }
            }
        }

        let selected = detail.variants.iter().position(ProductVariant::has_attributes);
        let selected_attributes = selected
            .map(|i| detail.variants[i].attributes.clone())
            .unwrap_or_default();

        Self {
            detail,
            available,
            selected_attributes,
            selected,
        }
    }

    pub fn product(&self) -> &Product {
        &self.detail.product
    }

    pub fn variants(&self) -> &[ProductVariant] {
        &self.detail.variants
    }

    /// Attribute names with their distinct values, in first-seen order.
    pub fn available_attributes(&self) -> &[(String, Vec<String>)] {
        &self.available
    }

    pub fn selected_attributes(&self) -> &BTreeMap<String, String> {
        &self.selected_attributes
    }

    pub fn selected_variant(&self) -> Option<&ProductVariant> {
        self.selected.map(|i| &self.detail.variants[i])
    }

    /// Set one attribute and select the first variant matching all selected
    /// attributes. Keeps the previous variant when none matches.
    pub fn select_attribute(&mut self, name: &str, value: &str) -> Option<&ProductVariant> {
        self.selected_attributes
            .insert(name.to_string(), value.to_string());

        let wanted = &self.selected_attributes;
        let matching = self.detail.variants.iter().position(|variant| {
            wanted
                .iter()
                .all(|(key, val)| variant.attributes.get(key) == Some(val))
        });
        if matching.is_some() {
            self.selected = matching;
        }
        self.selected_variant()
    }

    /// Select a variant by id, taking over its attributes.
    pub fn select_variant(&mut self, variant_id: i64) -> Option<&ProductVariant> {
        let index = self.detail.variants.iter().position(|v| v.id == variant_id)?;
        self.selected = Some(index);
        self.selected_attributes = self.detail.variants[index].attributes.clone();
        self.selected_variant()
    }

    pub fn price(&self) -> Decimal {
        self.selected_variant()
            .map(|v| v.price)
            .unwrap_or(self.detail.product.price)
    }

    pub fn stock(&self) -> i64 {
        match self.selected_variant() {
            Some(variant) => variant.stock_quantity,
            None => self.detail.product.stock_quantity.unwrap_or(0),
        }
    }

    /// Images to show: the selected variant's, or the product's if it has none.
    pub fn images(&self) -> &[ProductMedia] {
        match self.selected_variant() {
            Some(variant) if !variant.images.is_empty() => &variant.images,
            _ => &self.detail.product.images,
        }
    }

    pub fn has_attribute_variants(&self) -> bool {
        self.detail.variants.iter().any(ProductVariant::has_attributes)
    }

    /// Whether any variant has no attributes and must be picked by id.
    pub fn has_plain_variants(&self) -> bool {
        self.detail.variants.iter().any(|v| !v.has_attributes())
    }

    /// Cart line identifier: `"{product}-{variant}"`, or `"{product}"`.
    pub fn line_id(&self) -> String {
        match self.selected_variant() {
            Some(variant) => format!("{}-{}", self.detail.product.id, variant.id),
            None => self.detail.product.id.to_string(),
        }
    }
}
