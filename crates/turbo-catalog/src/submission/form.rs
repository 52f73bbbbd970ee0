//! Flattening a submission into indexed multipart form fields.

use serde_json::Value;

use crate::media::{ImageFile, ImageSource};
use crate::money::Money;

use super::payload::{ProductSubmission, WireSku};

/// One multipart form part, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: ImageFile },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }

    /// Text value, `None` for file parts.
    pub fn value(&self) -> Option<&str> {
        match self {
            FormPart::Text { value, .. } => Some(value),
            FormPart::File { .. } => None,
        }
    }
}

#[derive(Default)]
struct Parts(Vec<FormPart>);

impl Parts {
    fn text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(FormPart::text(name, value));
    }

    fn money(&mut self, name: String, value: Option<Money>) {
        if let Some(money) = value {
            self.text(name, money.to_wire());
        }
    }

    fn file(&mut self, name: impl Into<String>, file: &ImageFile) {
        self.0.push(FormPart::File {
            name: name.into(),
            file: file.clone(),
        });
    }

    /// Stored images go as `{url_field}`, picked files as `{file_field}`.
    fn image(&mut self, file_field: &str, url_field: &str, image: &ImageSource) {
        match image {
            ImageSource::Url { url } => self.text(url_field, url.as_str()),
            ImageSource::File(file) => self.file(file_field, file),
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ProductSubmission {
    /// Flatten into ordered form parts.
    pub fn to_form_parts(&self) -> Vec<FormPart> {
        let mut parts = Parts::default();

        if let Some(id) = &self.product_id {
            parts.text("id", id.as_str());
        }
        parts.text("name", self.name.as_str());
        parts.text("slug", self.slug.as_str());
        parts.text("brandId", self.brand_id.as_str());
        parts.text("categoryId", self.category_id.as_str());
        parts.text("description", self.description.as_str());
        parts.text("warranty", self.warranty.as_str());
        parts.text("hasVariants", self.has_variants.to_string());

        for (i, spec) in self.specs.iter().enumerate() {
            parts.text(format!("specs[{}].attributeId", i), spec.attribute_id.as_str());
            parts.text(format!("specs[{}].code", i), spec.code.as_str());
            match &spec.value {
                Value::Array(items) => {
                    for (j, item) in items.iter().enumerate() {
                        parts.text(format!("specs[{}].value[{}]", i, j), scalar(item));
                    }
                }
                value => parts.text(format!("specs[{}].value", i), scalar(value)),
            }
        }

        for (i, group) in self.attributes.iter().enumerate() {
            parts.text(format!("attributes[{}].id", i), group.id.as_str());
            parts.text(format!("attributes[{}].label", i), group.label.as_str());
            parts.text(format!("attributes[{}].isNew", i), group.is_new.to_string());
            for (j, value) in group.values.iter().enumerate() {
                let prefix = format!("attributes[{}].values[{}]", i, j);
                parts.text(format!("{}.id", prefix), value.id.as_str());
                parts.text(format!("{}.value", prefix), value.value.as_str());
                parts.text(format!("{}.active", prefix), value.active.to_string());
                parts.text(format!("{}.isNew", prefix), value.is_new.to_string());
            }
        }

        for (i, sku) in self.skus.iter().enumerate() {
            sku_parts(&mut parts, i, sku);
        }

        if let Some(thumbnail) = &self.thumbnail {
            parts.image("thumbnail", "thumbnailUrl", thumbnail);
        }
        let mut stored = 0;
        for image in &self.gallery {
            match image {
                ImageSource::Url { url } => {
                    parts.text(format!("gallery[{}]", stored), url.as_str());
                    stored += 1;
                }
                ImageSource::File(file) => parts.file("newGalleryImages", file),
            }
        }

        parts.0
    }
}

fn sku_parts(parts: &mut Parts, i: usize, sku: &WireSku) {
    let prefix = format!("skus[{}]", i);
    if let Some(id) = &sku.id {
        parts.text(format!("{}.id", prefix), id.as_str());
    }
    parts.text(format!("{}.skuCode", prefix), sku.sku_code.as_str());
    parts.text(format!("{}.name", prefix), sku.name.as_str());
    parts.money(format!("{}.price", prefix), sku.price);
    parts.money(format!("{}.costPrice", prefix), sku.cost_price);
    parts.money(format!("{}.originalPrice", prefix), sku.original_price);
    if let Some(stock) = sku.stock {
        parts.text(format!("{}.stock", prefix), stock.to_string());
    }
    parts.text(format!("{}.active", prefix), sku.active.to_string());
    parts.text(format!("{}.discontinued", prefix), sku.discontinued.to_string());
    if let Some(reason) = &sku.discontinued_reason {
        parts.text(format!("{}.discontinuedReason", prefix), reason.as_str());
    }
    if let Some(image) = &sku.image {
        parts.image(
            &format!("{}.image", prefix),
            &format!("{}.imageUrl", prefix),
            image,
        );
    }
    for (j, spec) in sku.specs.iter().enumerate() {
        let spec_prefix = format!("{}.specs[{}]", prefix, j);
        parts.text(format!("{}.groupId", spec_prefix), spec.group_id.as_str());
        parts.text(format!("{}.valueId", spec_prefix), spec.value_id.as_str());
        parts.text(format!("{}.value", spec_prefix), spec.value.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::PreviewRegistry;
    use crate::submission::{WireGroupValue, WireAttributeGroup, WireSkuSpec, WireSpec};
    use serde_json::json;

    fn submission(registry: &PreviewRegistry) -> ProductSubmission {
        ProductSubmission {
            product_id: None,
            name: "Phone".into(),
            slug: "phone".into(),
            brand_id: "b1".into(),
            category_id: "c1".into(),
            description: String::new(),
            warranty: "12 months".into(),
            has_variants: true,
            thumbnail: Some(ImageSource::File(ImageFile::new(
                registry,
                "thumb.png",
                "image/png",
                vec![0u8; 4],
            ))),
            gallery: vec![
                ImageSource::url("https://cdn/1.png"),
                ImageSource::File(ImageFile::new(registry, "2.png", "image/png", vec![1u8])),
                ImageSource::url("https://cdn/3.png"),
            ],
            specs: vec![
                WireSpec { attribute_id: "a1".into(), code: "screen".into(), value: json!(6.1) },
                WireSpec { attribute_id: "a2".into(), code: "ports".into(), value: json!(["usb", "jack"]) },
            ],
            attributes: vec![WireAttributeGroup {
                id: "g1".into(),
                label: "Color".into(),
                is_new: false,
                values: vec![WireGroupValue {
                    id: "v1".into(),
                    value: "Red".into(),
                    active: false,
                    is_new: false,
                }],
            }],
            skus: vec![WireSku {
                id: Some("s1".into()),
                sku_code: "PH-RED".into(),
                name: "Red".into(),
                price: Some(Money::from_minor(1999)),
                cost_price: None,
                original_price: None,
                stock: Some(3),
                active: true,
                discontinued: false,
                discontinued_reason: None,
                image: Some(ImageSource::url("https://cdn/red.png")),
                specs: vec![WireSkuSpec {
                    group_id: "g1".into(),
                    value_id: "v1".into(),
                    value: "Red".into(),
                }],
            }],
            orphaned_sku_ids: Vec::new(),
        }
    }

    fn text<'a>(parts: &'a [FormPart], name: &str) -> Option<&'a str> {
        parts.iter().find(|p| p.name() == name).and_then(FormPart::value)
    }

    #[test]
    fn test_indexed_field_names() {
        let registry = PreviewRegistry::new();
        let parts = submission(&registry).to_form_parts();

        assert_eq!(text(&parts, "id"), None);
        assert_eq!(text(&parts, "specs[0].value"), Some("6.1"));
        assert_eq!(text(&parts, "specs[1].value[1]"), Some("jack"));
        assert_eq!(text(&parts, "attributes[0].values[0].active"), Some("false"));
        assert_eq!(text(&parts, "skus[0].id"), Some("s1"));
        assert_eq!(text(&parts, "skus[0].price"), Some("19.99"));
        assert_eq!(text(&parts, "skus[0].imageUrl"), Some("https://cdn/red.png"));
        assert_eq!(text(&parts, "skus[0].specs[0].valueId"), Some("v1"));
        assert_eq!(text(&parts, "skus[0].costPrice"), None);
    }

    #[test]
    fn test_image_parts() {
        let registry = PreviewRegistry::new();
        let parts = submission(&registry).to_form_parts();

        let files: Vec<&str> = parts
            .iter()
            .filter(|p| matches!(p, FormPart::File { .. }))
            .map(FormPart::name)
            .collect();
        assert_eq!(files, vec!["thumbnail", "newGalleryImages"]);
        assert_eq!(text(&parts, "gallery[0]"), Some("https://cdn/1.png"));
        assert_eq!(text(&parts, "gallery[1]"), Some("https://cdn/3.png"));
        assert_eq!(text(&parts, "thumbnailUrl"), None);
    }
}
