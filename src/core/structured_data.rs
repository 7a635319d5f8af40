//! Schema.org JSON-LD generation and a shallow validator for pasted JSON-LD.

use crate::core::present;
use crate::domain::model::Artifact;
use crate::domain::ports::Tool;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_optional_url, validate_required_field, validate_url, FieldError, FieldErrors,
    Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_AVAILABILITY: &str = "https://schema.org/InStock";
pub const STRUCTURED_DATA_FILE_NAME: &str = "structured-data.jsonld";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaType {
    #[default]
    Article,
    NewsArticle,
    BlogPosting,
    LocalBusiness,
    Organization,
    Product,
    Person,
    WebSite,
}

impl SchemaType {
    pub const ALL: [SchemaType; 8] = [
        Self::Article,
        Self::NewsArticle,
        Self::BlogPosting,
        Self::LocalBusiness,
        Self::Organization,
        Self::Product,
        Self::Person,
        Self::WebSite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::NewsArticle => "NewsArticle",
            Self::BlogPosting => "BlogPosting",
            Self::LocalBusiness => "LocalBusiness",
            Self::Organization => "Organization",
            Self::Product => "Product",
            Self::Person => "Person",
            Self::WebSite => "WebSite",
        }
    }

    fn is_article(&self) -> bool {
        matches!(self, Self::Article | Self::NewsArticle | Self::BlogPosting)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown schema type '{}'", s))
    }
}

/// Flat form input shared by every schema type; each type reads its own fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaFormData {
    // Article, NewsArticle, BlogPosting
    pub headline: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub date_published: Option<String>,
    pub date_modified: Option<String>,
    pub article_section: Option<String>,
    pub description: Option<String>,

    // LocalBusiness
    pub name: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub opening_hours: Option<String>,
    pub price_range: Option<String>,
    pub geo_latitude: Option<String>,
    pub geo_longitude: Option<String>,

    // Organization
    pub org_name: Option<String>,
    pub org_description: Option<String>,
    pub legal_name: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub founding_date: Option<String>,
    pub number_of_employees: Option<String>,
    pub address_org: Option<String>,

    // Product
    pub product_name: Option<String>,
    pub product_image: Option<String>,
    pub product_description: Option<String>,
    pub brand: Option<String>,
    pub offers_price: Option<String>,
    pub offers_currency: Option<String>,
    pub offers_availability: Option<String>,
    pub offers_url: Option<String>,

    // Person
    pub person_name: Option<String>,
    pub person_image: Option<String>,
    pub person_job_title: Option<String>,
    pub person_url: Option<String>,
    pub person_works_for: Option<String>,
    pub person_email: Option<String>,
    pub person_telephone: Option<String>,
    pub person_address: Option<String>,

    // WebSite
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub site_description: Option<String>,
    pub search_action_url: Option<String>,
    pub search_action_target: Option<String>,
}

struct SchemaBuilder(Map<String, Value>);

impl SchemaBuilder {
    fn new(schema_type: SchemaType) -> Self {
        let mut map = Map::new();
        map.insert("@context".to_string(), json!(SCHEMA_CONTEXT));
        map.insert("@type".to_string(), json!(schema_type.as_str()));
        Self(map)
    }

    fn text(&mut self, key: &str, value: &Option<String>) -> &mut Self {
        if let Some(value) = present(value) {
            self.0.insert(key.to_string(), json!(value));
        }
        self
    }

    fn typed(&mut self, key: &str, type_name: &str, field: &str, value: &Option<String>) -> &mut Self {
        if let Some(value) = present(value) {
            self.0
                .insert(key.to_string(), json!({ "@type": type_name, field: value }));
        }
        self
    }

    fn value(&mut self, key: &str, value: Value) -> &mut Self {
        self.0.insert(key.to_string(), value);
        self
    }

    fn build(self) -> Value {
        Value::Object(self.0)
    }
}

fn parse_number(value: &Option<String>) -> Option<f64> {
    present(value).and_then(|v| v.trim().parse::<f64>().ok())
}

pub fn generate_schema(schema_type: SchemaType, data: &SchemaFormData) -> Value {
    let mut schema = SchemaBuilder::new(schema_type);

    match schema_type {
        t if t.is_article() => {
            schema
                .text("headline", &data.headline)
                .text("image", &data.image)
                .typed("author", "Person", "name", &data.author)
                .typed("publisher", "Organization", "name", &data.publisher)
                .text("datePublished", &data.date_published)
                .text("dateModified", &data.date_modified)
                .text("articleSection", &data.article_section)
                .text("description", &data.description);
        }
        SchemaType::LocalBusiness => {
            schema
                .text("name", &data.name)
                .typed("address", "PostalAddress", "streetAddress", &data.address)
                .text("telephone", &data.telephone)
                .text("email", &data.email)
                .typed(
                    "openingHoursSpecification",
                    "OpeningHoursSpecification",
                    "openingHours",
                    &data.opening_hours,
                )
                .text("priceRange", &data.price_range);
            if let (Some(latitude), Some(longitude)) =
                (parse_number(&data.geo_latitude), parse_number(&data.geo_longitude))
            {
                schema.value(
                    "geo",
                    json!({
                        "@type": "GeoCoordinates",
                        "latitude": latitude,
                        "longitude": longitude,
                    }),
                );
            }
        }
        SchemaType::Organization => {
            schema
                .text("name", &data.org_name)
                .text("description", &data.org_description)
                .text("legalName", &data.legal_name)
                .text("url", &data.url)
                .text("logo", &data.logo)
                .text("foundingDate", &data.founding_date);
            if let Some(employees) =
                present(&data.number_of_employees).and_then(|v| v.trim().parse::<u64>().ok())
            {
                schema.value("numberOfEmployees", json!(employees));
            }
            schema.typed("address", "PostalAddress", "streetAddress", &data.address_org);
        }
        SchemaType::Product => {
            schema
                .text("name", &data.product_name)
                .text("image", &data.product_image)
                .text("description", &data.product_description)
                .typed("brand", "Brand", "name", &data.brand);
            if let Some(price) = parse_number(&data.offers_price) {
                let mut offer = json!({
                    "@type": "Offer",
                    "price": price,
                    "priceCurrency": present(&data.offers_currency).unwrap_or(DEFAULT_CURRENCY),
                    "availability": present(&data.offers_availability).unwrap_or(DEFAULT_AVAILABILITY),
                });
                if let (Some(url), Some(map)) = (present(&data.offers_url), offer.as_object_mut()) {
                    map.insert("url".to_string(), json!(url));
                }
                schema.value("offers", offer);
            }
        }
        SchemaType::Person => {
            schema
                .text("name", &data.person_name)
                .text("image", &data.person_image)
                .text("jobTitle", &data.person_job_title)
                .text("url", &data.person_url)
                .typed("worksFor", "Organization", "name", &data.person_works_for)
                .text("email", &data.person_email)
                .text("telephone", &data.person_telephone)
                .typed("address", "PostalAddress", "streetAddress", &data.person_address);
        }
        SchemaType::WebSite => {
            schema
                .text("name", &data.site_name)
                .text("url", &data.site_url)
                .text("description", &data.site_description);
            if let (Some(_), Some(target)) = (
                present(&data.search_action_url),
                present(&data.search_action_target),
            ) {
                schema.value(
                    "potentialAction",
                    json!({
                        "@type": "SearchAction",
                        "target": {
                            "@type": "EntryPoint",
                            "urlTemplate": target,
                        },
                        "query-input": "required name=search_term_string",
                    }),
                );
            }
        }
        _ => {}
    }

    schema.build()
}

pub fn to_json_ld_script(schema: &Value) -> Result<String> {
    Ok(format!(
        "<script type=\"application/ld+json\">\n{}\n</script>",
        serde_json::to_string_pretty(schema)?
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDataValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks that `json_ld` parses and carries a schema.org `@context` and a `@type`.
pub fn validate_structured_data(json_ld: &str) -> StructuredDataValidation {
    let schema: Value = match serde_json::from_str(json_ld) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Structured data is not valid JSON: {}", e);
            return StructuredDataValidation {
                valid: false,
                errors: vec!["Invalid JSON format".to_string()],
            };
        }
    };

    let truthy = |value: Option<&Value>| match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };

    let context = schema.get("@context");
    let mut errors = Vec::new();
    if !truthy(context) {
        errors.push("Missing @context field".to_string());
    }
    if !truthy(schema.get("@type")) {
        errors.push("Missing @type field".to_string());
    }
    if truthy(context) && context.and_then(Value::as_str) != Some(SCHEMA_CONTEXT) {
        errors.push("Invalid @context value (should be https://schema.org)".to_string());
    }

    StructuredDataValidation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Structured data generator input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDataTool {
    pub schema_type: SchemaType,
    #[serde(flatten)]
    pub data: SchemaFormData,
}

impl StructuredDataTool {
    pub fn new(schema_type: SchemaType, data: SchemaFormData) -> Self {
        Self { schema_type, data }
    }
}

impl Validate for StructuredDataTool {
    fn field_errors(&self) -> Vec<FieldError> {
        let d = &self.data;
        let mut errors = FieldErrors::new();
        match self.schema_type {
            t if t.is_article() => {
                errors
                    .check(validate_required_field("headline", d.headline.as_deref()))
                    .check(validate_optional_url("image", d.image.as_deref()));
            }
            SchemaType::LocalBusiness => {
                errors.check(validate_required_field("name", d.name.as_deref()));
            }
            SchemaType::Organization => {
                errors
                    .check(validate_required_field("org_name", d.org_name.as_deref()))
                    .check(validate_optional_url("url", d.url.as_deref()))
                    .check(validate_optional_url("logo", d.logo.as_deref()));
            }
            SchemaType::Product => {
                errors
                    .check(validate_required_field("product_name", d.product_name.as_deref()))
                    .check(validate_optional_url("product_image", d.product_image.as_deref()))
                    .check(validate_optional_url("offers_url", d.offers_url.as_deref()));
            }
            SchemaType::Person => {
                errors
                    .check(validate_required_field("person_name", d.person_name.as_deref()))
                    .check(validate_optional_url("person_url", d.person_url.as_deref()));
            }
            SchemaType::WebSite => {
                errors
                    .check(validate_required_field("site_name", d.site_name.as_deref()))
                    .check(validate_url("site_url", d.site_url.as_deref()));
            }
            _ => {}
        }
        errors.into_vec()
    }
}

impl Tool for StructuredDataTool {
    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn generate(&self) -> Result<Artifact> {
        let schema = generate_schema(self.schema_type, &self.data);
        Ok(Artifact::new(
            STRUCTURED_DATA_FILE_NAME,
            "application/ld+json",
            serde_json::to_string_pretty(&schema)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_article_schema() {
        let data = SchemaFormData {
            headline: some("Launching ScaleSite"),
            author: some("Jana"),
            publisher: some("ScaleSite"),
            description: some(""),
            ..Default::default()
        };
        let schema = generate_schema(SchemaType::BlogPosting, &data);

        assert_eq!(schema["@context"], "https://schema.org");
        assert_eq!(schema["@type"], "BlogPosting");
        assert_eq!(schema["author"], json!({ "@type": "Person", "name": "Jana" }));
        assert_eq!(schema["publisher"]["@type"], "Organization");
        assert!(schema.get("description").is_none());
    }

    #[test]
    fn test_local_business_geo_needs_both_coordinates() {
        let mut data = SchemaFormData {
            name: some("ScaleSite Studio"),
            geo_latitude: some("52.52"),
            ..Default::default()
        };
        assert!(generate_schema(SchemaType::LocalBusiness, &data)
            .get("geo")
            .is_none());

        data.geo_longitude = some("13.405");
        let schema = generate_schema(SchemaType::LocalBusiness, &data);
        assert_eq!(schema["geo"]["latitude"], json!(52.52));
        assert_eq!(schema["geo"]["longitude"], json!(13.405));
    }

    #[test]
    fn test_product_offer_defaults() {
        let data = SchemaFormData {
            product_name: some("SEO Audit"),
            brand: some("ScaleSite"),
            offers_price: some("49.90"),
            ..Default::default()
        };
        let schema = generate_schema(SchemaType::Product, &data);
        assert_eq!(schema["name"], "SEO Audit");
        assert_eq!(schema["brand"], json!({ "@type": "Brand", "name": "ScaleSite" }));
        assert_eq!(schema["offers"]["price"], json!(49.9));
        assert_eq!(schema["offers"]["priceCurrency"], "EUR");
        assert_eq!(schema["offers"]["availability"], "https://schema.org/InStock");
        assert!(schema["offers"].get("url").is_none());
    }

    #[test]
    fn test_website_search_action() {
        let data = SchemaFormData {
            site_name: some("ScaleSite"),
            site_url: some("https://scalesite.app"),
            search_action_url: some("https://scalesite.app/search"),
            search_action_target: some("https://scalesite.app/search?q={search_term_string}"),
            ..Default::default()
        };
        let schema = generate_schema(SchemaType::WebSite, &data);
        assert_eq!(schema["potentialAction"]["@type"], "SearchAction");
        assert_eq!(
            schema["potentialAction"]["target"]["urlTemplate"],
            "https://scalesite.app/search?q={search_term_string}"
        );
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let data = SchemaFormData {
            org_name: some("ScaleSite"),
            legal_name: some("ScaleSite GmbH"),
            number_of_employees: some("12"),
            ..Default::default()
        };
        let schema = generate_schema(SchemaType::Organization, &data);
        let keys: Vec<&str> = schema
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["@context", "@type", "name", "legalName", "numberOfEmployees"]
        );
        assert_eq!(schema["numberOfEmployees"], json!(12));
    }

    #[test]
    fn test_organization_requires_name() {
        let mut tool = StructuredDataTool::new(
            SchemaType::Organization,
            SchemaFormData {
                url: some("https://scalesite.app"),
                ..Default::default()
            },
        );
        let fields: Vec<String> = tool.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["org_name"]);

        tool.data.org_name = some("ScaleSite");
        tool.data.org_description = some("Websites that grow with your business");
        assert!(tool.validate().is_ok());
        let schema = generate_schema(tool.schema_type, &tool.data);
        assert_eq!(schema["name"], "ScaleSite");
        assert_eq!(schema["description"], "Websites that grow with your business");
    }

    #[test]
    fn test_script_wrapper() {
        let script = to_json_ld_script(&json!({ "@type": "Person" })).unwrap();
        assert_eq!(
            script,
            "<script type=\"application/ld+json\">\n{\n  \"@type\": \"Person\"\n}\n</script>"
        );
    }

    #[test]
    fn test_validate_structured_data() {
        let ok = validate_structured_data(r#"{"@context":"https://schema.org","@type":"Person"}"#);
        assert!(ok.valid);

        let broken = validate_structured_data("{not json");
        assert_eq!(broken.errors, vec!["Invalid JSON format"]);

        let missing = validate_structured_data("{}");
        assert_eq!(
            missing.errors,
            vec!["Missing @context field", "Missing @type field"]
        );

        let wrong = validate_structured_data(r#"{"@context":"http://schema.org","@type":"Thing"}"#);
        assert!(!wrong.valid);
        assert_eq!(
            wrong.errors,
            vec!["Invalid @context value (should be https://schema.org)"]
        );
    }

    #[test]
    fn test_tool_validation_per_type() {
        let tool = StructuredDataTool::new(SchemaType::WebSite, SchemaFormData::default());
        let fields: Vec<String> = tool.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["site_name", "site_url"]);

        let tool = StructuredDataTool::new(
            SchemaType::Product,
            SchemaFormData {
                product_name: some("Audit"),
                ..Default::default()
            },
        );
        assert!(tool.validate().is_ok());
        assert_eq!(tool.generate().unwrap().file_name, "structured-data.jsonld");
    }

    #[test]
    fn test_schema_type_parse() {
        assert_eq!("website".parse::<SchemaType>(), Ok(SchemaType::WebSite));
        assert!("Recipe".parse::<SchemaType>().is_err());
    }
}
