use crate::models::{AddressIndicators, Indicator, IndicatorKind, Location, LookupFailure};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BRP Brandweer",
        description = "Fire-brigade indicators derived from the residents registered at a location"
    ),
    paths(crate::handlers::get_location_indicators),
    components(schemas(AddressIndicators, LookupFailure, Location, Indicator, IndicatorKind)),
    tags((name = "brp", description = "Population register lookups"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_lookup_path() {
        let yaml = ApiDoc::openapi().to_yaml().unwrap();
        assert!(yaml.contains("/brp_brandweer/{bag_id}"));
        assert!(yaml.contains("AddressIndicators"));
    }
}
