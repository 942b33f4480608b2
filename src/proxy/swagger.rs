//! Swagger UI aggregation document.
//!
//! Lists the api-docs URL of every backend, as seen through the gateway,
//! so a single Swagger UI can browse all of them.

use serde::Serialize;

use crate::routing::{BackendRegistry, GatewayRouter};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SwaggerUrl {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SwaggerConfig {
    pub urls: Vec<SwaggerUrl>,
    pub url: String,
    #[serde(rename = "validatorUrl")]
    pub validator_url: String,
}

/// Build the listing in registry order, optionally led by the gateway's own docs.
pub fn build_swagger_config(
    registry: &BackendRegistry,
    router: &GatewayRouter,
    api_docs_suffix: &str,
    self_docs: Option<SwaggerUrl>,
) -> SwaggerConfig {
    let backends = registry.iter().map(|entry| SwaggerUrl {
        name: entry.display_name().to_string(),
        url: format!("{}{}", router.backend_base(entry.routing_key()), api_docs_suffix),
    });

    SwaggerConfig {
        urls: self_docs.into_iter().chain(backends).collect(),
        url: String::new(),
        validator_url: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::BackendEntry;

    #[test]
    fn test_lists_backends_in_order() {
        let registry = BackendRegistry::new(vec![
            BackendEntry::new("orders", "http://localhost:9001"),
            BackendEntry::new("Inventory", "http://localhost:9002")
                .with_path("inventory")
                .with_label("Inventory API"),
        ]);
        let config = build_swagger_config(&registry, &GatewayRouter::new("mediator"), "/api-docs", None);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "urls": [
                    {"name": "orders", "url": "/mediator/orders/api-docs"},
                    {"name": "Inventory API", "url": "/mediator/inventory/api-docs"}
                ],
                "url": "",
                "validatorUrl": ""
            })
        );
    }

    #[test]
    fn test_self_docs_listed_first() {
        let registry = BackendRegistry::new(vec![BackendEntry::new("orders", "http://o")]);
        let config = build_swagger_config(
            &registry,
            &GatewayRouter::new("proxy"),
            "/v3/api-docs",
            Some(SwaggerUrl {
                name: "gateway".into(),
                url: "/api-docs".into(),
            }),
        );

        assert_eq!(config.urls[0].url, "/api-docs");
        assert_eq!(config.urls[1].url, "/proxy/orders/v3/api-docs");
    }
}
