use std::sync::Arc;

use super::{
    config::Config,
    gateway::{
        geocode::{GeocodeGateway, NominatimResolver},
        http_client,
        order::{HttpOrderUpstream, OrderGateway},
        recommend::{RecommendationGateway, RemoteRecommender},
        user::{RestUserDirectory, UserLookupGateway},
    },
};

pub struct State {
    pub port: u16,
    pub orders: OrderGateway,
    pub users: UserLookupGateway,
    pub geocoder: GeocodeGateway,
    pub recommendations: RecommendationGateway,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, reqwest::Error> {
        let client = http_client(config.upstream_timeout)?;

        Ok(Arc::new(Self {
            port: config.port,
            orders: OrderGateway::new(Arc::new(HttpOrderUpstream::new(
                client.clone(),
                config.order_endpoint,
            ))),
            users: UserLookupGateway::new(Arc::new(RestUserDirectory::new(
                client.clone(),
                config.order_store,
            ))),
            geocoder: GeocodeGateway::new(Arc::new(NominatimResolver::new(
                client.clone(),
                config.geocode,
            ))),
            recommendations: RecommendationGateway::new(Arc::new(RemoteRecommender::new(
                client,
                config.recommender,
            ))),
        }))
    }
}
