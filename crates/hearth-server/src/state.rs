//! Shared application state for handlers.

use std::sync::Arc;

use hearth_auth::{AuthConfig, AuthService};
use hearth_db::repository::{SurrealStores, SurrealUserRepository};
use hearth_market::{
    BookingLedger, CatalogService, MarketConfig, PropertyLocks, ReviewAggregate, UserDirectory,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::images::LocalImageHost;

pub type Stores = SurrealStores<Any>;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<SurrealUserRepository<Any>>>,
    pub ledger: BookingLedger<Stores>,
    pub reviews: ReviewAggregate<Stores>,
    pub catalog: CatalogService<Stores, LocalImageHost>,
    pub users: UserDirectory<Stores, LocalImageHost>,
    pub images: Arc<LocalImageHost>,
    pub max_image_bytes: usize,
}

impl AppState {
    /// Wire every service over one database handle. All writers share
    /// one set of property locks.
    pub fn new(
        db: Surreal<Any>,
        auth: AuthConfig,
        market: MarketConfig,
        images: LocalImageHost,
    ) -> Self {
        let user_repo = match auth.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
            None => SurrealUserRepository::new(db.clone()),
        };
        let stores = Arc::new(SurrealStores::new(db, auth.pepper.clone()));
        let images = Arc::new(images);
        let locks = PropertyLocks::new();

        Self {
            auth: Arc::new(AuthService::new(user_repo, auth)),
            ledger: BookingLedger::new(Arc::clone(&stores), locks.clone(), market.clone()),
            reviews: ReviewAggregate::new(Arc::clone(&stores), locks.clone(), market.clone()),
            catalog: CatalogService::new(
                Arc::clone(&stores),
                Arc::clone(&images),
                locks.clone(),
                market.clone(),
            ),
            users: UserDirectory::new(stores, Arc::clone(&images), locks, market.clone()),
            images,
            max_image_bytes: market.max_image_bytes,
        }
    }
}
