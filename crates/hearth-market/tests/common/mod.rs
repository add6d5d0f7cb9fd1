//! Shared fixtures: in-memory SurrealDB stores, seeded users and
//! listings, and an image host that keeps uploads in a map.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use hearth_core::access::Identity;
use hearth_core::error::{HearthError, HearthResult};
use hearth_core::images::ImageHost;
use hearth_core::models::property::{CreateProperty, Property, PropertyStatus, StoredImage};
use hearth_core::models::user::{CreateUser, Role};
use hearth_core::repository::{PropertyRepository, Stores, UserRepository};
use hearth_db::repository::SurrealStores;
use hearth_market::bookings::NewBooking;
use hearth_market::{
    BookingLedger, CatalogService, MarketConfig, PropertyLocks, ReviewAggregate, UserDirectory,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

pub type TestStores = SurrealStores<Db>;

pub struct Harness {
    pub stores: Arc<TestStores>,
    pub images: Arc<MemoryImageHost>,
    pub ledger: BookingLedger<TestStores>,
    pub reviews: ReviewAggregate<TestStores>,
    pub catalog: CatalogService<TestStores, MemoryImageHost>,
    pub users: UserDirectory<TestStores, MemoryImageHost>,
}

pub async fn harness() -> Harness {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hearth_db::run_migrations(&db).await.unwrap();

    let stores = Arc::new(SurrealStores::new(db, None));
    let images = Arc::new(MemoryImageHost::default());
    let locks = PropertyLocks::new();
    let config = MarketConfig {
        max_image_bytes: 1024,
        ..MarketConfig::default()
    };

    Harness {
        ledger: BookingLedger::new(Arc::clone(&stores), locks.clone(), config.clone()),
        reviews: ReviewAggregate::new(Arc::clone(&stores), locks.clone(), config.clone()),
        catalog: CatalogService::new(
            Arc::clone(&stores),
            Arc::clone(&images),
            locks.clone(),
            config.clone(),
        ),
        users: UserDirectory::new(Arc::clone(&stores), Arc::clone(&images), locks, config),
        stores,
        images,
    }
}

impl Harness {
    pub async fn user(&self, role: Role) -> Identity {
        let tag = Uuid::new_v4().simple().to_string();
        let user = self
            .stores
            .users()
            .create(CreateUser {
                name: format!("user {}", &tag[..6]),
                email: format!("{tag}@example.com"),
                password: "secret-pw".into(),
                role,
            })
            .await
            .unwrap();
        Identity::new(user.id, user.role)
    }

    pub async fn listing(&self, owner: &Identity) -> Property {
        self.stores
            .properties()
            .create(CreateProperty {
                owner_id: owner.user_id,
                title: "Harbour loft".into(),
                description: "Bright two-room flat".into(),
                property_type: "Apartment".into(),
                location: "Lisbon, Portugal".into(),
                price: 100.0,
                bedrooms: 2,
                bathrooms: 1,
                area: 64.0,
                image: "https://img.example/cover.jpg".into(),
                amenities: vec!["wifi".into()],
                status: PropertyStatus::Available,
            })
            .await
            .unwrap()
    }

    pub async fn property(&self, id: Uuid) -> Property {
        self.stores.properties().get_by_id(id).await.unwrap()
    }
}

pub fn july(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
}

pub fn stay(property_id: Uuid, start: u32, end: u32) -> NewBooking {
    NewBooking {
        property_id,
        start_date: july(start),
        end_date: july(end),
        guests: 2,
        total_price: 100.0 * f64::from(end - start),
    }
}

/// Keeps uploaded bytes keyed by handle. Deleting can be made to fail.
#[derive(Default)]
pub struct MemoryImageHost {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_deletes: Mutex<bool>,
}

impl MemoryImageHost {
    pub fn contains(&self, handle: &str) -> bool {
        self.objects.lock().unwrap().contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn fail_deletes(&self, fail: bool) {
        *self.fail_deletes.lock().unwrap() = fail;
    }
}

impl ImageHost for MemoryImageHost {
    async fn upload(&self, bytes: Vec<u8>, _content_type: &str) -> HearthResult<StoredImage> {
        let handle = Uuid::new_v4().simple().to_string();
        self.objects.lock().unwrap().insert(handle.clone(), bytes);
        Ok(StoredImage {
            url: format!("memory://{handle}"),
            handle,
        })
    }

    async fn delete(&self, handle: &str) -> HearthResult<()> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(HearthError::Unavailable("image host offline".into()));
        }
        self.objects.lock().unwrap().remove(handle);
        Ok(())
    }
}
