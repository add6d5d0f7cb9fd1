//! Integration tests for the property, booking, review and purchase
//! repositories using in-memory SurrealDB.

use chrono::NaiveDate;
use hearth_core::error::HearthError;
use hearth_core::models::booking::{BookingStatus, CreateBooking, DateRange};
use hearth_core::models::property::{
    CreateProperty, Property, PropertyFilter, PropertyStatus, StoredImage, UpdateProperty,
};
use hearth_core::models::purchase::CreatePurchase;
use hearth_core::models::review::{CreateReview, UpdateReview};
use hearth_core::repository::{
    BookingRepository, Pagination, PropertyRepository, PurchaseRepository, ReviewRepository,
};
use hearth_core::rules::rating::RatingSummary;
use hearth_db::repository::{
    SurrealBookingRepository, SurrealPropertyRepository, SurrealPurchaseRepository,
    SurrealReviewRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hearth_db::run_migrations(&db).await.unwrap();
    db
}

fn listing(owner_id: Uuid, location: &str, price: f64) -> CreateProperty {
    CreateProperty {
        owner_id,
        title: "Harbour loft".into(),
        description: "Bright two-room flat".into(),
        property_type: "Apartment".into(),
        location: location.into(),
        price,
        bedrooms: 2,
        bathrooms: 1,
        area: 64.0,
        image: "https://img.example/cover.jpg".into(),
        amenities: vec!["wifi".into(), "kitchen".into()],
        status: PropertyStatus::Available,
    }
}

async fn seed_property(db: &Surreal<Db>) -> Property {
    SurrealPropertyRepository::new(db.clone())
        .create(listing(Uuid::new_v4(), "Lisbon, Portugal", 120.0))
        .await
        .unwrap()
}

fn july(start: u32, end: u32) -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 7, start).unwrap(),
        NaiveDate::from_ymd_opt(2024, 7, end).unwrap(),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_get_update_property() {
    let db = setup().await;
    let repo = SurrealPropertyRepository::new(db);
    let owner = Uuid::new_v4();

    let property = repo.create(listing(owner, "Lisbon", 120.0)).await.unwrap();
    assert_eq!(property.owner_id, owner);
    assert_eq!(property.rating, 0.0);
    assert_eq!(property.num_reviews, 0);
    assert!(property.gallery.is_empty());
    assert_eq!(property.amenities, vec!["wifi", "kitchen"]);

    let updated = repo
        .update(
            property.id,
            UpdateProperty {
                price: Some(150.0),
                status: Some(PropertyStatus::Unavailable),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 150.0);
    assert_eq!(updated.status, PropertyStatus::Unavailable);
    assert_eq!(updated.title, "Harbour loft");

    let fetched = repo.get_by_id(property.id).await.unwrap();
    assert_eq!(fetched.price, 150.0);
}

#[tokio::test]
async fn missing_property_is_not_found() {
    let repo = SurrealPropertyRepository::new(setup().await);
    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, HearthError::NotFound { .. }));

    let err = repo
        .update(Uuid::new_v4(), UpdateProperty::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HearthError::NotFound { .. }));
}

#[tokio::test]
async fn list_properties_with_filter() {
    let db = setup().await;
    let repo = SurrealPropertyRepository::new(db);
    let owner = Uuid::new_v4();
    repo.create(listing(owner, "Lisbon, Portugal", 80.0)).await.unwrap();
    repo.create(listing(owner, "Porto, Portugal", 200.0)).await.unwrap();
    repo.create(listing(owner, "Madrid, Spain", 120.0)).await.unwrap();

    let all = repo
        .list(PropertyFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 3);

    let portugal = repo
        .list(
            PropertyFilter {
                location: Some("PORTUGAL".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(portugal.total, 2);

    let cheap_portugal = repo
        .list(
            PropertyFilter {
                location: Some("portugal".into()),
                max_price: Some(100.0),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(cheap_portugal.total, 1);
    assert_eq!(cheap_portugal.items[0].location, "Lisbon, Portugal");

    let page = repo
        .list(PropertyFilter::default(), Pagination::page(2, 2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.page(), 2);
}

#[tokio::test]
async fn list_by_owner_and_delete() {
    let db = setup().await;
    let repo = SurrealPropertyRepository::new(db);
    let owner = Uuid::new_v4();
    let p = repo.create(listing(owner, "Lisbon", 80.0)).await.unwrap();
    repo.create(listing(Uuid::new_v4(), "Porto", 80.0))
        .await
        .unwrap();

    assert_eq!(repo.list_by_owner(owner).await.unwrap().len(), 1);

    repo.delete(p.id).await.unwrap();
    assert!(repo.list_by_owner(owner).await.unwrap().is_empty());
    assert!(matches!(
        repo.delete(p.id).await.unwrap_err(),
        HearthError::NotFound { .. }
    ));
}

#[tokio::test]
async fn rating_and_gallery_setters() {
    let db = setup().await;
    let repo = SurrealPropertyRepository::new(db.clone());
    let property = seed_property(&db).await;

    let rated = repo
        .set_rating(
            property.id,
            RatingSummary {
                rating: 4.3,
                num_reviews: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(rated.rating, 4.3);
    assert_eq!(rated.num_reviews, 3);

    let image = StoredImage {
        url: "/images/abc.png".into(),
        handle: "abc.png".into(),
    };
    let with_gallery = repo
        .set_gallery(property.id, vec![image.clone()])
        .await
        .unwrap();
    assert_eq!(with_gallery.gallery, vec![image]);
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn booking_lifecycle_in_storage() {
    let db = setup().await;
    let property = seed_property(&db).await;
    let repo = SurrealBookingRepository::new(db);
    let guest = Uuid::new_v4();

    let booking = repo
        .create(CreateBooking {
            property_id: property.id,
            user_id: guest,
            owner_id: property.owner_id,
            stay: july(1, 5),
            guests: 2,
            total_price: 400.0,
        })
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.stay(), july(1, 5));

    let confirmed = repo
        .set_status(booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    assert_eq!(repo.list_by_user(guest).await.unwrap().len(), 1);
    assert_eq!(repo.list_by_property(property.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cancelled_bookings_are_not_active() {
    let db = setup().await;
    let property = seed_property(&db).await;
    let repo = SurrealBookingRepository::new(db);

    let mut ids = Vec::new();
    for (start, end) in [(1, 3), (3, 6), (10, 12)] {
        let b = repo
            .create(CreateBooking {
                property_id: property.id,
                user_id: Uuid::new_v4(),
                owner_id: property.owner_id,
                stay: july(start, end),
                guests: 1,
                total_price: 0.0,
            })
            .await
            .unwrap();
        ids.push(b.id);
    }
    repo.set_status(ids[1], BookingStatus::Cancelled)
        .await
        .unwrap();

    let active = repo.list_active_by_property(property.id).await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|b| b.status != BookingStatus::Cancelled));
    assert_eq!(repo.list_by_property(property.id).await.unwrap().len(), 3);

    let page = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 3);

    repo.delete(ids[0]).await.unwrap();
    repo.delete_by_property(property.id).await.unwrap();
    assert!(repo.list_by_property(property.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_review_per_property_and_user() {
    let db = setup().await;
    let property = seed_property(&db).await;
    let repo = SurrealReviewRepository::new(db);
    let author = Uuid::new_v4();

    let review = repo
        .create(CreateReview {
            property_id: property.id,
            user_id: author,
            booking_id: None,
            rating: 4,
            comment: "Nice".into(),
        })
        .await
        .unwrap();
    assert_eq!(review.rating, 4);

    let err = repo
        .create(CreateReview {
            property_id: property.id,
            user_id: author,
            booking_id: None,
            rating: 2,
            comment: "Again".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HearthError::Conflict { .. }), "got {err:?}");

    let found = repo
        .find_by_property_and_user(property.id, author)
        .await
        .unwrap();
    assert_eq!(found.map(|r| r.id), Some(review.id));
    assert!(
        repo.find_by_property_and_user(property.id, Uuid::new_v4())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn ratings_follow_updates_and_deletes() {
    let db = setup().await;
    let property = seed_property(&db).await;
    let repo = SurrealReviewRepository::new(db);

    let mut reviews = Vec::new();
    for rating in [5, 3, 1] {
        reviews.push(
            repo.create(CreateReview {
                property_id: property.id,
                user_id: Uuid::new_v4(),
                booking_id: Some(Uuid::new_v4()),
                rating,
                comment: format!("{rating} stars"),
            })
            .await
            .unwrap(),
        );
    }

    let mut ratings = repo.ratings_for_property(property.id).await.unwrap();
    ratings.sort();
    assert_eq!(ratings, vec![1, 3, 5]);

    let updated = repo
        .update(
            reviews[2].id,
            UpdateReview {
                rating: Some(2),
                comment: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rating, 2);
    assert_eq!(updated.comment, "1 stars");

    repo.delete(reviews[0].id).await.unwrap();
    let mut ratings = repo.ratings_for_property(property.id).await.unwrap();
    ratings.sort();
    assert_eq!(ratings, vec![2, 3]);

    assert_eq!(repo.list_by_property(property.id).await.unwrap().len(), 2);
    assert_eq!(
        repo.list_by_user(reviews[1].user_id).await.unwrap().len(),
        1
    );

    repo.delete_by_property(property.id).await.unwrap();
    assert!(repo.ratings_for_property(property.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

#[tokio::test]
async fn purchases_create_list_delete() {
    let db = setup().await;
    let property = seed_property(&db).await;
    let repo = SurrealPurchaseRepository::new(db);
    let buyer = Uuid::new_v4();

    let purchase = repo
        .create(CreatePurchase {
            property_id: property.id,
            user_id: buyer,
        })
        .await
        .unwrap();
    assert_eq!(repo.get_by_id(purchase.id).await.unwrap().user_id, buyer);
    assert_eq!(repo.list_by_user(buyer).await.unwrap().len(), 1);

    repo.delete(purchase.id).await.unwrap();
    assert!(repo.list_by_user(buyer).await.unwrap().is_empty());
    assert!(matches!(
        repo.delete(purchase.id).await.unwrap_err(),
        HearthError::NotFound { .. }
    ));

    repo.create(CreatePurchase {
        property_id: property.id,
        user_id: buyer,
    })
    .await
    .unwrap();
    repo.delete_by_user(buyer).await.unwrap();
    assert!(repo.list_by_user(buyer).await.unwrap().is_empty());
}
