//! Profiles, avatars and admin user management.

mod common;

use common::{harness, stay};
use hearth_core::error::HearthError;
use hearth_core::models::property::StoredImage;
use hearth_core::models::user::{Role, UpdateUser};
use hearth_core::repository::{BookingRepository, Pagination, Stores};
use hearth_market::NewReview;

#[tokio::test]
async fn profile_collects_owned_and_created_records() {
    let h = harness().await;
    let owner = h.user(Role::User).await;
    let guest = h.user(Role::User).await;
    let property = h.listing(&owner).await;
    h.ledger
        .create_booking(&guest, stay(property.id, 1, 2))
        .await
        .unwrap();
    h.catalog.create_purchase(&guest, property.id).await.unwrap();

    let profile = h.users.profile(&guest).await.unwrap();
    assert_eq!(profile.user.id, guest.user_id);
    assert_eq!(profile.bookings.len(), 1);
    assert_eq!(profile.purchases.len(), 1);
    assert!(profile.listings.is_empty());

    let owner_profile = h.users.profile(&owner).await.unwrap();
    assert_eq!(owner_profile.listings.len(), 1);
}

#[tokio::test]
async fn user_management_requires_admin() {
    let h = harness().await;
    let user = h.user(Role::User).await;
    let other = h.user(Role::User).await;

    let err = h
        .users
        .list_users(&user, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HearthError::Forbidden { .. }));
    let err = h.users.get_user(&user, other.user_id).await.unwrap_err();
    assert!(matches!(err, HearthError::Forbidden { .. }));
    let err = h.users.delete_user(&user, other.user_id).await.unwrap_err();
    assert!(matches!(err, HearthError::Forbidden { .. }));
}

#[tokio::test]
async fn admin_updates_role_and_email() {
    let h = harness().await;
    let admin = h.user(Role::Admin).await;
    let user = h.user(Role::User).await;
    let other = h.user(Role::User).await;

    let updated = h
        .users
        .update_user(
            &admin,
            user.user_id,
            UpdateUser {
                email: Some("  New@Example.COM ".into()),
                role: Some(Role::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "new@example.com");
    assert_eq!(updated.role, Role::Admin);

    let err = h
        .users
        .update_user(
            &admin,
            other.user_id,
            UpdateUser {
                email: Some("new@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HearthError::Conflict { .. }));

    let listed = h
        .users
        .list_users(&admin, Pagination::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 3);
}

#[tokio::test]
async fn delete_refuses_owners_of_listings() {
    let h = harness().await;
    let admin = h.user(Role::Admin).await;
    let owner = h.user(Role::User).await;
    h.listing(&owner).await;

    let err = h.users.delete_user(&admin, owner.user_id).await.unwrap_err();
    assert!(matches!(err, HearthError::Conflict { .. }));

    let err = h.users.delete_user(&admin, admin.user_id).await.unwrap_err();
    assert!(matches!(err, HearthError::Conflict { .. }));
}

#[tokio::test]
async fn delete_purges_reviews_and_purchases_but_keeps_bookings() {
    let h = harness().await;
    let admin = h.user(Role::Admin).await;
    let owner = h.user(Role::User).await;
    let guest = h.user(Role::User).await;
    let property = h.listing(&owner).await;

    h.ledger
        .create_booking(&guest, stay(property.id, 1, 2))
        .await
        .unwrap();
    h.catalog.create_purchase(&guest, property.id).await.unwrap();
    h.reviews
        .add_review(
            &guest,
            NewReview {
                property_id: property.id,
                rating: 2,
                comment: "Meh".into(),
                booking_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(h.property(property.id).await.num_reviews, 1);

    h.users.delete_user(&admin, guest.user_id).await.unwrap();

    let after = h.property(property.id).await;
    assert_eq!(after.num_reviews, 0);
    assert_eq!(after.rating, 0.0);
    assert_eq!(
        h.stores
            .bookings()
            .list_by_property(property.id)
            .await
            .unwrap()
            .len(),
        1
    );
    let err = h.users.get_user(&admin, guest.user_id).await.unwrap_err();
    assert!(matches!(err, HearthError::NotFound { .. }));
}

#[tokio::test]
async fn avatar_upload_replaces_and_removes_the_hosted_object() {
    let h = harness().await;
    let user = h.user(Role::User).await;

    let first = h
        .users
        .attach_avatar(&user, b"face one".to_vec(), "image/png")
        .await
        .unwrap();
    let first_handle = first.avatar_handle.clone().unwrap();
    assert!(first.avatar_url.is_some());
    assert!(h.images.contains(&first_handle));

    let second = h
        .users
        .attach_avatar(&user, b"face two".to_vec(), "image/jpeg")
        .await
        .unwrap();
    let second_handle = second.avatar_handle.clone().unwrap();
    assert_ne!(first_handle, second_handle);
    assert!(!h.images.contains(&first_handle));
    assert!(h.images.contains(&second_handle));

    let cleared = h.users.detach_avatar(&user).await.unwrap();
    assert!(cleared.avatar_url.is_none());
    assert!(cleared.avatar_handle.is_none());
    assert_eq!(h.images.len(), 0);

    let err = h.users.detach_avatar(&user).await.unwrap_err();
    assert!(matches!(err, HearthError::NotFound { .. }));
}

#[tokio::test]
async fn avatar_uploads_are_checked_before_hosting() {
    let h = harness().await;
    let user = h.user(Role::User).await;

    for (bytes, content_type) in [
        (Vec::new(), "image/png"),
        (vec![0u8; 2048], "image/png"),
        (b"<svg/>".to_vec(), "image/svg+xml"),
    ] {
        let err = h
            .users
            .attach_avatar(&user, bytes, content_type)
            .await
            .unwrap_err();
        assert!(matches!(err, HearthError::Validation { .. }), "{err:?}");
    }
    assert_eq!(h.images.len(), 0);
}

#[tokio::test]
async fn admin_may_clear_but_not_set_an_avatar() {
    let h = harness().await;
    let admin = h.user(Role::Admin).await;
    let user = h.user(Role::User).await;
    let with_avatar = h
        .users
        .attach_avatar(&user, b"face".to_vec(), "image/png")
        .await
        .unwrap();
    let handle = with_avatar.avatar_handle.unwrap();

    let err = h
        .users
        .update_user(
            &admin,
            user.user_id,
            UpdateUser {
                avatar: Some(Some(StoredImage {
                    url: "https://elsewhere.example/x.png".into(),
                    handle: "x.png".into(),
                })),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HearthError::Validation { .. }));

    let cleared = h
        .users
        .update_user(
            &admin,
            user.user_id,
            UpdateUser {
                avatar: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.avatar_url.is_none());
    assert!(!h.images.contains(&handle));
}

#[tokio::test]
async fn deleting_a_user_removes_their_avatar() {
    let h = harness().await;
    let admin = h.user(Role::Admin).await;
    let user = h.user(Role::User).await;
    let with_avatar = h
        .users
        .attach_avatar(&user, b"face".to_vec(), "image/png")
        .await
        .unwrap();

    h.users.delete_user(&admin, user.user_id).await.unwrap();
    assert!(!h.images.contains(&with_avatar.avatar_handle.unwrap()));
}
