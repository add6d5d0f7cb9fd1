//! Access decisions across roles and resource ownership.
//!
//! Every guarded operation names an [`Action`] and the [`Subject`] it
//! touches. [`decide`] is a pure function of the caller's identity,
//! the action and the subject's owner/author; it never looks at
//! storage. Anonymous reads (property listing, reviews) and
//! registration/login need no decision and never reach this module.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HearthError, HearthResult};
use crate::models::booking::Booking;
use crate::models::property::Property;
use crate::models::purchase::Purchase;
use crate::models::review::Review;
use crate::models::user::Role;

/// The resolved caller of an authenticated request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateProperty,
    DeleteProperty,
    ManagePropertyImages,
    CreateBooking,
    ViewBooking,
    /// Confirm, reject or complete a booking.
    ManageBooking,
    CancelBooking,
    DeleteBooking,
    ViewPropertyBookings,
    ListAllBookings,
    CreateReview,
    ModifyReview,
    CreatePurchase,
    CancelPurchase,
    ManageUsers,
}

/// What an action is aimed at: the property owner and, for records a
/// user created (bookings, reviews, purchases), that user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Subject {
    pub owner_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
}

impl Subject {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn property(property: &Property) -> Self {
        Self {
            owner_id: Some(property.owner_id),
            author_id: None,
        }
    }

    pub fn booking(booking: &Booking) -> Self {
        Self {
            owner_id: Some(booking.owner_id),
            author_id: Some(booking.user_id),
        }
    }

    pub fn review(review: &Review) -> Self {
        Self {
            owner_id: None,
            author_id: Some(review.user_id),
        }
    }

    pub fn purchase(purchase: &Purchase) -> Self {
        Self {
            owner_id: None,
            author_id: Some(purchase.user_id),
        }
    }

    fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == Some(user_id)
    }

    fn is_author(&self, user_id: Uuid) -> bool {
        self.author_id == Some(user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

fn allow_if(cond: bool, reason: &'static str) -> Decision {
    if cond {
        Decision::Allow
    } else {
        Decision::Deny(reason)
    }
}

pub fn decide(identity: &Identity, action: Action, subject: &Subject) -> Decision {
    let me = identity.user_id;
    let admin = identity.is_admin();
    let owner = subject.is_owner(me);
    let author = subject.is_author(me);

    match action {
        Action::UpdateProperty | Action::DeleteProperty | Action::ManagePropertyImages => {
            allow_if(owner || admin, "only the owner or an admin may modify this property")
        }
        // Owning the property rules out booking, reviewing or buying it,
        // even for admins.
        Action::CreateBooking => allow_if(!owner, "you cannot book your own property"),
        Action::CreateReview => allow_if(!owner, "you cannot review your own property"),
        Action::CreatePurchase => allow_if(!owner, "you cannot purchase your own property"),
        Action::ViewBooking => allow_if(
            author || owner || admin,
            "only the guest, the property owner or an admin may view this booking",
        ),
        Action::ManageBooking => allow_if(
            owner || admin,
            "only the property owner or an admin may confirm, reject or complete a booking",
        ),
        Action::CancelBooking => allow_if(
            author || owner || admin,
            "only the guest, the property owner or an admin may cancel this booking",
        ),
        Action::ViewPropertyBookings => allow_if(
            owner || admin,
            "only the property owner or an admin may list its bookings",
        ),
        Action::ModifyReview => {
            allow_if(author || admin, "only the author or an admin may modify this review")
        }
        Action::CancelPurchase => allow_if(
            author || admin,
            "only the purchaser or an admin may cancel this purchase",
        ),
        Action::DeleteBooking | Action::ListAllBookings | Action::ManageUsers => {
            allow_if(admin, "admin role required")
        }
    }
}

/// [`decide`], turning a denial into [`HearthError::Forbidden`].
pub fn authorize(identity: &Identity, action: Action, subject: &Subject) -> HearthResult<()> {
    match decide(identity, action, subject) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(HearthError::forbidden(reason)),
    }
}
