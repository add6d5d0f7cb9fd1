//! Field validation shared by every write path.

use crate::error::{HearthError, HearthResult};
use crate::models::property::{CreateProperty, UpdateProperty};

pub const MAX_COMMENT_CHARS: usize = 1000;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Trims `value` and rejects it when nothing is left.
pub fn required(field: &str, value: &str) -> HearthResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HearthError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Lower-cases and trims an email, then checks it has the shape
/// `local@domain.tld`.
pub fn normalize_email(email: &str) -> HearthResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(HearthError::validation("a valid email address is required"));
    }
    Ok(email)
}

pub fn password(password: &str, min_length: usize) -> HearthResult<()> {
    if password.chars().count() < min_length {
        return Err(HearthError::validation(format!(
            "password must be at least {min_length} characters"
        )));
    }
    Ok(())
}

pub fn rating(rating: u8) -> HearthResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(HearthError::validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Returns the trimmed comment.
pub fn comment(comment: &str) -> HearthResult<String> {
    let comment = required("comment", comment)?;
    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(HearthError::validation(format!(
            "comment cannot exceed {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(comment)
}

pub fn guests(guests: u32) -> HearthResult<()> {
    if guests < 1 {
        return Err(HearthError::validation("at least one guest is required"));
    }
    Ok(())
}

pub fn total_price(total_price: f64) -> HearthResult<()> {
    if !total_price.is_finite() || total_price < 0.0 {
        return Err(HearthError::validation("total price cannot be negative"));
    }
    Ok(())
}

fn price(price: f64) -> HearthResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(HearthError::validation("price must be a positive number"));
    }
    Ok(())
}

fn area(area: f64) -> HearthResult<()> {
    if !area.is_finite() || area < 0.0 {
        return Err(HearthError::validation("area cannot be negative"));
    }
    Ok(())
}

/// Trims each amenity, drops blanks and duplicates, keeps first-seen order.
pub fn amenities(amenities: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(amenities.len());
    for amenity in amenities {
        let amenity = amenity.trim();
        if !amenity.is_empty() && !out.iter().any(|a| a == amenity) {
            out.push(amenity.to_string());
        }
    }
    out
}

/// Validates and normalizes a new listing in place.
pub fn create_property(input: &mut CreateProperty) -> HearthResult<()> {
    input.title = required("title", &input.title)?;
    input.description = required("description", &input.description)?;
    input.property_type = required("type", &input.property_type)?;
    input.location = required("location", &input.location)?;
    input.image = required("image", &input.image)?;
    price(input.price)?;
    area(input.area)?;
    input.amenities = amenities(std::mem::take(&mut input.amenities));
    Ok(())
}

/// Same rules as [`create_property`], applied to the fields present.
pub fn update_property(patch: &mut UpdateProperty) -> HearthResult<()> {
    for (field, value) in [
        ("title", &mut patch.title),
        ("description", &mut patch.description),
        ("type", &mut patch.property_type),
        ("location", &mut patch.location),
        ("image", &mut patch.image),
    ] {
        if let Some(v) = value {
            *v = required(field, v)?;
        }
    }
    if let Some(p) = patch.price {
        price(p)?;
    }
    if let Some(a) = patch.area {
        area(a)?;
    }
    if let Some(list) = patch.amenities.take() {
        patch.amenities = Some(amenities(list));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::property::PropertyStatus;

    fn listing() -> CreateProperty {
        CreateProperty {
            owner_id: Uuid::new_v4(),
            title: "  Sea view loft ".into(),
            description: "Two rooms by the harbour".into(),
            property_type: "Apartment".into(),
            location: "Lisbon".into(),
            price: 120.0,
            bedrooms: 2,
            bathrooms: 1,
            area: 64.0,
            image: "https://img.example/cover.jpg".into(),
            amenities: vec!["wifi".into(), " wifi ".into(), "".into(), "pool".into()],
            status: PropertyStatus::Available,
        }
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["", "alice", "alice@", "@example.com", "alice@example", "a b@c.d", "a@b@c.d"] {
            assert!(normalize_email(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn rating_bounds() {
        assert!(rating(0).is_err());
        assert!(rating(1).is_ok());
        assert!(rating(5).is_ok());
        assert!(rating(6).is_err());
    }

    #[test]
    fn comment_is_trimmed_and_bounded() {
        assert_eq!(comment("  Nice ").unwrap(), "Nice");
        assert!(comment("   ").is_err());
        assert!(comment(&"x".repeat(MAX_COMMENT_CHARS)).is_ok());
        assert!(comment(&"x".repeat(MAX_COMMENT_CHARS + 1)).is_err());
    }

    #[test]
    fn booking_numbers() {
        assert!(guests(0).is_err());
        assert!(guests(1).is_ok());
        assert!(total_price(0.0).is_ok());
        assert!(total_price(-1.0).is_err());
        assert!(total_price(f64::NAN).is_err());
    }

    #[test]
    fn password_length() {
        assert!(password("12345", 6).is_err());
        assert!(password("123456", 6).is_ok());
    }

    #[test]
    fn create_property_normalizes_fields() {
        let mut input = listing();
        create_property(&mut input).unwrap();
        assert_eq!(input.title, "Sea view loft");
        assert_eq!(input.amenities, vec!["wifi".to_string(), "pool".to_string()]);
    }

    #[test]
    fn create_property_rejects_bad_numbers() {
        let mut input = listing();
        input.price = 0.0;
        assert!(create_property(&mut input).is_err());

        let mut input = listing();
        input.area = -3.0;
        assert!(create_property(&mut input).is_err());

        let mut input = listing();
        input.location = " ".into();
        assert!(create_property(&mut input).is_err());
    }

    #[test]
    fn update_property_checks_only_present_fields() {
        let mut patch = UpdateProperty::default();
        update_property(&mut patch).unwrap();

        let mut patch = UpdateProperty {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update_property(&mut patch).is_err());

        let mut patch = UpdateProperty {
            price: Some(99.5),
            amenities: Some(vec!["a".into(), "a".into()]),
            ..Default::default()
        };
        update_property(&mut patch).unwrap();
        assert_eq!(patch.amenities, Some(vec!["a".to_string()]));
    }
}
