use serde_json::json;
use tg_catalog::auth::Role;
use tg_catalog::models::{
    Admin, CreateListingRequest, Listing, ListingKind, ListingStatus, UpdateStatusRequest,
};

#[test]
fn listing_serializes_with_the_frontend_field_names() {
    let listing = Listing {
        kind: ListingKind::Bot,
        ..Listing::default()
    };

    let output = serde_json::to_string(&listing).unwrap();

    // camelCase throughout, and the kind field goes out as "type".
    assert!(output.contains(r#""shortDescription""#));
    assert!(output.contains(r#""fullDescription""#));
    assert!(output.contains(r#""createdAt""#));
    assert!(output.contains(r#""updatedAt""#));
    assert!(output.contains(r#""type":"bot""#));
    assert!(output.contains(r#""status":"pending""#));
    assert!(!output.contains("short_description"));
    assert!(!output.contains(r#""kind""#));
}

#[test]
fn create_request_accepts_the_frontend_payload_shape() {
    let payload = json!({
        "name": "Example Bot",
        "category": "productivity",
        "shortDescription": "short",
        "fullDescription": "full",
        "link": "https://t.me/example",
        "image": "https://example.com/logo.png",
        "tags": ["tools", "tools", "daily"],
        "date": "2025-06-01",
        "type": "bot"
    });

    let request: CreateListingRequest = serde_json::from_value(payload).unwrap();

    assert_eq!(request.name, "Example Bot");
    assert_eq!(request.kind, "bot");
    // Duplicates are preserved: tags are a list, not a set.
    assert_eq!(request.tags, vec!["tools", "tools", "daily"]);
}

#[test]
fn create_request_tolerates_missing_optional_fields() {
    let payload = json!({
        "name": "Minimal",
        "category": "misc",
        "shortDescription": "s",
        "fullDescription": "f",
        "link": "https://t.me/minimal",
        "date": "2025-06-01",
        "type": "group"
    });

    let request: CreateListingRequest = serde_json::from_value(payload).unwrap();

    assert!(request.image.is_none());
    assert!(request.tags.is_empty());
}

#[test]
fn status_parsing_accepts_only_the_three_legal_values() {
    assert_eq!(ListingStatus::parse("pending"), Some(ListingStatus::Pending));
    assert_eq!(
        ListingStatus::parse("approved"),
        Some(ListingStatus::Approved)
    );
    assert_eq!(
        ListingStatus::parse("rejected"),
        Some(ListingStatus::Rejected)
    );

    for illegal in ["banned", "APPROVED", "Pending", "", "deleted"] {
        assert_eq!(ListingStatus::parse(illegal), None, "{illegal:?}");
    }
}

#[test]
fn kind_parsing_accepts_only_the_three_legal_values() {
    assert_eq!(ListingKind::parse("bot"), Some(ListingKind::Bot));
    assert_eq!(ListingKind::parse("channel"), Some(ListingKind::Channel));
    assert_eq!(ListingKind::parse("group"), Some(ListingKind::Group));
    assert_eq!(ListingKind::parse("supergroup"), None);
}

#[test]
fn enum_round_trips_through_their_string_forms() {
    for status in [
        ListingStatus::Pending,
        ListingStatus::Approved,
        ListingStatus::Rejected,
    ] {
        assert_eq!(ListingStatus::parse(status.as_str()), Some(status));
    }
    for kind in [ListingKind::Bot, ListingKind::Channel, ListingKind::Group] {
        assert_eq!(ListingKind::parse(kind.as_str()), Some(kind));
    }
}

#[test]
fn admin_password_hash_is_never_serialized() {
    let admin = Admin {
        login: "admin".to_string(),
        password_hash: "$argon2id$super-secret".to_string(),
        ..Admin::default()
    };

    let output = serde_json::to_string(&admin).unwrap();

    assert!(!output.contains("password_hash"));
    assert!(!output.contains("argon2id"));
    assert!(output.contains(r#""login":"admin""#));
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
}

#[test]
fn update_status_request_carries_plain_strings() {
    // Validation happens in the handler; the payload itself accepts any
    // string so an illegal value can be rejected with a 400 rather than a
    // deserialization failure.
    let request: UpdateStatusRequest =
        serde_json::from_value(json!({"id": "abc", "status": "banned"})).unwrap();

    assert_eq!(request.status, "banned");
    assert_eq!(ListingStatus::parse(&request.status), None);
}
