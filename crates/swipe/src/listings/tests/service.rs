use super::common::*;
use crate::error::ServiceError;
use crate::listings::domain::{
    AdvertisingPhrase, AnnouncementUpdate, ApartmentUpdate, ComplaintDraft, ModerationDecision,
    PromotionOptions,
};
use crate::listings::{ApartmentQuery, FeedQuery};
use crate::store::{AnnouncementImageId, EntityStore};
use crate::test_support::{date, world};

fn validation_key(result: Result<impl std::fmt::Debug, ServiceError>, key: &str) {
    match result {
        Err(ServiceError::Validation(errors)) => assert!(
            errors.contains(key),
            "expected {key} in {errors}"
        ),
        other => panic!("expected validation error {key}, got {other:?}"),
    }
}

#[test]
fn flat_requires_residential_complex() {
    let world = world();
    let listings = service(&world);
    let mut draft = flat_draft(world.complex);
    draft.residential_complex = None;

    validation_key(
        listings.create(world.member, draft),
        "required_residential_complex",
    );
    let stored = world
        .store
        .read(|tables| tables.announcements.len())
        .expect("read");
    assert_eq!(stored, 0);
}

#[test]
fn kitchen_area_must_stay_below_total_area() {
    let world = world();
    let listings = service(&world);
    let mut draft = office_draft();
    draft.details.area_kitchen = draft.details.area + 1.0;

    validation_key(listings.create(world.member, draft), "error_area");
}

#[test]
fn creating_a_flat_derives_advertising_and_apartment() {
    let world = world();
    let listings = service(&world);

    let view = listings
        .create(world.member, flat_draft(world.complex))
        .expect("created");

    assert!(!view.announcement.is_moderation_check);
    assert_eq!(view.gallery.len(), 1);
    let advertising = view.advertising.expect("advertising slot");
    assert!(!advertising.is_active);
    let apartment = view.apartment.expect("apartment row");
    assert_eq!(apartment.price_to_meter, 1500);
    assert_eq!(apartment.number, view.announcement.id.0);

    let office = listings
        .create(world.member, office_draft())
        .expect("office created");
    assert!(office.advertising.is_some());
    assert!(office.apartment.is_none());
}

#[test]
fn update_recomputes_price_per_meter_and_only_drops_own_images() {
    let world = world();
    let listings = service(&world);
    let flat = listings
        .create(world.member, flat_draft(world.complex))
        .expect("flat");
    let office = listings
        .create(world.member, office_draft())
        .expect("office");
    let foreign_image = listings
        .update(
            world.member,
            office.announcement.id,
            AnnouncementUpdate {
                details: details(),
                images: vec!["office.jpg".to_string()],
                images_delete: Vec::new(),
            },
        )
        .expect("office image")
        .gallery[0]
        .id;

    let mut changed = details();
    changed.price = 124_000;
    let own_image = flat.gallery[0].id;
    let view = listings
        .update(
            world.member,
            flat.announcement.id,
            AnnouncementUpdate {
                details: changed,
                images: vec!["kitchen.jpg".to_string()],
                images_delete: vec![own_image, foreign_image, AnnouncementImageId(9_999)],
            },
        )
        .expect("updated");

    assert_eq!(view.apartment.expect("apartment").price_to_meter, 2000);
    assert_eq!(view.gallery.len(), 1);
    assert_eq!(view.gallery[0].image, "kitchen.jpg");
    let foreign_kept = world
        .store
        .read(|tables| tables.announcement_images.contains_key(&foreign_image))
        .expect("read");
    assert!(foreign_kept);
}

#[test]
fn update_fails_without_apartment_row_and_rolls_back() {
    let world = world();
    let listings = service(&world);
    let flat = listings
        .create(world.member, flat_draft(world.complex))
        .expect("flat")
        .announcement;
    world
        .store
        .write(|tables| {
            tables.apartments.clear();
            Ok::<_, ServiceError>(())
        })
        .expect("apartment removed");

    let mut changed = details();
    changed.price = 1;
    let result = listings.update(
        world.member,
        flat.id,
        AnnouncementUpdate {
            details: changed,
            images: Vec::new(),
            images_delete: Vec::new(),
        },
    );

    assert!(matches!(result, Err(ServiceError::NotFound("apartment"))));
    let price = world
        .store
        .read(|tables| tables.announcements[&flat.id].details.price)
        .expect("read");
    assert_eq!(price, flat.details.price);
}

#[test]
fn only_creator_or_staff_mutates_an_announcement() {
    let world = world();
    let listings = service(&world);
    let id = listings
        .create(world.member, office_draft())
        .expect("created")
        .announcement
        .id;

    let update = AnnouncementUpdate {
        details: details(),
        images: Vec::new(),
        images_delete: Vec::new(),
    };
    assert!(matches!(
        listings.update(world.neighbour, id, update.clone()),
        Err(ServiceError::Forbidden)
    ));
    assert!(matches!(
        listings.delete(world.neighbour, id),
        Err(ServiceError::Forbidden)
    ));
    assert!(listings.update(world.staff, id, update).is_ok());
}

#[test]
fn delete_cascades_to_derived_rows() {
    let world = world();
    let listings = service(&world);
    let id = approved_flat(&world, &listings);
    listings
        .complain(world.neighbour, ComplaintDraft { announcement: id })
        .expect("complaint");
    world
        .store
        .write(|tables| {
            tables.favorite_announcements.insert((world.neighbour.0, id));
            Ok::<_, ServiceError>(())
        })
        .expect("favorite");

    listings.delete(world.member, id).expect("deleted");

    world
        .store
        .read(|tables| {
            assert!(tables.announcements.is_empty());
            assert!(tables.advertising.is_empty());
            assert!(tables.apartments.is_empty());
            assert!(tables.announcement_images.is_empty());
            assert!(tables.complaints.is_empty());
            assert!(tables.favorite_announcements.is_empty());
        })
        .expect("read");
}

#[test]
fn moderation_gates_public_visibility() {
    let world = world();
    let listings = service(&world);
    let id = listings
        .create(world.member, office_draft())
        .expect("created")
        .announcement
        .id;

    let feed = listings
        .feed(world.neighbour, &FeedQuery::default())
        .expect("feed");
    assert!(feed.announcements.is_empty());
    assert_eq!(feed.residential_complexes.len(), 1);
    assert!(matches!(
        listings.retrieve(world.neighbour, id),
        Err(ServiceError::NotFound("announcement"))
    ));
    assert!(listings.retrieve(world.member, id).is_ok());
    assert_eq!(listings.mine(world.member).expect("mine").len(), 1);

    let approve = ModerationDecision {
        is_moderation_check: true,
    };
    assert!(matches!(
        listings.moderate(world.member, id, approve),
        Err(ServiceError::Forbidden)
    ));
    assert_eq!(listings.moderation_queue(world.staff).expect("queue").len(), 1);
    listings.moderate(world.staff, id, approve).expect("approved");
    listings
        .moderate(world.staff, id, approve)
        .expect("approval is idempotent");
    validation_key(
        listings.moderate(
            world.staff,
            id,
            ModerationDecision {
                is_moderation_check: false,
            },
        ),
        "moderation_irreversible",
    );

    let feed = listings
        .feed(world.neighbour, &FeedQuery::default())
        .expect("feed");
    assert_eq!(feed.announcements.len(), 1);
    assert!(listings.moderation_queue(world.staff).expect("queue").is_empty());
}

#[test]
fn views_by_others_are_counted() {
    let world = world();
    let listings = service(&world);
    let id = approved_flat(&world, &listings);

    listings.retrieve(world.member, id).expect("own view");
    listings.retrieve(world.neighbour, id).expect("first view");
    let view = listings.retrieve(world.neighbour, id).expect("second view");
    assert_eq!(view.announcement.count_view, 2);
}

#[test]
fn second_complaint_from_same_user_is_rejected() {
    let world = world();
    let listings = service(&world);
    let id = approved_flat(&world, &listings);

    listings
        .complain(world.neighbour, ComplaintDraft { announcement: id })
        .expect("first complaint");
    validation_key(
        listings.complain(world.neighbour, ComplaintDraft { announcement: id }),
        "already_complained",
    );
    listings
        .complain(world.developer, ComplaintDraft { announcement: id })
        .expect("other user may complain");

    assert!(matches!(
        listings.complaints(world.member),
        Err(ServiceError::Forbidden)
    ));
    assert_eq!(listings.complaints(world.staff).expect("list").len(), 2);
}

#[test]
fn blacklisted_users_cannot_publish() {
    let world = world();
    let listings = service(&world);
    world
        .store
        .write(|tables| {
            if let Some(user) = tables.users.get_mut(&world.member.0) {
                user.is_blacklist = true;
            }
            Ok::<_, ServiceError>(())
        })
        .expect("blacklisted");

    assert!(matches!(
        listings.create(world.member, office_draft()),
        Err(ServiceError::Forbidden)
    ));
}

#[test]
fn advertising_activates_once_per_period() {
    let world = world();
    let listings = service(&world);
    let view = listings
        .create(world.member, office_draft())
        .expect("created");
    let slot = view.advertising.expect("slot").id;
    let options = PromotionOptions {
        add_phrase: true,
        phrase: Some(AdvertisingPhrase::Bargain),
        is_turbo: true,
        ..PromotionOptions::default()
    };

    assert!(matches!(
        listings.activate_advertising(world.neighbour, slot, options.clone(), date(2024, 1, 31)),
        Err(ServiceError::Forbidden)
    ));

    let active = listings
        .activate_advertising(world.member, slot, options.clone(), date(2024, 1, 31))
        .expect("activated");
    assert!(active.is_active);
    assert_eq!(active.date_start, date(2024, 1, 31));
    assert_eq!(active.date_end, Some(date(2024, 3, 2)));
    assert_eq!(active.options.phrase, Some(AdvertisingPhrase::Bargain));

    validation_key(
        listings.activate_advertising(world.member, slot, options, date(2024, 2, 1)),
        "already_activated",
    );
}

#[test]
fn apartment_inventory_is_managed_by_the_developer() {
    let world = world();
    let listings = service(&world);
    let hidden = listings
        .create(world.member, flat_draft(world.complex))
        .expect("unmoderated flat")
        .announcement
        .id;
    let id = approved_flat(&world, &listings);

    let query = ApartmentQuery {
        residential_complex: Some(world.complex),
        ..ApartmentQuery::default()
    };
    let listed = listings.apartments(world.neighbour, &query).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].announcement.id, id);
    let hidden_apartment = world
        .store
        .read(|tables| tables.apartment_of(hidden).map(|apartment| apartment.id))
        .expect("read")
        .expect("apartment exists");
    assert!(matches!(
        listings.apartment(world.neighbour, hidden_apartment),
        Err(ServiceError::NotFound("apartment"))
    ));

    let apartment = listed[0].apartment.id;
    let update = ApartmentUpdate {
        floor: Some(7),
        corpus: Some(2),
        is_booked: Some(true),
        ..ApartmentUpdate::default()
    };
    assert!(matches!(
        listings.update_apartment(world.member, apartment, update.clone()),
        Err(ServiceError::Forbidden)
    ));
    let updated = listings
        .update_apartment(world.developer, apartment, update)
        .expect("developer updates");
    assert_eq!(updated.apartment.floor, Some(7));
    assert!(updated.apartment.is_booked);

    let booked = ApartmentQuery {
        is_booked: Some(false),
        ..ApartmentQuery::default()
    };
    assert!(listings
        .apartments(world.neighbour, &booked)
        .expect("list")
        .is_empty());
}
